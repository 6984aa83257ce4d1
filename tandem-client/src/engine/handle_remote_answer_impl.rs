use crate::capability::{PeerConnection, RtcBackend};
use crate::engine::handle_remote_offer_impl::parse_description;
use crate::engine::{EngineInner, EngineService, SessionState};
use crate::error::EngineError;
use serde_json::Value;
use tandem_core::SdpType;
use tracing::info;

impl<B: RtcBackend> EngineService<B> {
    pub(super) async fn handle_remote_answer(&self, inner: &mut EngineInner<B>, data: Option<Value>) {
        if !inner.pending_offer {
            self.report(EngineError::SdpApply(
                "answer received without a pending offer".into(),
            ));
            return;
        }
        let Some(pc) = inner.pc.clone() else {
            self.report(inner.invalid("handle_answer"));
            return;
        };

        let answer = match parse_description(data, SdpType::Answer) {
            Ok(answer) => answer,
            Err(err) => {
                self.report(err);
                return;
            }
        };
        if let Err(e) = pc.set_remote_description(answer).await {
            self.report(EngineError::SdpApply(e.to_string()));
            return;
        }

        inner.pending_offer = false;
        inner.state = SessionState::Connected;
        info!("Remote description set (answer), handshake complete");
    }
}
