use crate::capability::{PeerConnection, RtcBackend};
use crate::engine::{EngineInner, EngineService, SessionState};
use crate::error::EngineError;
use tandem_core::Topic;
use tracing::{debug, info};

impl<B: RtcBackend> EngineService<B> {
    pub(super) async fn create_offer(&self, inner: &mut EngineInner<B>) {
        if inner.pending_offer {
            debug!("Offer already pending, not creating another");
            return;
        }
        let Some(pc) = inner.pc.clone() else {
            self.report(inner.invalid("create_offer"));
            return;
        };

        let offer = match pc.create_offer().await {
            Ok(offer) => offer,
            Err(e) => {
                self.report(EngineError::SdpApply(e.to_string()));
                return;
            }
        };
        if let Err(e) = pc.set_local_description(offer.clone()).await {
            self.report(EngineError::SdpApply(e.to_string()));
            return;
        }

        inner.pending_offer = true;
        inner.state = SessionState::Negotiating;
        info!("Sending OFFER");
        self.send_signal(inner, Topic::Offer, Some(offer.to_value()));
    }
}
