use crate::capability::{PeerConnection, RtcBackend};
use crate::engine::{EngineInner, EngineService, SessionState};
use crate::error::EngineError;
use serde_json::Value;
use tandem_core::IceCandidate;
use tracing::debug;

impl<B: RtcBackend> EngineService<B> {
    pub(super) async fn handle_remote_candidate(
        &self,
        inner: &mut EngineInner<B>,
        data: Option<Value>,
    ) {
        let Some(pc) = inner.pc.clone() else {
            self.report(inner.invalid("add_candidate"));
            return;
        };
        if inner.state == SessionState::Joining {
            inner.state = SessionState::Negotiating;
        }

        let candidate = match data.as_ref().map(IceCandidate::from_value) {
            Some(Ok(candidate)) => candidate,
            Some(Err(e)) => {
                self.report(EngineError::IceCandidate(format!("malformed candidate: {e}")));
                return;
            }
            None => {
                self.report(EngineError::IceCandidate("candidate carried no payload".into()));
                return;
            }
        };

        debug!("Adding ICE: {}", candidate.candidate);
        if let Err(e) = pc.add_ice_candidate(candidate).await {
            self.report(EngineError::IceCandidate(e.to_string()));
        }
    }
}
