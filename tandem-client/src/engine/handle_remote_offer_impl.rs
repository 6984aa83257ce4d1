use crate::capability::{PeerConnection, RtcBackend};
use crate::engine::{EngineInner, EngineService, SessionState};
use crate::error::EngineError;
use serde_json::Value;
use tandem_core::{SdpType, SessionDescription, Topic};
use tracing::{info, warn};

impl<B: RtcBackend> EngineService<B> {
    pub(super) async fn handle_remote_offer(&self, inner: &mut EngineInner<B>, data: Option<Value>) {
        let Some(pc) = inner.pc.clone() else {
            self.report(inner.invalid("handle_offer"));
            return;
        };
        if inner.pending_offer {
            warn!("Offer collided with our pending offer");
            self.report(EngineError::SdpApply(
                "remote offer received while a local offer is pending".into(),
            ));
            return;
        }

        let offer = match parse_description(data, SdpType::Offer) {
            Ok(offer) => offer,
            Err(err) => {
                self.report(err);
                return;
            }
        };

        if let Err(e) = pc.set_remote_description(offer).await {
            self.report(EngineError::SdpApply(e.to_string()));
            return;
        }
        let answer = match pc.create_answer().await {
            Ok(answer) => answer,
            Err(e) => {
                self.report(EngineError::SdpApply(e.to_string()));
                return;
            }
        };
        if let Err(e) = pc.set_local_description(answer.clone()).await {
            self.report(EngineError::SdpApply(e.to_string()));
            return;
        }

        info!("Sending ANSWER");
        self.send_signal(inner, Topic::Answer, Some(answer.to_value()));
        inner.state = SessionState::Connected;
    }
}

/// Parse an opaque `data` value as a session description of `expected` type.
pub(super) fn parse_description(
    data: Option<Value>,
    expected: SdpType,
) -> Result<SessionDescription, EngineError> {
    let Some(value) = data else {
        return Err(EngineError::SdpApply(format!(
            "{} carried no session description",
            expected.as_str()
        )));
    };

    let desc = SessionDescription::from_value(&value)
        .map_err(|e| EngineError::SdpApply(format!("malformed {}: {}", expected.as_str(), e)))?;

    if desc.sdp_type != expected {
        return Err(EngineError::SdpApply(format!(
            "expected {}, got {}",
            expected.as_str(),
            desc.sdp_type.as_str()
        )));
    }

    Ok(desc)
}
