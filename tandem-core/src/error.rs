use crate::model::Topic;
use thiserror::Error;

/// Why an inbound signaling frame was rejected.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("{0} frame is missing roomId")]
    MissingRoomId(Topic),

    #[error("{0} frame is missing userId")]
    MissingUserId(Topic),

    #[error("{0} frame carries no data payload")]
    MissingPayload(Topic),

    #[error("undecodable frame: {0}")]
    Decode(#[from] serde_json::Error),
}
