use crate::error::ProtocolError;
use crate::model::{ConnectionId, RoomId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Client → relay topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Join,
    Leave,
    Candidate,
    Offer,
    Answer,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Join => "/webrtc/join",
            Self::Leave => "/webrtc/leave",
            Self::Candidate => "/webrtc/candidate",
            Self::Offer => "/webrtc/offer",
            Self::Answer => "/webrtc/answer",
        }
    }

    /// Event type the relay rebroadcasts this topic as.
    pub fn signal_type(&self) -> SignalType {
        match self {
            Self::Join => SignalType::UserJoin,
            Self::Leave => SignalType::UserLeft,
            Self::Candidate => SignalType::Candidate,
            Self::Offer => SignalType::Offer,
            Self::Answer => SignalType::Answer,
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relay → client event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalType {
    UserJoin,
    UserLeft,
    Offer,
    Answer,
    Candidate,
}

impl SignalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserJoin => "user-join",
            Self::UserLeft => "user-left",
            Self::Offer => "offer",
            Self::Answer => "answer",
            Self::Candidate => "candidate",
        }
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{roomId, userId, data}` as submitted by a client.
///
/// `connectionId` is stamped by the relay on the way out; whatever a client
/// puts there is overwritten.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(default)]
    pub room_id: RoomId,
    #[serde(default)]
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<ConnectionId>,
}

impl Envelope {
    pub fn new(room_id: RoomId, user_id: UserId) -> Self {
        Self {
            room_id,
            user_id,
            data: None,
            connection_id: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_connection(mut self, connection_id: ConnectionId) -> Self {
        self.connection_id = Some(connection_id);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "topic", content = "payload")]
pub enum ClientFrame {
    #[serde(rename = "/webrtc/join")]
    Join(Envelope),
    #[serde(rename = "/webrtc/leave")]
    Leave(Envelope),
    #[serde(rename = "/webrtc/candidate")]
    Candidate(Envelope),
    #[serde(rename = "/webrtc/offer")]
    Offer(Envelope),
    #[serde(rename = "/webrtc/answer")]
    Answer(Envelope),
}

impl ClientFrame {
    pub fn new(topic: Topic, envelope: Envelope) -> Self {
        match topic {
            Topic::Join => Self::Join(envelope),
            Topic::Leave => Self::Leave(envelope),
            Topic::Candidate => Self::Candidate(envelope),
            Topic::Offer => Self::Offer(envelope),
            Topic::Answer => Self::Answer(envelope),
        }
    }

    /// Decode a text frame and validate it.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let frame: Self = serde_json::from_str(text)?;
        frame.validate()?;
        Ok(frame)
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn topic(&self) -> Topic {
        match self {
            Self::Join(_) => Topic::Join,
            Self::Leave(_) => Topic::Leave,
            Self::Candidate(_) => Topic::Candidate,
            Self::Offer(_) => Topic::Offer,
            Self::Answer(_) => Topic::Answer,
        }
    }

    pub fn envelope(&self) -> &Envelope {
        match self {
            Self::Join(e) | Self::Leave(e) | Self::Candidate(e) | Self::Offer(e) | Self::Answer(e) => e,
        }
    }

    pub fn into_envelope(self) -> Envelope {
        match self {
            Self::Join(e) | Self::Leave(e) | Self::Candidate(e) | Self::Offer(e) | Self::Answer(e) => e,
        }
    }

    pub fn validate(&self) -> Result<(), ProtocolError> {
        let topic = self.topic();
        let envelope = self.envelope();

        if envelope.room_id.is_empty() {
            return Err(ProtocolError::MissingRoomId(topic));
        }

        if topic != Topic::Leave && envelope.user_id.is_empty() {
            return Err(ProtocolError::MissingUserId(topic));
        }

        let needs_data = matches!(topic, Topic::Candidate | Topic::Offer | Topic::Answer);
        if needs_data && envelope.data.as_ref().is_none_or(Value::is_null) {
            return Err(ProtocolError::MissingPayload(topic));
        }

        Ok(())
    }
}

/// The relay's single `message` event: `{type, data}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayEvent {
    #[serde(rename = "type")]
    pub kind: SignalType,
    pub data: Envelope,
}

impl RelayEvent {
    pub fn new(kind: SignalType, data: Envelope) -> Self {
        Self { kind, data }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum ServerFrame {
    /// First frame on every accepted connection.
    Welcome {
        #[serde(rename = "connectionId")]
        connection_id: ConnectionId,
    },
    Message(RelayEvent),
}

impl ServerFrame {
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}
