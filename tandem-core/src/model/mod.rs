mod config;
mod connection;
mod room;
mod session;
mod signaling;
mod user;

pub use config::{IceServerConfig, MediaConstraints};
pub use connection::ConnectionId;
pub use room::RoomId;
pub use session::{IceCandidate, SdpType, SessionDescription};
pub use signaling::{ClientFrame, Envelope, RelayEvent, ServerFrame, SignalType, Topic};
pub use user::UserId;
