pub mod backend;
mod capability;
mod config;
mod engine;
mod error;
mod events;
mod role;
mod signaling;

pub use capability::*;
pub use config::EngineConfig;
pub use engine::{SessionState, TandemEngine};
pub use error::{BackendError, EngineError, ErrorKind};
pub use events::{EngineEvent, EventKind, EventRegistry};
pub use role::Role;
pub use signaling::{SignalingConnector, SignalingLink, WsConnector};
