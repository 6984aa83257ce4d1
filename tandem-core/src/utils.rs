pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";

pub const DEFAULT_SIGNALING_PORT: u16 = 8999;

/// WebSocket path the relay serves signaling on.
pub const SIGNALING_PATH: &str = "/ws";

pub const DEFAULT_SIGNALING_URL: &str = "ws://127.0.0.1:8999/ws";

/// Label of the data channel opened by `send_text`.
pub const TEXT_CHANNEL_LABEL: &str = "webrtc-chat";
