mod webrtc_backend;

pub use webrtc_backend::{SampleTrack, WebRtcBackend, WebRtcConnection};
