pub mod negotiation_tests;

use serde_json::Value;
use tracing::Level;

use tandem_client::{EngineConfig, SessionState, TandemEngine};
use tandem_core::{IceCandidate, RoomId, UserId};

use crate::utils::{
    EventLog, LoopbackConnector, LoopbackRelay, MockBackend, MockBehavior, ScriptedConnector,
    ScriptedRemote, wait_for_state, wait_until,
};

pub type LoopbackEngine = TandemEngine<MockBackend, LoopbackConnector>;
pub type ScriptedEngine = TandemEngine<MockBackend, ScriptedConnector>;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// A mock-backed engine on the in-process relay, joined to `room` as `user`.
pub async fn start_peer(
    relay: &LoopbackRelay,
    label: &str,
    room: &str,
    user: &str,
) -> (LoopbackEngine, MockBackend, EventLog) {
    let backend = MockBackend::new(label);
    let engine = TandemEngine::new(EngineConfig::default(), backend.clone(), relay.connector());
    let log = EventLog::attach(&engine);

    engine.init().await.expect("init failed");
    engine
        .connect(RoomId::from(room), UserId::from(user))
        .await
        .expect("connect failed");

    (engine, backend, log)
}

/// Starts `a` then `b` in `room` and waits for both to finish negotiating.
pub async fn connected_pair(
    relay: &LoopbackRelay,
    room: &str,
    a: &str,
    b: &str,
) -> (
    (LoopbackEngine, MockBackend, EventLog),
    (LoopbackEngine, MockBackend, EventLog),
) {
    let first = start_peer(relay, "A", room, a).await;
    assert!(wait_for_members(relay, room, 1).await);
    let second = start_peer(relay, "B", room, b).await;

    assert!(wait_for_state(&first.0, SessionState::Connected, 2000).await);
    assert!(wait_for_state(&second.0, SessionState::Connected, 2000).await);

    (first, second)
}

pub async fn wait_for_members(relay: &LoopbackRelay, room: &str, count: usize) -> bool {
    wait_until(2000, || async move { relay.member_count(room).await == count }).await
}

/// An initialized engine whose signaling is driven by the returned remote.
/// The join frame sent by `connect` is left in the remote's outbound queue.
pub async fn scripted_peer(
    label: &str,
    user: &str,
    behavior: MockBehavior,
) -> (ScriptedEngine, MockBackend, EventLog, ScriptedRemote) {
    let backend = MockBackend::with_behavior(label, behavior);
    let (connector, remote) = ScriptedConnector::new();
    let engine = TandemEngine::new(EngineConfig::default(), backend.clone(), connector);
    let log = EventLog::attach(&engine);

    engine.init().await.expect("init failed");
    engine
        .connect(RoomId::from("R1"), UserId::from(user))
        .await
        .expect("connect failed");

    (engine, backend, log, remote)
}

pub fn host_candidate() -> IceCandidate {
    IceCandidate {
        candidate: "candidate:1 1 udp 2122260223 10.0.0.1 50000 typ host".to_string(),
        sdp_mid: Some("0".to_string()),
        sdp_m_line_index: Some(0),
        username_fragment: None,
    }
}

pub fn candidate_value() -> Value {
    host_candidate().to_value()
}
