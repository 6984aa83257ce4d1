use tandem_client::{EngineConfig, EngineError, ErrorKind, LocalTrack, SessionState, TandemEngine};
use tandem_core::{RoomId, UserId};

use crate::integration::{init_tracing, start_peer};
use crate::utils::{EventLog, LoopbackRelay, MockBackend, PcCall, Recorded};

#[tokio::test]
async fn test_disconnect_before_connect() {
    init_tracing();

    let relay = LoopbackRelay::new();
    let backend = MockBackend::new("A");
    let engine = TandemEngine::new(EngineConfig::default(), backend.clone(), relay.connector());
    let log = EventLog::attach(&engine);

    engine.init().await.unwrap();
    assert_eq!(engine.state().await, SessionState::Initializing);
    let err = engine.init().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    engine.disconnect().await;
    assert_eq!(engine.state().await, SessionState::Closed);
    assert_eq!(log.all(), vec![Recorded::Disconnect]);
    assert!(backend.calls().await.is_empty());
    assert!(backend.tracks().await.iter().all(|t| t.is_stopped()));

    let err = engine
        .connect(RoomId::from("R1"), UserId::from("a"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidState {
            operation: "connect",
            state: SessionState::Closed
        }
    ));
    assert_eq!(relay.member_count("R1").await, 0);
}

#[tokio::test]
async fn test_connect_twice_is_rejected() {
    init_tracing();

    let relay = LoopbackRelay::new();
    let (engine, backend, _log) = start_peer(&relay, "A", "R1", "a").await;

    let err = engine
        .connect(RoomId::from("R2"), UserId::from("a"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(engine.state().await, SessionState::Joining);
    assert_eq!(backend.count(|c| matches!(c, PcCall::AddTrack(_))).await, 2);
}
