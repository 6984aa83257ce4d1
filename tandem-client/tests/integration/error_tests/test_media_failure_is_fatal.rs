use tandem_client::{EngineConfig, EngineError, ErrorKind, SessionState, TandemEngine};
use tandem_core::{RoomId, UserId};

use crate::integration::init_tracing;
use crate::utils::{EventLog, MockBackend, MockBehavior, ScriptedConnector};

#[tokio::test]
async fn test_media_failure_is_fatal() {
    init_tracing();

    let backend = MockBackend::with_behavior(
        "A",
        MockBehavior {
            fail_media: true,
            ..Default::default()
        },
    );
    let (connector, mut remote) = ScriptedConnector::new();
    let engine = TandemEngine::new(EngineConfig::default(), backend.clone(), connector);
    let log = EventLog::attach(&engine);

    let err = engine.init().await.unwrap_err();
    assert!(matches!(err, EngineError::MediaAcquisition(_)));
    assert!(err.is_fatal());
    assert_eq!(log.errors(), vec![ErrorKind::MediaAcquisition]);
    assert_eq!(engine.state().await, SessionState::Closed);

    let err = engine
        .connect(RoomId::from("R1"), UserId::from("a"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    // Signaling was never opened.
    assert!(remote.drain_sent().is_empty());
    assert!(backend.calls().await.is_empty());
}
