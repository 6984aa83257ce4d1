use serde_json::json;
use tandem_client::{ErrorKind, SessionState};
use tandem_core::{ClientFrame, ConnectionId, SignalType};

use crate::integration::{candidate_value, init_tracing, scripted_peer};
use crate::utils::{MockBehavior, wait_until};

#[tokio::test]
async fn test_malformed_candidate_keeps_state() {
    init_tracing();

    let (engine, _backend, log, mut remote) = scripted_peer("A", "a", MockBehavior::default()).await;
    assert!(matches!(remote.next_sent().await, ClientFrame::Join(_)));

    let conn = Some(ConnectionId::new());
    remote.push(SignalType::UserJoin, "R1", "b", conn, None);
    assert!(matches!(remote.next_sent().await, ClientFrame::Offer(_)));
    assert_eq!(engine.state().await, SessionState::Negotiating);

    remote.push(SignalType::Candidate, "R1", "b", conn, Some(json!({"bogus": 1})));
    let log_ref = &log;
    assert!(
        wait_until(1000, || async move {
            log_ref.errors() == vec![ErrorKind::IceCandidate]
        })
        .await
    );
    assert_eq!(engine.state().await, SessionState::Negotiating);

    // Well formed, but the answer has not been applied yet.
    remote.push(SignalType::Candidate, "R1", "b", conn, Some(candidate_value()));
    assert!(
        wait_until(1000, || async move { log_ref.errors().len() == 2 }).await
    );
    assert_eq!(log.errors(), vec![ErrorKind::IceCandidate, ErrorKind::IceCandidate]);
    assert_eq!(engine.state().await, SessionState::Negotiating);
    assert!(engine.has_pending_offer().await);
}

#[tokio::test]
async fn test_candidate_while_joining_starts_negotiating() {
    init_tracing();

    let (engine, _backend, log, mut remote) = scripted_peer("A", "a", MockBehavior::default()).await;
    assert!(matches!(remote.next_sent().await, ClientFrame::Join(_)));
    assert_eq!(engine.state().await, SessionState::Joining);

    remote.push(SignalType::Candidate, "R1", "b", Some(ConnectionId::new()), None);

    let log_ref = &log;
    assert!(
        wait_until(1000, || async move {
            log_ref.errors() == vec![ErrorKind::IceCandidate]
        })
        .await
    );
    assert_eq!(engine.state().await, SessionState::Negotiating);
}
