use std::time::Duration;

use tandem_client::{Role, SessionState};
use tandem_core::{ClientFrame, ConnectionId, RoomId, SessionDescription, SignalType, UserId};

use crate::integration::{init_tracing, scripted_peer};
use crate::utils::{MockBehavior, PcCall};

#[tokio::test]
async fn test_offer_yields_single_answer() {
    init_tracing();

    let (engine, backend, log, mut remote) = scripted_peer("B", "b", MockBehavior::default()).await;
    assert!(matches!(remote.next_sent().await, ClientFrame::Join(_)));

    let offer = SessionDescription::offer("v=0 remote");
    remote.push(
        SignalType::Offer,
        "R1",
        "a",
        Some(ConnectionId::new()),
        Some(offer.to_value()),
    );

    let ClientFrame::Answer(envelope) = remote.next_sent().await else {
        panic!("expected an answer");
    };
    assert_eq!(envelope.room_id, RoomId::from("R1"));
    assert_eq!(envelope.user_id, UserId::from("b"));
    let answer = SessionDescription::from_value(envelope.data.as_ref().unwrap()).unwrap();
    assert_eq!(answer, SessionDescription::answer("answer-from-B"));

    // The local description was in place before the answer left.
    let calls = backend.calls().await;
    let set_remote = calls
        .iter()
        .position(|c| *c == PcCall::SetRemote(offer.clone()))
        .unwrap();
    let create = calls.iter().position(|c| *c == PcCall::CreateAnswer).unwrap();
    let set_local = calls
        .iter()
        .position(|c| *c == PcCall::SetLocal(answer.clone()))
        .unwrap();
    assert!(set_remote < create && create < set_local);

    assert_eq!(engine.state().await, SessionState::Connected);
    assert_eq!(engine.role().await, Some(Role::Answerer));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(remote.drain_sent().is_empty());
    assert!(log.errors().is_empty());
}
