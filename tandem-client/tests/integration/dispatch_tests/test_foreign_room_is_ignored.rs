use tandem_client::SessionState;
use tandem_core::{ClientFrame, ConnectionId, SessionDescription, SignalType};

use crate::integration::{init_tracing, scripted_peer};
use crate::utils::{MockBehavior, PcCall};

#[tokio::test]
async fn test_foreign_room_is_ignored() {
    init_tracing();

    let (engine, backend, log, mut remote) = scripted_peer("B", "b", MockBehavior::default()).await;
    assert!(matches!(remote.next_sent().await, ClientFrame::Join(_)));

    let conn = Some(ConnectionId::new());
    let offer = Some(SessionDescription::offer("v=0 elsewhere").to_value());
    remote.push(SignalType::Offer, "R2", "a", conn, offer);
    remote.push(SignalType::UserLeft, "R2", "a", conn, None);

    // Processed in order, so once this answer is out the earlier frames were seen.
    let offer = Some(SessionDescription::offer("v=0 here").to_value());
    remote.push(SignalType::Offer, "R1", "a", conn, offer);
    assert!(matches!(remote.next_sent().await, ClientFrame::Answer(_)));

    assert_eq!(engine.state().await, SessionState::Connected);
    assert_eq!(
        backend.count(|c| matches!(c, PcCall::SetRemote(_))).await,
        1
    );
    assert!(log.all().is_empty());
}
