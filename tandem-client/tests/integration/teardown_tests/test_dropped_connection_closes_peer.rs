use tandem_client::{ErrorKind, SessionState};

use crate::integration::{connected_pair, init_tracing, wait_for_members};
use crate::utils::{LoopbackRelay, Recorded, wait_for_state, wait_until};

#[tokio::test]
async fn test_dropped_connection_closes_peer() {
    init_tracing();

    let relay = LoopbackRelay::new();
    let ((a, _backend_a, log_a), (b, _backend_b, log_b)) =
        connected_pair(&relay, "R1", "a", "b").await;

    let conn_b = b.connection_id().await.expect("no welcome received");
    relay.drop_connection(conn_b).await;

    assert!(wait_for_state(&a, SessionState::Closed, 2000).await);
    assert_eq!(log_a.count(&Recorded::Disconnect), 1);

    // The dropped side learns its channel is gone but stays up until told.
    let log = &log_b;
    assert!(
        wait_until(2000, || async move {
            log.errors().contains(&ErrorKind::SignalingSend)
        })
        .await
    );
    assert_eq!(b.state().await, SessionState::Connected);

    b.disconnect().await;
    assert_eq!(b.state().await, SessionState::Closed);
    assert_eq!(log_b.count(&Recorded::Disconnect), 1);
    assert!(wait_for_members(&relay, "R1", 0).await);
}
