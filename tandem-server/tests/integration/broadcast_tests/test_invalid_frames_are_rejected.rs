use serde_json::json;
use tandem_core::{ClientFrame, ConnectionId, Envelope, ProtocolError, SignalType};
use tandem_server::RelayError;

use crate::integration::{create_test_relay, init_tracing, join, settle};

#[tokio::test]
async fn test_invalid_frames_are_rejected() {
    init_tracing();

    let (relay, _rx, output) = create_test_relay();
    let conn_a = join(&relay, "R1", "a").await;
    settle(&relay, "R1").await;
    output.clear().await;

    let no_room = ClientFrame::Offer(
        Envelope::new("".into(), "a".into()).with_data(json!({ "type": "offer", "sdp": "" })),
    );
    let err = relay.dispatch(conn_a, no_room).await.unwrap_err();
    assert!(matches!(
        err,
        RelayError::Protocol(ProtocolError::MissingRoomId(_))
    ));

    let no_data = ClientFrame::Answer(Envelope::new("R1".into(), "a".into()));
    let err = relay.dispatch(conn_a, no_data).await.unwrap_err();
    assert!(matches!(
        err,
        RelayError::Protocol(ProtocolError::MissingPayload(_))
    ));

    let err = relay
        .relay(
            ConnectionId::new(),
            SignalType::UserJoin,
            Envelope::new("R1".into(), "x".into()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RelayError::NotRelayable(SignalType::UserJoin)));

    assert_eq!(settle(&relay, "R1").await, 1);
    assert!(output.all().await.is_empty());
}
