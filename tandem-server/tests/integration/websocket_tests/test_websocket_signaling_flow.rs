use serde_json::json;
use tandem_core::{ClientFrame, Envelope, RelayEvent, RoomId, ServerFrame, SignalType, UserId};

use crate::integration::{init_tracing, join_frame};
use crate::utils::{WsTestClient, spawn_server};

fn expect_event(frame: ServerFrame) -> RelayEvent {
    match frame {
        ServerFrame::Message(event) => event,
        other => panic!("expected message frame, got {:?}", other),
    }
}

#[tokio::test]
async fn test_websocket_signaling_flow() {
    init_tracing();

    let (addr, state) = spawn_server().await.expect("server failed to start");

    let mut a = WsTestClient::connect(addr).await.expect("client a");
    let mut b = WsTestClient::connect(addr).await.expect("client b");
    assert_ne!(a.connection_id, b.connection_id);

    a.send(&join_frame("R1", "a")).await.unwrap();
    let echo = expect_event(a.next_frame().await.unwrap());
    assert_eq!(echo.kind, SignalType::UserJoin);
    assert_eq!(echo.data.connection_id, Some(a.connection_id));

    // Garbage and invalid frames are dropped without closing the socket.
    b.send_raw("not json at all").await.unwrap();
    b.send_raw(r#"{"topic":"/webrtc/join","payload":{"userId":"b"}}"#)
        .await
        .unwrap();
    b.send(&join_frame("R1", "b")).await.unwrap();

    let seen_by_a = expect_event(a.next_frame().await.unwrap());
    assert_eq!(seen_by_a.kind, SignalType::UserJoin);
    assert_eq!(seen_by_a.data.user_id, UserId::from("b"));
    let own_echo = expect_event(b.next_frame().await.unwrap());
    assert_eq!(own_echo.data.user_id, UserId::from("b"));

    let offer = ClientFrame::Offer(
        Envelope::new(RoomId::from("R1"), UserId::from("a"))
            .with_data(json!({ "type": "offer", "sdp": "v=0" })),
    );
    a.send(&offer).await.unwrap();

    let relayed = expect_event(b.next_frame().await.unwrap());
    assert_eq!(relayed.kind, SignalType::Offer);
    assert_eq!(relayed.data.data, Some(json!({ "type": "offer", "sdp": "v=0" })));
    let _ = a.next_frame().await.unwrap();

    assert_eq!(state.relay.member_count(&"R1".into()).await.unwrap(), 2);

    // Dropping b's socket removes it and notifies a.
    b.close().await.unwrap();
    let left = expect_event(a.next_frame().await.unwrap());
    assert_eq!(left.kind, SignalType::UserLeft);
    assert_eq!(left.data.user_id, UserId::from("b"));
    assert_eq!(state.relay.member_count(&"R1".into()).await.unwrap(), 1);
}
