use tandem_client::SessionState;
use tandem_core::{ClientFrame, ConnectionId, SessionDescription, SignalType, UserId};

use crate::integration::{candidate_value, init_tracing, scripted_peer};
use crate::utils::{MockBehavior, PcCall, wait_until};

#[tokio::test]
async fn test_self_echo_is_ignored() {
    init_tracing();

    let (engine, backend, log, mut remote) = scripted_peer("A", "a", MockBehavior::default()).await;
    assert!(matches!(remote.next_sent().await, ClientFrame::Join(_)));

    let own = ConnectionId::new();
    remote.welcome(own);
    let engine_ref = &engine;
    assert!(wait_until(1000, || async move { engine_ref.connection_id().await == Some(own) }).await);

    let offer = Some(SessionDescription::offer("v=0 echo").to_value());
    let answer = Some(SessionDescription::answer("v=0 echo").to_value());

    // Echoes of our own user id, whatever connection they claim.
    remote.push(SignalType::UserJoin, "R1", "a", None, None);
    remote.push(SignalType::Offer, "R1", "a", Some(ConnectionId::new()), offer.clone());
    remote.push(SignalType::Answer, "R1", "a", None, answer);
    remote.push(SignalType::Candidate, "R1", "a", None, Some(candidate_value()));
    remote.push(SignalType::UserLeft, "R1", "a", None, None);

    // Anything stamped with our connection id, whatever user it claims.
    remote.push(SignalType::UserJoin, "R1", "mallory", Some(own), None);
    remote.push(SignalType::Offer, "R1", "mallory", Some(own), offer);
    remote.push(SignalType::Candidate, "R1", "mallory", Some(own), Some(candidate_value()));
    remote.push(SignalType::UserLeft, "R1", "mallory", Some(own), None);

    // A genuine peer afterwards still negotiates normally.
    remote.push(SignalType::UserJoin, "R1", "b", Some(ConnectionId::new()), None);
    assert!(matches!(remote.next_sent().await, ClientFrame::Offer(_)));

    assert_eq!(engine.state().await, SessionState::Negotiating);
    assert_eq!(engine.remote_peer().await, Some(UserId::from("b")));
    assert_eq!(
        backend
            .count(|c| matches!(
                c,
                PcCall::SetRemote(_) | PcCall::CreateAnswer | PcCall::AddIceCandidate(_)
            ))
            .await,
        0
    );
    assert_eq!(backend.count(|c| *c == PcCall::CreateOffer).await, 1);
    assert!(log.all().is_empty());
}
