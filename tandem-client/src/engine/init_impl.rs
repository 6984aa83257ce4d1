use crate::capability::{LocalTrack, RtcBackend};
use crate::engine::{EngineInner, EngineService, SessionState, TandemEngine};
use crate::error::EngineError;
use crate::events::EngineEvent;
use crate::signaling::SignalingConnector;
use tokio::sync::mpsc;
use tracing::{error, info};

impl<B: RtcBackend, C: SignalingConnector> TandemEngine<B, C> {
    /// Acquire local media, open the signaling link and start dispatching.
    ///
    /// A failure is terminal for this engine: it is emitted as an `error`
    /// event, the session moves to `Closed`, and the error is returned.
    pub async fn init(&self) -> Result<(), EngineError> {
        let service = &self.service;
        let mut inner = service.inner.lock().await;
        if inner.state != SessionState::Idle {
            return Err(inner.invalid("init"));
        }

        let constraints = &service.config.media_constraints;
        let stream = match service.backend.acquire_media(constraints).await {
            Ok(stream) => stream,
            Err(e) => {
                let err = EngineError::MediaAcquisition(e.to_string());
                return Err(service.fail_init(&mut inner, err));
            }
        };
        info!(
            "Acquired local stream {} ({} tracks: {:?})",
            stream.id,
            stream.tracks.len(),
            stream.tracks.iter().map(|t| t.kind()).collect::<Vec<_>>()
        );

        let url = &service.config.signaling_url;
        let mut link = match self.connector.open(url).await {
            Ok(link) => link,
            Err(err) => {
                stream.stop_all();
                return Err(service.fail_init(&mut inner, err));
            }
        };

        let Some(inbound) = link.take_inbound() else {
            stream.stop_all();
            let err = EngineError::SignalingSend("signaling link already consumed".into());
            return Err(service.fail_init(&mut inner, err));
        };

        let (peer_tx, peer_rx) = mpsc::unbounded_channel();
        inner.local_stream = Some(stream);
        inner.link = Some(link);
        inner.peer_tx = Some(peer_tx);
        inner.state = SessionState::Initializing;
        drop(inner);

        tokio::spawn(service.clone().run_dispatcher(inbound, peer_rx));
        info!("Engine initialized, signaling via {}", url);

        Ok(())
    }
}

impl<B: RtcBackend> EngineService<B> {
    fn fail_init(&self, inner: &mut EngineInner<B>, err: EngineError) -> EngineError {
        error!("Initialization failed: {}", err);
        inner.state = SessionState::Closed;
        self.events.emit(EngineEvent::Error(err.clone()));
        err
    }
}
