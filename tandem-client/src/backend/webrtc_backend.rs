//! `RtcBackend` on top of webrtc-rs.
//!
//! Local tracks are `TrackLocalStaticSample`s: the embedder owns capture and
//! feeds encoded samples through [`SampleTrack::write_sample`]. Remote tracks
//! are surfaced as `Arc<TrackRemote>`.
//!
//! Every connection opens its `webrtc-chat` channel before the first offer so
//! the SDP carries an application section; text from the remote side's
//! channel is read through [`WebRtcConnection::incoming_text`].

use crate::capability::{
    LocalStream, LocalTrack, PeerConnection, PeerEvent, PeerEventSender, RtcBackend, TrackKind,
};
use crate::error::BackendError;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tandem_core::utils::TEXT_CHANNEL_LABEL;
use tandem_core::{IceCandidate, IceServerConfig, MediaConstraints, SdpType, SessionDescription};
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{debug, info, warn};
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8, MediaEngine};
use webrtc::api::{API, APIBuilder};
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::media::Sample;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_remote::TrackRemote;

const LOCAL_STREAM_ID: &str = "tandem-local";
const DATA_CHANNEL_OPEN_TIMEOUT: Duration = Duration::from_secs(10);

pub struct SampleTrack {
    track: Arc<TrackLocalStaticSample>,
    kind: TrackKind,
    stopped: AtomicBool,
}

impl SampleTrack {
    pub fn new(kind: TrackKind, stream_id: &str) -> Self {
        let (mime_type, id) = match kind {
            TrackKind::Audio => (MIME_TYPE_OPUS, "audio"),
            TrackKind::Video => (MIME_TYPE_VP8, "video"),
        };
        let track = TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: mime_type.to_owned(),
                ..Default::default()
            },
            id.to_owned(),
            stream_id.to_owned(),
        );

        Self {
            track: Arc::new(track),
            kind,
            stopped: AtomicBool::new(false),
        }
    }

    /// Push one encoded sample from the embedder's capture pipeline. Refused
    /// once the track is stopped.
    pub async fn write_sample(&self, sample: &Sample) -> Result<(), BackendError> {
        if self.is_stopped() {
            return Err(BackendError::new(format!("{:?} track is stopped", self.kind)));
        }
        self.track.write_sample(sample).await?;
        Ok(())
    }
}

impl LocalTrack for SampleTrack {
    fn id(&self) -> String {
        self.track.id().to_owned()
    }

    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            debug!("Stopped local {:?} track", self.kind);
        }
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

pub struct WebRtcBackend {
    api: Arc<API>,
}

impl WebRtcBackend {
    pub fn new() -> Result<Self, BackendError> {
        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;

        let mut registry = Registry::new();
        registry = register_default_interceptors(registry, &mut media_engine)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        Ok(Self { api: Arc::new(api) })
    }

    fn rtc_config(ice_servers: &[IceServerConfig]) -> RTCConfiguration {
        RTCConfiguration {
            ice_servers: ice_servers
                .iter()
                .map(|s| RTCIceServer {
                    urls: s.urls.clone(),
                    username: s.username.clone().unwrap_or_default(),
                    credential: s.credential.clone().unwrap_or_default(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl RtcBackend for WebRtcBackend {
    type Track = SampleTrack;
    type RemoteStream = Arc<TrackRemote>;
    type Connection = WebRtcConnection;

    async fn acquire_media(
        &self,
        constraints: &MediaConstraints,
    ) -> Result<LocalStream<SampleTrack>, BackendError> {
        if constraints.is_empty() {
            return Err(BackendError::new("neither audio nor video requested"));
        }

        let mut tracks = Vec::new();
        if constraints.audio {
            tracks.push(Arc::new(SampleTrack::new(TrackKind::Audio, LOCAL_STREAM_ID)));
        }
        if constraints.video {
            tracks.push(Arc::new(SampleTrack::new(TrackKind::Video, LOCAL_STREAM_ID)));
        }

        Ok(LocalStream::new(LOCAL_STREAM_ID, tracks))
    }

    async fn create_peer_connection(
        &self,
        ice_servers: &[IceServerConfig],
        events: PeerEventSender<Arc<TrackRemote>>,
    ) -> Result<WebRtcConnection, BackendError> {
        let pc = Arc::new(
            self.api
                .new_peer_connection(Self::rtc_config(ice_servers))
                .await?,
        );

        let tx = events.clone();
        pc.on_ice_candidate(Box::new(move |candidate: Option<RTCIceCandidate>| {
            let tx = tx.clone();
            Box::pin(async move {
                let Some(candidate) = candidate else {
                    return;
                };
                match candidate.to_json() {
                    Ok(init) => {
                        let _ = tx.send(PeerEvent::IceCandidate(IceCandidate {
                            candidate: init.candidate,
                            sdp_mid: init.sdp_mid,
                            sdp_m_line_index: init.sdp_mline_index,
                            username_fragment: init.username_fragment,
                        }));
                    }
                    Err(e) => warn!("Failed to serialize local candidate: {}", e),
                }
            })
        }));

        let tx = events;
        pc.on_track(Box::new(
            move |track: Arc<TrackRemote>, _receiver, _transceiver| {
                let tx = tx.clone();
                Box::pin(async move {
                    info!(
                        "Remote track received: {} ({})",
                        track.kind(),
                        track.codec().capability.mime_type
                    );
                    let _ = tx.send(PeerEvent::Track(track));
                })
            },
        ));

        pc.on_peer_connection_state_change(Box::new(move |s: RTCPeerConnectionState| {
            Box::pin(async move {
                info!("Peer connection state changed: {:?}", s);
            })
        }));

        let (text_tx, text_rx) = mpsc::unbounded_channel();
        pc.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
            let text_tx = text_tx.clone();
            Box::pin(async move {
                if dc.label() != TEXT_CHANNEL_LABEL {
                    debug!("Ignoring remote data channel {}", dc.label());
                    return;
                }
                debug!("Remote {} channel announced", TEXT_CHANNEL_LABEL);
                dc.on_message(Box::new(move |msg: DataChannelMessage| {
                    let text_tx = text_tx.clone();
                    Box::pin(async move {
                        if !msg.is_string {
                            debug!("Dropping binary message on {}", TEXT_CHANNEL_LABEL);
                            return;
                        }
                        match String::from_utf8(msg.data.to_vec()) {
                            Ok(text) => {
                                let _ = text_tx.send(text);
                            }
                            Err(e) => warn!("Invalid UTF-8 on {}: {}", TEXT_CHANNEL_LABEL, e),
                        }
                    })
                }));
            })
        }));

        let text_channel = pc.create_data_channel(TEXT_CHANNEL_LABEL, None).await?;
        let (state_tx, text_state) = watch::channel(ChannelState::Connecting);
        let state_tx = Arc::new(state_tx);

        let tx = state_tx.clone();
        text_channel.on_open(Box::new(move || {
            Box::pin(async move {
                debug!("{} channel open", TEXT_CHANNEL_LABEL);
                let _ = tx.send(ChannelState::Open);
            })
        }));
        text_channel.on_close(Box::new(move || {
            let tx = state_tx.clone();
            Box::pin(async move {
                let _ = tx.send(ChannelState::Closed);
            })
        }));

        Ok(WebRtcConnection {
            pc,
            text_channel,
            text_state,
            incoming_text: Mutex::new(Some(text_rx)),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChannelState {
    Connecting,
    Open,
    Closed,
}

pub struct WebRtcConnection {
    pc: Arc<RTCPeerConnection>,
    text_channel: Arc<RTCDataChannel>,
    text_state: watch::Receiver<ChannelState>,
    incoming_text: Mutex<Option<mpsc::UnboundedReceiver<String>>>,
}

impl WebRtcConnection {
    fn to_rtc(desc: SessionDescription) -> Result<RTCSessionDescription, BackendError> {
        let desc = match desc.sdp_type {
            SdpType::Offer => RTCSessionDescription::offer(desc.sdp)?,
            SdpType::Answer => RTCSessionDescription::answer(desc.sdp)?,
            SdpType::Pranswer => RTCSessionDescription::pranswer(desc.sdp)?,
            SdpType::Rollback => return Err(BackendError::new("rollback is not supported")),
        };
        Ok(desc)
    }

    /// Text received on the remote side's `webrtc-chat` channel. Yields the
    /// receiver once; later calls return `None`.
    pub async fn incoming_text(&self) -> Option<mpsc::UnboundedReceiver<String>> {
        self.incoming_text.lock().await.take()
    }
}

#[async_trait]
impl PeerConnection for WebRtcConnection {
    type Track = SampleTrack;

    async fn add_track(&self, track: Arc<SampleTrack>, _stream_id: &str) -> Result<(), BackendError> {
        if track.is_stopped() {
            return Err(BackendError::new(format!("{:?} track is stopped", track.kind)));
        }
        self.pc
            .add_track(track.track.clone() as Arc<dyn TrackLocal + Send + Sync>)
            .await?;
        Ok(())
    }

    async fn create_offer(&self) -> Result<SessionDescription, BackendError> {
        let offer = self.pc.create_offer(None).await?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription, BackendError> {
        let answer = self.pc.create_answer(None).await?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), BackendError> {
        self.pc.set_local_description(Self::to_rtc(desc)?).await?;
        Ok(())
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), BackendError> {
        self.pc.set_remote_description(Self::to_rtc(desc)?).await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), BackendError> {
        self.pc
            .add_ice_candidate(RTCIceCandidateInit {
                candidate: candidate.candidate,
                sdp_mid: candidate.sdp_mid,
                sdp_mline_index: candidate.sdp_m_line_index,
                username_fragment: candidate.username_fragment,
            })
            .await?;
        Ok(())
    }

    async fn send_text(&self, label: &str, text: String) -> Result<(), BackendError> {
        if label != self.text_channel.label() {
            return Err(BackendError::new(format!("no data channel labelled {label}")));
        }

        let state = {
            let mut rx = self.text_state.clone();
            let ready = tokio::time::timeout(
                DATA_CHANNEL_OPEN_TIMEOUT,
                rx.wait_for(|s| *s != ChannelState::Connecting),
            )
            .await;
            match ready {
                Ok(Ok(state)) => *state,
                Ok(Err(_)) => ChannelState::Closed,
                Err(_) => return Err(BackendError::new(format!("{label} did not open in time"))),
            }
        };
        if state == ChannelState::Closed {
            return Err(BackendError::new(format!("{label} is closed")));
        }

        self.text_channel.send_text(text).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), BackendError> {
        self.pc.close().await?;
        Ok(())
    }
}
