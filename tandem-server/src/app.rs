use crate::{Relay, RelayHandle, SignalingService, ws_handler};
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tandem_core::utils::SIGNALING_PATH;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const HEALTH_RESPONSE: &str = "Signaling server is running";

pub struct AppState {
    pub signaling: SignalingService,
    pub relay: RelayHandle,
}

impl AppState {
    /// Creates the socket registry and starts a relay loop delivering into it.
    pub fn new() -> Self {
        let signaling = SignalingService::new();
        let relay = Relay::spawn(Arc::new(signaling.clone()));

        Self { signaling, relay }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route(SIGNALING_PATH, get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}

async fn health() -> &'static str {
    HEALTH_RESPONSE
}
