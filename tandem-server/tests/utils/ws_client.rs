use anyhow::{Context, Result, bail};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tandem_core::{ClientFrame, ConnectionId, ServerFrame};
use tandem_server::{AppState, serve};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// Timeout for a single frame to arrive (ms).
pub const FRAME_TIMEOUT_MS: u64 = 2000;

/// Starts a relay on an ephemeral port and returns its address.
pub async fn spawn_server() -> Result<(SocketAddr, Arc<AppState>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = Arc::new(AppState::new());

    tokio::spawn({
        let state = state.clone();
        async move {
            let _ = serve(listener, state).await;
        }
    });

    Ok((addr, state))
}

/// Minimal signaling client speaking the relay's JSON frames.
pub struct WsTestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    pub connection_id: ConnectionId,
}

impl WsTestClient {
    /// Connects and consumes the welcome frame.
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let url = format!("ws://{}/ws", addr);
        let (stream, _) = connect_async(url).await.context("WebSocket connect failed")?;

        let mut client = Self {
            stream,
            connection_id: ConnectionId::new(),
        };

        match client.next_frame().await? {
            ServerFrame::Welcome { connection_id } => client.connection_id = connection_id,
            other => bail!("Expected welcome, got {:?}", other),
        }

        Ok(client)
    }

    pub async fn send(&mut self, frame: &ClientFrame) -> Result<()> {
        self.send_raw(&frame.encode()?).await
    }

    pub async fn send_raw(&mut self, text: &str) -> Result<()> {
        self.stream
            .send(Message::Text(text.to_string().into()))
            .await
            .context("WebSocket send failed")
    }

    pub async fn next_frame(&mut self) -> Result<ServerFrame> {
        loop {
            let next = tokio::time::timeout(
                Duration::from_millis(FRAME_TIMEOUT_MS),
                self.stream.next(),
            )
            .await
            .context("Timeout waiting for frame")?;

            match next {
                Some(Ok(Message::Text(text))) => return Ok(ServerFrame::decode(text.as_str())?),
                Some(Ok(Message::Close(_))) | None => bail!("Connection closed"),
                Some(Ok(_)) => continue,
                Some(Err(e)) => bail!("WebSocket error: {}", e),
            }
        }
    }

    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await.context("WebSocket close failed")
    }
}
