use clap::Parser;
use std::net::SocketAddr;
use tandem_core::utils::DEFAULT_SIGNALING_PORT;

#[derive(Debug, Clone, Parser)]
#[command(name = "tandem-server", version, about = "Room-scoped WebRTC signaling relay")]
pub struct ServerConfig {
    /// Address the relay listens on.
    #[arg(
        long,
        env = "TANDEM_BIND",
        default_value_t = SocketAddr::from(([0, 0, 0, 0], DEFAULT_SIGNALING_PORT))
    )]
    pub bind: SocketAddr,

    /// Log filter in `RUST_LOG` syntax.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log: String,
}
