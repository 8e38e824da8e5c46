use std::net::{IpAddr, SocketAddr};

use clap::Parser;

/// Command line and environment settings for `mindmap-server`.
#[derive(Debug, Clone, Parser)]
#[command(name = "mindmap-server", about = "Serves learning roadmaps over HTTP")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "MINDMAP_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "MINDMAP_PORT", default_value_t = 4000)]
    pub port: u16,

    /// Log filter used when `RUST_LOG` is unset
    #[arg(long, env = "MINDMAP_LOG", default_value = "mindmap_core=info,tower_http=info")]
    pub log: String,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
