//! Command-line and environment settings.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_PORT: u16 = 7000;

#[derive(Parser, Debug, Clone)]
#[command(name = "psy-server")]
#[command(version, about = "Psychrometric calculation HTTP service", long_about = None)]
pub struct ServerArgs {
    /// Address to bind
    #[arg(long, env = "PSYCHRO_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on (falls back to PORT, then 7000)
    #[arg(long, env = "PSYCHRO_PORT")]
    pub port: Option<u16>,

    /// Engine configuration YAML
    #[arg(long, env = "PSYCHRO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Property backend, overriding the config file
    #[arg(long)]
    pub backend: Option<String>,
}

impl ServerArgs {
    pub fn socket_addr(&self) -> SocketAddr {
        let port = self
            .port
            .or_else(|| std::env::var("PORT").ok()?.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        SocketAddr::new(self.host, port)
    }
}
