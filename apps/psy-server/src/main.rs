use clap::Parser;
use psy_engine::{EngineConfig, PsychroService};
use psy_server::{AppState, ServerArgs, serve};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = ServerArgs::parse();

    let mut config = EngineConfig::load_or_default(args.config.as_deref())?;
    if let Some(backend) = &args.backend {
        config.backend = backend.clone();
    }
    let service = PsychroService::from_config(config)?;
    let state = AppState::new(service);

    let addr = args.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, backend = state.service.backend_name(), "listening");

    tokio::select! {
        result = serve(listener, state) => result?,
        _ = tokio::signal::ctrl_c() => info!("shutting down"),
    }
    Ok(())
}
