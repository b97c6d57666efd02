//! psy-server: HTTP surface for the psychrometric engine.

pub mod api;
pub mod error;
pub mod routes;
pub mod settings;

use std::sync::Arc;

use hyper::server::conn::Http;
use hyper::service::service_fn;
use tokio::net::TcpListener;
use tracing::{debug, warn};

pub use error::ApiError;
pub use routes::{AppState, MAX_BODY_BYTES, handle};
pub use settings::ServerArgs;

/// Accept connections forever, one task per connection.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        stream.set_nodelay(true).ok();
        debug!(%peer, "accepted connection");

        let state = state.clone();
        tokio::spawn(async move {
            let service = service_fn(move |req| handle(state.clone(), req));
            if let Err(e) = Http::new().serve_connection(stream, service).await {
                warn!(%peer, error = %e, "error serving connection");
            }
        });
    }
}
