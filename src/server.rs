use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal::unix::{SignalKind, signal};
use tracing::{info, warn};

use crate::config::Config;
use crate::http;
use crate::service::FormService;

fn listen_addr(raw: &str) -> String {
    if raw.parse::<SocketAddr>().is_ok() {
        raw.to_string()
    } else if let Some(port) = raw.strip_prefix(':') {
        format!("0.0.0.0:{port}")
    } else {
        format!("0.0.0.0:{raw}")
    }
}

async fn shutdown_signal() {
    let mut term = match signal(SignalKind::terminate()) {
        Ok(s) => Some(s),
        Err(e) => {
            warn!(error = %e, "failed to install SIGTERM handler");
            None
        }
    };
    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                warn!(error = %e, "failed to listen for ctrl-c");
            }
        }
        _ = async {
            match term.as_mut() {
                Some(t) => { t.recv().await; }
                None => std::future::pending::<()>().await,
            }
        } => {}
    }
    info!("shutdown requested");
}

/// Open the databases, serve HTTP until a shutdown signal arrives, then
/// close the connection pools.
///
/// # Errors
///
/// Returns an error if a database cannot be opened or the listener cannot be
/// bound. Nothing is retried.
pub async fn run(cfg: Config) -> Result<(), Box<dyn Error + Send + Sync>> {
    let service = Arc::new(FormService::open(&cfg).await?);
    let addr = listen_addr(&cfg.addr);
    let listener = TcpListener::bind(&addr).await?;
    info!("listening on {addr}");

    let app = http::router(service.clone());
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    service.close().await;
    info!("connections closed");
    served?;
    Ok(())
}
