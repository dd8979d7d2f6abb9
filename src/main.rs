mod audit;
mod backend;
mod clock;
mod config;
mod error;
mod family;
mod handlers;
mod holidays;
mod metrics;
mod models;
mod rate_limit;
mod session;
mod state;
mod validation;

use std::sync::Arc;

use clap::Parser; // for cli
use tokio::net::TcpListener;
use tokio::signal::{self, ctrl_c};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::audit::{AuditSink, audit_worker};
use crate::clock::{Clock, SystemClock};
use crate::config::Args;
use crate::state::AppState;

// this is main async function with tokio
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "giftlist_gateway=info,audit=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // parse cli arguments
    let args = Args::parse();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let limiter = rate_limit::build(&args, clock.clone()).await?;
    let backend = backend::build(&args)?;

    // spawn the background audit worker
    let (audit, audit_rx) = AuditSink::channel(args.audit_capacity());
    tokio::spawn(audit_worker(audit_rx));

    // creating shared state
    let state = Arc::new(AppState {
        limiter,
        clock,
        audit,
        backend,
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = TcpListener::bind(&addr).await?;

    info!("Gateway running on http://localhost:{}", args.port);
    info!("Backend: {:?}", args.backend);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
