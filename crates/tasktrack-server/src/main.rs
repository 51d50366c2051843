//! tasktrack server

use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tasktrack_server::{http, AppState, Config};

/// Multi-user task tracking server.
#[derive(Parser, Debug)]
#[command(name = "tasktrack-server", about = "Task tracking API server")]
struct Args {
    /// HTTP server address
    #[arg(long, env = "SERVER_ADDR", default_value = "0.0.0.0:8080")]
    addr: String,

    /// Minutes before an open task is auto-completed
    #[arg(long, env = "AUTO_COMPLETE_MINUTES", default_value = "5")]
    auto_complete_minutes: u64,

    /// Seconds between auto-complete reconciliation sweeps
    #[arg(long, env = "SCAN_INTERVAL_SECS", default_value = "60")]
    scan_interval_secs: u64,

    /// Auto-complete queue capacity
    #[arg(long, env = "WORKER_QUEUE_CAPACITY", default_value = "100")]
    queue_capacity: usize,

    /// Number of auto-complete consumers
    #[arg(long, env = "WORKER_POOL_SIZE", default_value = "5")]
    pool_size: usize,

    /// Bearer token lifetime in hours
    #[arg(long, env = "TOKEN_EXPIRY_HOURS", default_value = "24")]
    token_expiry_hours: u64,

    /// bcrypt cost for password hashes
    #[arg(long, env = "BCRYPT_COST", default_value = "12")]
    password_cost: u32,

    /// Seconds to wait for the worker at shutdown
    #[arg(long, env = "SHUTDOWN_TIMEOUT_SECS", default_value = "10")]
    shutdown_timeout_secs: u64,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            http_bind_addr: args.addr,
            auto_complete_minutes: args.auto_complete_minutes,
            scan_interval_secs: args.scan_interval_secs,
            queue_capacity: args.queue_capacity,
            pool_size: args.pool_size,
            token_expiry_hours: args.token_expiry_hours,
            password_cost: args.password_cost,
            shutdown_timeout_secs: args.shutdown_timeout_secs,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tasktrack=info")),
        )
        .with_target(true)
        .init();

    let config = Config::from(args);
    config.validate()?;
    let addr = config.socket_addr()?;
    let shutdown_timeout = config.shutdown_timeout();

    let state = AppState::new(config);

    let cancel = CancellationToken::new();
    let worker = state.worker.start(cancel.clone());

    let router = http::create_router(state);
    let listener = TcpListener::bind(addr).await?;

    info!(http_addr = %addr, "tasktrack server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await?;

    info!("HTTP server stopped, waiting for auto-complete worker");
    cancel.cancel();

    if tokio::time::timeout(shutdown_timeout, worker.join())
        .await
        .is_err()
    {
        warn!(
            timeout_secs = shutdown_timeout.as_secs(),
            "Auto-complete worker did not stop in time"
        );
    }

    info!("tasktrack server stopped");
    Ok(())
}

/// Resolve on Ctrl-C, SIGTERM, or when `cancel` fires elsewhere.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
        _ = cancel.cancelled() => {}
    }
}
