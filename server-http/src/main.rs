use axum::{extract::Request, ServiceExt};
use itemstore::{InitState, RetryPolicy};
use server_http::{build_router, AppState};
use shared::config::Config;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env first so RUST_LOG from it applies to the subscriber
    let dotenv = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting item service...");

    match dotenv {
        Ok(_) => info!("Loaded environment variables from .env file"),
        Err(_) => info!("No .env file found, using system environment variables"),
    }

    let config = Config::from_env();
    info!("Running in {} environment", config.environment);

    let state = AppState::from_config(&config);

    // Initialize the backing store in the background so liveness is served
    // while it comes up; requests that need it retry on their own.
    if config.store_enabled() {
        let items = state.items.clone();
        let policy = RetryPolicy::from(&config.init);
        tokio::spawn(async move {
            match items.initializer().ensure_ready_with_retry(policy).await {
                InitState::Ready => info!("Backing store initialized"),
                InitState::NotStarted => {
                    warn!("Backing store unavailable after {} attempts", policy.attempts)
                }
            }
        });
    } else {
        warn!(
            "Backing store disabled in '{}' environment; data endpoints will answer 503",
            config.environment
        );
    }

    let app = build_router(state);

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("HTTP Server listening on http://{}", config.bind_address());
    info!("Try: curl http://localhost:{}/health", config.port);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }

    info!("Shutting down gracefully...");
}
