//! Entry point for the edusync-server binary.

use edusync_server::{
    AppState, build_app,
    config::{LogFormat, ServerConfig},
    routes::docs::load_document_store,
};
use edusync_store::{Store, StoreConfig};
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level, config.log_format);

    tracing::info!("Starting edusync-server");
    tracing::info!(
        "Configuration: port={}, log_level={}, docs_path={}",
        config.port,
        config.log_level,
        config.docs_path.display()
    );
    if config.session_secret_generated {
        tracing::warn!("SESSION_SECRET not set, bearer tokens will not survive a restart");
    }

    // Load the API description
    let docs = load_document_store(&config.docs_path)?;

    // Connect to database; nothing is served without it
    let store_config = StoreConfig::from_env()?;
    let store = match Store::connect(store_config).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, "Datastore initialization failed, not starting listener");
            return Err(e.into());
        }
    };
    tracing::info!("Connected to database");

    // Build application state and router
    let addr = config.socket_addr();
    let state = AppState::new(store, config, docs);
    let app = build_app(state);

    // Create listener
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber.
fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let (text, json) = match format {
        LogFormat::Text => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .init();
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
