//! Opsdriver remote collection server
//!
//! Serves the four collections over HTTP so several clients can share one
//! copy of the data. Storage is one JSON file per collection.
//!
//! # Configuration
//!
//! Environment variables:
//! - `OPSDRIVER_PORT`: Port to listen on (default: 8080)
//! - `OPSDRIVER_SERVER_DATA_DIR`: Directory for collection files (default: ~/.local/share/opsdriver-server)
//!
//! # Endpoints
//!
//! - `GET /health`: Health check
//! - `GET /api/{collection}`: Collection as a JSON array
//! - `POST /api/{collection}`: Apply an `add|update|delete|replace` op

use std::net::SocketAddr;
use std::path::PathBuf;

use opsdriver::server::{router, CollectionStorage};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Server configuration
#[derive(Debug, Clone)]
struct Config {
    /// Port to listen on
    port: u16,
    /// Directory to store collection files
    data_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        let port = std::env::var("OPSDRIVER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let data_dir = std::env::var("OPSDRIVER_SERVER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("opsdriver-server")
            });

        Self { port, data_dir }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "opsdriver=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    std::fs::create_dir_all(&config.data_dir)?;
    tracing::info!("Data directory: {}", config.data_dir.display());

    let app = router(CollectionStorage::new(config.data_dir)).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
