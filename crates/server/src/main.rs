use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookmood_core::{
    load_config, validate_config, BookCatalog, BookProvider, BookSearchService, GoogleBooksClient,
    MoodRecommender, OpenLibraryClient, RecommendationStore, SqliteCatalog,
    SqliteRecommendationStore,
};

use bookmood_server::api::create_router;
use bookmood_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("BOOKMOOD_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);

    // Log config hash so deployments can be compared without leaking secrets
    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!("Config hash: {}", &config_hash[..16]);

    // Create SQLite catalog
    let catalog: Arc<dyn BookCatalog> = Arc::new(
        SqliteCatalog::new(&config.database.path).context("Failed to create book catalog")?,
    );
    info!("Book catalog initialized");

    // Create SQLite recommendation store
    let recommendations: Arc<dyn RecommendationStore> = Arc::new(
        SqliteRecommendationStore::new(&config.database.path)
            .context("Failed to create recommendation store")?,
    );
    info!("Recommendation store initialized");

    // Create external providers if configured. Provider order matters:
    // earlier providers win deduplication ties in combined search.
    let mut providers: Vec<Arc<dyn BookProvider>> = Vec::new();
    if let Some(ref providers_config) = config.providers {
        if let Some(ref google_config) = providers_config.google_books {
            match GoogleBooksClient::new(google_config.clone()) {
                Ok(client) => {
                    info!("Initializing Google Books client");
                    providers.push(Arc::new(client));
                }
                Err(e) => error!("Failed to create Google Books client: {}", e),
            }
        }
        if let Some(ref open_library_config) = providers_config.open_library {
            match OpenLibraryClient::new(open_library_config.clone()) {
                Ok(client) => {
                    info!("Initializing Open Library client");
                    providers.push(Arc::new(client));
                }
                Err(e) => error!("Failed to create Open Library client: {}", e),
            }
        }
    }
    if providers.is_empty() {
        info!("No external providers configured, search is local-only");
    }

    // Create search service and recommender
    let search = Arc::new(BookSearchService::new(Arc::clone(&catalog), providers));
    let recommender = Arc::new(MoodRecommender::new(
        Arc::clone(&catalog),
        Arc::clone(&recommendations),
    ));

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        catalog,
        search,
        recommender,
        recommendations,
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
