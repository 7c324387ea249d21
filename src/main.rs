//! SwishTicker Back binary entrypoint wiring the key-value store, query engine, and REST layer.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swish_ticker_back::{
    config::{AppConfig, StorageConfig},
    dao::{
        kv_store::{FileStore, KeyValueStore, MemoryStore},
        query_engine::QueryEngine,
    },
    routes,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let store = open_store(&config.storage).await?;
    let engine = QueryEngine::init(store);
    engine
        .health_check()
        .await
        .context("key-value store failed its initial health check")?;

    let app = build_router(AppState::new(engine));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Open the configured key-value backend.
async fn open_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    match config {
        StorageConfig::Memory => {
            info!("using in-memory store; data will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageConfig::File { path } => {
            let store = FileStore::open(path)
                .await
                .with_context(|| format!("opening store file `{}`", path.display()))?;
            Ok(Arc::new(store))
        }
        StorageConfig::Couch => open_couch_store().await,
    }
}

#[cfg(feature = "couch-store")]
async fn open_couch_store() -> anyhow::Result<Arc<dyn KeyValueStore>> {
    use swish_ticker_back::dao::kv_store::couchdb::{CouchConfig, CouchKvStore};

    let config = CouchConfig::from_env().context("reading CouchDB configuration")?;
    let store = CouchKvStore::connect(config)
        .await
        .context("connecting to CouchDB")?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "couch-store"))]
async fn open_couch_store() -> anyhow::Result<Arc<dyn KeyValueStore>> {
    anyhow::bail!("the couch backend requires building with the `couch-store` feature")
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
