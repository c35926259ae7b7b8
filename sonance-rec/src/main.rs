//! sonance-rec - track recommendation HTTP service
//!
//! Loads the vector and metadata files once at startup and serves search and
//! recommendation endpoints over the immutable store.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sonance_common::config::{ConfigOverrides, ServiceConfig};
use sonance_rec::api::buildinfo::BuildInfo;
use sonance_rec::store::init_shared_store;
use sonance_rec::{build_router, AppState, RecommendationService};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for sonance-rec
#[derive(Parser, Debug)]
#[command(name = "sonance-rec")]
#[command(about = "Track recommendation service over a file-backed vector index")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long, env = "SONANCE_CONFIG")]
    config: Option<PathBuf>,

    /// Folder holding features.json and meta.json
    #[arg(short, long, env = "SONANCE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Vector file (overrides --data-dir)
    #[arg(long)]
    features: Option<PathBuf>,

    /// Metadata file (overrides --data-dir)
    #[arg(long)]
    meta: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    bind: Option<String>,
}

impl From<Args> for ConfigOverrides {
    fn from(args: Args) -> Self {
        Self {
            config_path: args.config,
            data_dir: args.data_dir,
            features_path: args.features,
            meta_path: args.meta,
            port: args.port,
            bind: args.bind,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // The filter depends on the configured level, so tracing starts after resolution
    let config = ServiceConfig::resolve(args.into()).context("Failed to resolve configuration")?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let level = &config.logging.level;
            format!("sonance_rec={level},sonance_common={level},tower_http={level}").into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let build = BuildInfo::current();
    info!(
        "Starting sonance-rec v{} [{}] built {} ({})",
        build.version, build.git_hash, build.build_timestamp, build.build_profile
    );
    info!("Data folder: {}", config.data_dir.display());

    let store = match init_shared_store(&config.store) {
        Ok(store) => {
            info!("✓ Vector store ready: {} tracks, dim {}", store.len(), store.dim());
            store
        }
        Err(e) => {
            error!("Failed to load vector store: {}", e);
            return Err(e.into());
        }
    };

    let service = Arc::new(RecommendationService::new(store, config.recommend.clone()));
    let app = build_router(AppState::new(service));

    let addr = format!("{}:{}", config.bind, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("sonance-rec listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
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
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
