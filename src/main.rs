//! group-index: serves approximate lookups over a JSON-lines entry file.
//!
//! The file is partitioned into fixed-width key groups; each group is read
//! on first lookup and kept in memory until capacity evicts it.

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use group_index::config::{Cli, Config};
use group_index::index::new_shared_index;
use group_index::metrics::IndexMetrics;
use group_index::providers::{Bucketing, JsonLinesProvider};
use group_index::server::api::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments.
    let cli = Cli::parse();

    // Initialize tracing/logging.
    let filter = if cli.verbose {
        "group_index=debug,tower_http=debug"
    } else {
        "group_index=info,tower_http=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_target(true)
        .init();

    info!("group-index v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration.
    let mut config = Config::load(&cli.config)?;
    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }
    config.validate()?;

    info!(
        source = %config.source.path.display(),
        group_width = config.source.group_width,
        max_groups = config.index.max_groups,
        recency = ?config.index.recency,
        "Configuration loaded"
    );

    if !config.source.path.exists() {
        tracing::warn!(
            "Entry file {:?} does not exist yet; lookups will fail until it does",
            config.source.path
        );
    }

    // Build the provider and index.
    let bucketing = Bucketing::new(config.source.group_width)?;
    let provider = JsonLinesProvider::new(config.source.path.clone(), bucketing);
    let index = new_shared_index(provider, &config.index);

    let state = Arc::new(AppState {
        index,
        metrics: IndexMetrics::new()?,
        start_time: Instant::now(),
    });

    // Build the HTTP router.
    let app = build_router(state);

    // Start the server.
    let listen_addr = config.server.listen;
    info!(addr = %listen_addr, "Starting server");

    let listener = TcpListener::bind(&listen_addr).await?;
    info!("Listening on {listen_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
