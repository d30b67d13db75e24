use anyhow::Result;
use clap::Parser;
use marketsearch_core::{EngineConfig, FanOut, FileCatalog, IndexManager};
use server::{build_app, spawn_refresh_loop};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Catalog file or directory of .json/.jsonl files
    #[arg(long, default_value = "./catalog")]
    catalog: PathBuf,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Seconds between background index rebuilds
    #[arg(long, default_value_t = 30)]
    refresh_secs: u64,
    /// Field scheduling for indexing and search: sequential or per_field
    #[arg(long, default_value = "sequential")]
    fan_out: FanOut,
    /// Maximum number of ranked search results
    #[arg(long, default_value_t = 100)]
    max_results: usize,
    /// Token required by POST /index/refresh
    #[arg(long, env = "ADMIN_TOKEN", hide_env_values = true)]
    admin_token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let config = EngineConfig {
        refresh_interval: Duration::from_secs(args.refresh_secs.max(1)),
        fan_out: args.fan_out,
        max_results: args.max_results,
    };
    let refresh_interval = config.refresh_interval;
    let manager = Arc::new(IndexManager::new(Arc::new(FileCatalog::new(&args.catalog)), config));

    // Serve an empty index rather than refuse to start; the loop retries.
    let initial = manager.clone();
    if tokio::task::spawn_blocking(move || initial.refresh()).await?.is_err() {
        tracing::warn!(catalog = %args.catalog.display(), "starting with an empty index");
    }
    spawn_refresh_loop(manager.clone(), refresh_interval);

    let app = build_app(manager, args.admin_token);
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
