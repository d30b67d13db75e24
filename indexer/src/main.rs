use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use marketsearch_core::sort::{sort_with, Algorithm};
use marketsearch_core::{
    build_with, CatalogStore, Category, EngineConfig, FanOut, Field, FileCatalog, IndexManager, SortKey,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build, query and sort a marketplace catalog index", long_about = None)]
struct Cli {
    /// Catalog file or directory of .json/.jsonl files
    #[arg(long, global = true, default_value = "./catalog")]
    catalog: PathBuf,
    /// Field scheduling: sequential or per_field
    #[arg(long, global = true, default_value = "sequential")]
    fan_out: FanOut,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and report per-field term counts
    Stats,
    /// Run a query and print ranked items as JSON
    Search {
        query: String,
        /// Maximum number of results
        #[arg(short, default_value_t = 10)]
        k: usize,
    },
    /// Print the catalog sorted for browsing
    Browse {
        /// popularity, rating, price_asc or price_desc
        #[arg(long, default_value = "popularity")]
        sort_by: String,
        /// Restrict to one category (label or slug)
        #[arg(long)]
        category: Option<String>,
        /// intro, insertion, merge or tim
        #[arg(long, default_value = "intro")]
        algorithm: Algorithm,
    },
}

#[derive(Serialize)]
struct IndexStats {
    catalog: String,
    built_at: String,
    items: usize,
    name_terms: usize,
    description_terms: usize,
    keyword_terms: usize,
    build_ms: u128,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let store = FileCatalog::new(&cli.catalog);

    match cli.command {
        Commands::Stats => stats(&store, cli.fan_out),
        Commands::Search { query, k } => search(store, cli.fan_out, &query, k),
        Commands::Browse { sort_by, category, algorithm } => browse(&store, &sort_by, category.as_deref(), algorithm),
    }
}

fn stats(store: &FileCatalog, fan_out: FanOut) -> Result<()> {
    let items = store
        .all_searchable_items()
        .with_context(|| format!("loading catalog from {}", store.path().display()))?;
    let start = Instant::now();
    let snapshot = build_with(&items, fan_out);
    let build_ms = start.elapsed().as_millis();

    let stats = IndexStats {
        catalog: store.path().display().to_string(),
        built_at: time::OffsetDateTime::from(snapshot.built_at())
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "".into()),
        items: snapshot.item_count(),
        name_terms: snapshot.term_count(Field::Name),
        description_terms: snapshot.term_count(Field::Description),
        keyword_terms: snapshot.term_count(Field::Keyword),
        build_ms,
    };
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn search(store: FileCatalog, fan_out: FanOut, query: &str, k: usize) -> Result<()> {
    let config = EngineConfig { fan_out, max_results: k.max(1), ..EngineConfig::default() };
    let manager = IndexManager::new(Arc::new(store), config);
    manager.refresh()?;
    let results = manager.perform_search(query)?;
    tracing::info!(query, hits = results.len(), "search complete");
    for item in &results {
        println!("{:>4}  {}", item.relevance_score, serde_json::to_string(item)?);
    }
    Ok(())
}

fn browse(store: &FileCatalog, sort_by: &str, category: Option<&str>, algorithm: Algorithm) -> Result<()> {
    let key: SortKey = sort_by.parse()?;
    let category: Option<Category> = category.map(str::parse).transpose()?;

    let mut items = store.all_items()?;
    if let Some(category) = category {
        items.retain(|item| item.category == Some(category));
    }
    let start = Instant::now();
    sort_with(&mut items, key, algorithm);
    tracing::info!(items = items.len(), sort_by = %key, ?algorithm, elapsed_us = start.elapsed().as_micros() as u64, "sorted listing");
    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}
