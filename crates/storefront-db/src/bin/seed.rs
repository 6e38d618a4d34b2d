//! # Seed Data Importer
//!
//! Populates the catalog from the JSON seed dataset.
//!
//! ## Usage
//! ```bash
//! # Import ./data/full-products.json into ./storefront.db
//! cargo run -p storefront-db --bin seed
//!
//! # Custom paths
//! cargo run -p storefront-db --bin seed -- --db ./data/catalog.db --file ./export.json
//!
//! # Import even if the catalog already has products
//! cargo run -p storefront-db --bin seed -- --force
//! ```
//!
//! Paths default to `STOREFRONT_DB_PATH` / `STOREFRONT_SEED_FILE`.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use storefront_core::ListOptions;
use storefront_db::{import_products, CatalogConfig, Database};

/// Storefront catalog seed importer
#[derive(Debug, Parser)]
#[command(name = "seed", version)]
struct Args {
    /// Database file (overrides STOREFRONT_DB_PATH)
    #[arg(short, long)]
    db: Option<PathBuf>,

    /// JSON array of products (overrides STOREFRONT_SEED_FILE)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Import even when products already exist
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    let mut config = CatalogConfig::load()?;
    if let Some(db) = args.db {
        config.database_path = db;
    }
    if let Some(file) = args.file {
        config.seed_file = file;
    }

    info!(
        db = %config.database_path.display(),
        file = %config.seed_file.display(),
        "Seeding catalog"
    );

    let db = Database::new(config.db_config())
        .await
        .context("failed to open catalog database")?;
    let products = db.products();

    let existing = products.count().await?;
    if existing > 0 && !args.force {
        warn!(
            existing,
            "Catalog already has products, skipping seed (use --force to import anyway)"
        );
        return Ok(());
    }

    let start = Instant::now();
    let summary = import_products(&products, &config.seed_file)
        .await
        .with_context(|| format!("failed to import {}", config.seed_file.display()))?;

    info!(
        imported = summary.imported,
        skipped = summary.skipped,
        elapsed = ?start.elapsed(),
        "Seed complete"
    );

    let first_page = products.list(&ListOptions::new().limit(5)).await?;
    for product in &first_page {
        info!(
            id = %product.id,
            likes = product.likes,
            tags = product.tags.len(),
            "Sample product"
        );
    }

    db.close().await;
    Ok(())
}

/// Installs the fmt subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show repository debug messages
/// - Default: `info,storefront=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storefront=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
