//! shop-crawler - Product extraction CLI for shop listing pages and API payloads

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use serde_json::{Map, Value};
use shop_crawler::commands::{BatchCommand, ExtractCommand, ScrapeCommand};
use shop_crawler::config::{Config, OutputFormat};
use shop_crawler::storage::JsonLinesStore;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "shop-crawler",
    version,
    about = "Extract products from shop pages and API payloads",
    long_about = "Fetches shop category or product pages and extracts product records, \
                  reading JSON payloads first and falling back to HTML product cards."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format (table, json, markdown, csv, html, xml)
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Request timeout in milliseconds
    #[arg(long, global = true, env = "SHOP_TIMEOUT_MS")]
    timeout: Option<u64>,

    /// Verbose logging (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract products from a saved response body
    #[command(alias = "x")]
    Extract {
        /// File holding the body ("-" reads stdin)
        input: PathBuf,

        /// Maximum number of products
        #[arg(short, long)]
        max: Option<usize>,
    },

    /// Fetch a category or product page and extract its products
    #[command(alias = "s")]
    Scrape {
        /// Category listing URL
        #[arg(long)]
        category_url: Option<String>,

        /// Product page URL (preferred over --category-url)
        #[arg(long)]
        product_url: Option<String>,

        /// Maximum number of products
        #[arg(short, long)]
        max_items: Option<String>,

        /// JSON file with a query object; flags override its keys
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Write products as JSON lines to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Scrape every product URL listed in a file
    #[command(alias = "b")]
    Batch {
        /// File with one URL per line (# starts a comment)
        #[arg(short, long)]
        urls_file: PathBuf,

        /// Maximum number of products per URL
        #[arg(short, long)]
        max_items: Option<usize>,

        /// Write products as JSON lines to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_ms = timeout;
    }

    // Initialize logging
    let filter = match config.log_level(cli.verbose) {
        Some(level) => EnvFilter::new(level.to_string()),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Level::WARN.to_string())),
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Extract { input, max } => {
            let cmd = ExtractCommand::new(config);
            let output = cmd.execute(&input, max)?;
            println!("{}", output);
        }

        Commands::Scrape { category_url, product_url, max_items, input, output } => {
            let mut query = match input {
                Some(path) => read_query(&path)?,
                None => Map::new(),
            };

            if let Some(url) = category_url {
                query.insert("categoryUrl".to_string(), Value::String(url));
            }
            if let Some(url) = product_url {
                query.insert("productUrl".to_string(), Value::String(url));
            }
            if let Some(max) = max_items {
                query.insert("maxItems".to_string(), Value::String(max));
            }

            let cmd = ScrapeCommand::new(config);
            let query = Value::Object(query);
            let output = match output {
                Some(path) => {
                    let mut store = JsonLinesStore::create(&path)?;
                    cmd.execute(&query, Some(&mut store)).await?
                }
                None => cmd.execute(&query, None).await?,
            };
            println!("{}", output);
        }

        Commands::Batch { urls_file, max_items, output } => {
            let cmd = BatchCommand::new(config);
            let output = match output {
                Some(path) => {
                    let mut store = JsonLinesStore::create(&path)?;
                    cmd.execute(&urls_file, max_items, Some(&mut store)).await?
                }
                None => cmd.execute(&urls_file, max_items, None).await?,
            };
            println!("{}", output);
        }
    }

    Ok(())
}

/// Reads a query object from a JSON file.
fn read_query(path: &Path) -> Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read query file: {}", path.display()))?;

    match serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse query file: {}", path.display()))?
    {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("Query file must contain a JSON object: {}", path.display()),
    }
}
