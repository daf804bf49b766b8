//! Batch command: scrape every URL listed in a file.

use crate::commands::ScrapeCommand;
use crate::config::Config;
use crate::format::Formatter;
use crate::shop::{Limit, PageFetch, Product, ScrapeQuery, ShopClient};
use crate::storage::{store_all, ProductStore};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{error, info};

/// Scrapes a list of product URLs one after another.
pub struct BatchCommand {
    config: Config,
}

impl BatchCommand {
    /// Creates a new batch command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Scrapes every URL in `urls_file` and returns formatted output.
    pub async fn execute(
        &self,
        urls_file: &Path,
        max_items: Option<usize>,
        store: Option<&mut dyn ProductStore>,
    ) -> Result<String> {
        let urls = load_urls(urls_file)?;
        if urls.is_empty() {
            anyhow::bail!("No URLs found in {}", urls_file.display());
        }

        let client = ShopClient::new().context("Failed to create HTTP client")?;
        self.execute_with_client(&client, &urls, max_items, store).await
    }

    /// Scrapes `urls` with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl PageFetch,
        urls: &[String],
        max_items: Option<usize>,
        store: Option<&mut dyn ProductStore>,
    ) -> Result<String> {
        let products = self.scrape_all(client, urls, max_items).await;

        if let Some(store) = store {
            store_all(store, &products).context("Failed to store products")?;
        }

        Ok(Formatter::new(self.config.format).format_products(&products))
    }

    /// Scrapes each URL in order. Failures are logged and skipped.
    pub async fn scrape_all(
        &self,
        client: &impl PageFetch,
        urls: &[String],
        max_items: Option<usize>,
    ) -> Vec<Product> {
        let scrape = ScrapeCommand::new(self.config.clone());
        let limit = Limit::from(max_items);
        let mut products = Vec::new();
        let mut failed = 0;

        for (i, url) in urls.iter().enumerate() {
            info!("[{}/{}] {}", i + 1, urls.len(), url);

            match scrape.scrape(client, &ScrapeQuery::for_product(url.as_str(), limit)).await {
                Ok(found) => products.extend(found),
                Err(e) => {
                    error!("Failed to scrape {}: {:#}", url, e);
                    failed += 1;
                }
            }
        }

        info!(
            "Batch finished: {} products from {} URLs ({} failed)",
            products.len(),
            urls.len(),
            failed
        );
        products
    }
}

/// Reads newline-delimited URLs from a file.
pub fn load_urls(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read URL file: {}", path.display()))?;
    Ok(parse_urls(&content))
}

/// Skips blank lines and `#` comments.
pub fn parse_urls(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}
