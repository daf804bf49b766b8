//! Scrape command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::shop::{extract, FetchRequest, Limit, PageFetch, Product, ScrapeQuery, ShopClient};
use crate::storage::{store_all, ProductStore};
use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Validates a query, fetches its target, and extracts products.
pub struct ScrapeCommand {
    config: Config,
}

impl ScrapeCommand {
    /// Creates a new scrape command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the scrape and returns formatted output.
    pub async fn execute(&self, input: &Value, store: Option<&mut dyn ProductStore>) -> Result<String> {
        // Validate before building the client so bad input never touches the network
        let query = ScrapeQuery::from_value(input)?;

        let client = ShopClient::new().context("Failed to create HTTP client")?;
        let products = self.scrape(&client, &query).await?;

        self.finish(&products, store)
    }

    /// Executes the scrape with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl PageFetch,
        input: &Value,
        store: Option<&mut dyn ProductStore>,
    ) -> Result<String> {
        let query = ScrapeQuery::from_value(input)?;
        let products = self.scrape(client, &query).await?;

        self.finish(&products, store)
    }

    /// Fetches the query target and extracts its products.
    pub async fn scrape(&self, client: &impl PageFetch, query: &ScrapeQuery) -> Result<Vec<Product>> {
        let url = query.target_url().context("Query has no URL to fetch")?;
        info!("Scraping: {}", url);

        let request = self.request_for(url);
        let page = client.fetch(&request).await?;
        debug!("Fetched {} ({} bytes, content-type {:?})", page.url, page.body.len(), page.content_type);

        let products = extract(&page.body, self.limit_for(query));
        if products.is_empty() {
            warn!("No products extracted from {}", page.url);
        }

        Ok(products)
    }

    fn request_for(&self, url: &str) -> FetchRequest {
        self.config
            .request_headers()
            .into_iter()
            .fold(FetchRequest::new(url), |request, (name, value)| request.header(name, value))
            .timeout_ms(self.config.timeout_ms)
    }

    /// The query's cap, or the configured default when the query has none.
    fn limit_for(&self, query: &ScrapeQuery) -> Limit {
        match query.max_items {
            Limit::Unbounded => Limit::from(self.config.max_items),
            limit => limit,
        }
    }

    fn finish(&self, products: &[Product], store: Option<&mut dyn ProductStore>) -> Result<String> {
        if let Some(store) = store {
            store_all(store, products).context("Failed to store products")?;
        }

        info!("Found {} products", products.len());
        Ok(Formatter::new(self.config.format).format_products(products))
    }
}
