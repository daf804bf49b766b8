//! Product persistence.
//!
//! Stores receive records one at a time, in extraction order. Nothing is
//! deduplicated.

use crate::shop::Product;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Trait for product sinks.
pub trait ProductStore {
    /// Persists one product.
    fn store(&mut self, product: &Product) -> Result<()>;

    /// Flushes buffered records.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Pushes every product into `store` in order, then flushes.
pub fn store_all(store: &mut dyn ProductStore, products: &[Product]) -> Result<usize> {
    for product in products {
        store.store(product)?;
    }
    store.flush()?;
    debug!("Stored {} products", products.len());
    Ok(products.len())
}

/// Keeps products in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: Vec<Product>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored products in insertion order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Consumes the store.
    pub fn into_products(self) -> Vec<Product> {
        self.products
    }
}

impl ProductStore for MemoryStore {
    fn store(&mut self, product: &Product) -> Result<()> {
        self.products.push(product.clone());
        Ok(())
    }
}

/// Writes one JSON object per line.
pub struct JsonLinesStore<W: Write> {
    writer: W,
    count: usize,
}

impl JsonLinesStore<BufWriter<File>> {
    /// Creates (or truncates) a JSON-lines file, creating parent directories.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;

        info!("Writing products to {}", path.display());
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonLinesStore<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self { writer, count: 0 }
    }

    /// Number of records written so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ProductStore for JsonLinesStore<W> {
    fn store(&mut self, product: &Product) -> Result<()> {
        serde_json::to_writer(&mut self.writer, product).context("Failed to serialize product")?;
        self.writer.write_all(b"\n").context("Failed to write product")?;
        self.count += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush output")
    }
}
