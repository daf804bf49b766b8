//! shop-crawler - Product extraction from shop listing pages and API payloads
//!
//! Response bodies are read as JSON first. When no product collection is
//! found there, the body is parsed as HTML and product cards are scraped.

pub mod commands;
pub mod config;
pub mod format;
pub mod shop;
pub mod storage;

pub use config::Config;
pub use shop::{extract, Limit, Price, Product, Source};
