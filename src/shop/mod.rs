//! Shop page fetching, product extraction, and data models.

pub mod client;
pub mod extractor;
pub mod html_reader;
pub mod json_reader;
pub mod models;
pub mod query;
pub mod selectors;

pub use client::{FetchError, FetchRequest, PageFetch, ShopClient};
pub use extractor::extract;
pub use html_reader::read_html;
pub use json_reader::{read_json, JsonRead, NotJson};
pub use models::{Limit, Page, Price, Product, Source};
pub use query::{ScrapeQuery, ValidationError};
