//! Format dispatch between the JSON and HTML readers.

use crate::shop::html_reader::read_html;
use crate::shop::json_reader::{read_json, JsonRead};
use crate::shop::models::{Limit, Product};
use tracing::{debug, error, info};

/// Extracts products from a raw response body.
///
/// The body is read as JSON first. When that yields no records (not JSON,
/// malformed, no product array, or an empty array) the same body is read as
/// HTML. Only one reader's output is returned.
///
/// Detection is content-based; the response content type is not consulted.
pub fn extract(body: &str, limit: Limit) -> Vec<Product> {
    if body.is_empty() {
        error!("Cannot extract products from an empty body");
        return Vec::new();
    }

    match read_json(body, limit) {
        JsonRead::Products(products) if !products.is_empty() => {
            info!("Extracted {} products from JSON", products.len());
            return products;
        }
        JsonRead::Products(_) => debug!("JSON product array is empty, trying HTML"),
        JsonRead::NotApplicable(reason) => debug!("Not a JSON product payload ({:?})", reason),
    }

    let products = read_html(body, limit);
    info!("Extracted {} products from HTML", products.len());
    products
}
