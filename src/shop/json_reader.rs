//! Reader for JSON API payloads.

use crate::shop::models::{Limit, Price, Product, Source};
use serde_json::Value;
use tracing::{debug, trace};

/// Envelope keys probed, in order, when the payload is an object.
const COLLECTION_KEYS: &[&str] = &["products", "items", "data"];

// Candidate keys per field. The first key holding a non-null value wins;
// `0`, `false` and `""` count as present.
const ID_KEYS: &[&str] = &["id", "product_id", "productId"];
const TITLE_KEYS: &[&str] = &["title", "name"];
const PRICE_KEYS: &[&str] = &["sale_price", "price"];
const ORIGINAL_PRICE_KEYS: &[&str] = &["origin_price", "original_price"];
const SOLD_KEYS: &[&str] = &["sold", "sales"];
const RATING_KEYS: &[&str] = &["rating", "score"];
const URL_KEYS: &[&str] = &["product_link", "url"];
const IMAGE_KEYS: &[&str] = &["image", "thumbnail"];

/// Why a body did not yield a JSON product collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotJson {
    /// Body does not start with `{` or `[`.
    NoJsonPrefix,
    /// Body looked like JSON but failed to decode.
    Malformed(String),
    /// Decoded, but no product array was found.
    NoCollection,
}

/// Outcome of reading a body as JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonRead {
    /// A product array was found. May be empty.
    Products(Vec<Product>),
    NotApplicable(NotJson),
}

impl JsonRead {
    /// Returns the products, or an empty vector when not applicable.
    pub fn into_products(self) -> Vec<Product> {
        match self {
            JsonRead::Products(products) => products,
            JsonRead::NotApplicable(_) => Vec::new(),
        }
    }
}

/// Reads a product collection from a JSON body.
///
/// Never fails: anything that is not a recognizable product payload comes
/// back as [`JsonRead::NotApplicable`].
pub fn read_json(text: &str, limit: Limit) -> JsonRead {
    // Byte order marks are not whitespace to `str::trim`
    let trimmed = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return JsonRead::NotApplicable(NotJson::NoJsonPrefix);
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(e) => {
            debug!("Body is not valid JSON: {}", e);
            return JsonRead::NotApplicable(NotJson::Malformed(e.to_string()));
        }
    };

    let Some(items) = collection(&value) else {
        debug!("JSON body has no products/items/data array");
        return JsonRead::NotApplicable(NotJson::NoCollection);
    };

    let products: Vec<Product> = items.iter().map(normalize).collect();
    trace!("Normalized {} JSON products", products.len());

    JsonRead::Products(limit.apply(products))
}

/// Locates the product array in a decoded payload.
fn collection(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => {
            COLLECTION_KEYS.iter().find_map(|key| map.get(*key).and_then(Value::as_array))
        }
        _ => None,
    }
}

/// Returns the first non-null value among `keys`.
///
/// Non-object items have no fields, so every lookup is absent.
fn first_present<'a>(item: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|key| item.get(*key)).find(|value| !value.is_null())
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Maps one array element onto the product schema.
fn normalize(item: &Value) -> Product {
    Product {
        id: first_present(item, ID_KEYS).map(text_of),
        title: first_present(item, TITLE_KEYS).map(text_of).unwrap_or_default(),
        price: first_present(item, PRICE_KEYS).map(Price::from_json),
        original_price: first_present(item, ORIGINAL_PRICE_KEYS).map(Price::from_json),
        sold: first_present(item, SOLD_KEYS).cloned(),
        rating: first_present(item, RATING_KEYS).cloned(),
        url: first_present(item, URL_KEYS).map(text_of),
        image: first_present(item, IMAGE_KEYS).map(text_of),
        source: Source::Json,
        raw: Some(item.clone()),
    }
}
