//! Data models for extracted products, prices, and result caps.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Which reader produced a product record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Json,
    Html,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Json => write!(f, "json"),
            Source::Html => write!(f, "html"),
        }
    }
}

/// Price as found in the source.
///
/// JSON payloads usually carry numbers, while HTML cards carry display text
/// such as `"$10"` or `"$5 - $9"`. Both shapes are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Numeric(f64),
    Text(String),
}

impl Price {
    /// Converts a JSON value into a price, keeping numbers numeric.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(v) => Price::Numeric(v),
                None => Price::Text(n.to_string()),
            },
            Value::String(s) => Price::Text(s.clone()),
            other => Price::Text(other.to_string()),
        }
    }

    /// Returns the numeric value if this price is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Price::Numeric(v) => Some(*v),
            Price::Text(_) => None,
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Numeric(v) => write!(f, "{}", v),
            Price::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A product record normalized from either a JSON payload or an HTML page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product identifier (JSON source only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Product title, empty when unresolvable
    pub title: String,
    /// Current/sale price
    #[serde(default)]
    pub price: Option<Price>,
    /// Price before discount (JSON source only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    /// Units sold, verbatim (JSON source only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sold: Option<Value>,
    /// Rating or score, verbatim (JSON source only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Value>,
    /// Product detail link
    pub url: Option<String>,
    /// Primary image URL
    pub image: Option<String>,
    /// Reader that produced this record
    pub source: Source,
    /// Original JSON element (JSON source only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl Product {
    /// Creates an HTML-sourced product.
    pub fn from_html(
        title: String,
        price: Option<String>,
        url: Option<String>,
        image: Option<String>,
    ) -> Self {
        Self {
            id: None,
            title,
            price: price.map(Price::Text),
            original_price: None,
            sold: None,
            rating: None,
            url,
            image,
            source: Source::Html,
            raw: None,
        }
    }
}

/// Upper bound on the number of records returned by an extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Limit {
    #[default]
    Unbounded,
    /// Always at least 1.
    AtMost(usize),
}

impl Limit {
    /// Creates a limit from a count. Zero means unbounded.
    pub fn new(max: usize) -> Self {
        if max == 0 {
            Limit::Unbounded
        } else {
            Limit::AtMost(max)
        }
    }

    /// Creates a limit from an arbitrary number.
    ///
    /// Non-finite and non-positive values are unbounded. Fractions round up,
    /// so `2.5` admits three records.
    pub fn from_f64(max: f64) -> Self {
        if max.is_finite() && max > 0.0 {
            Limit::AtMost(max.ceil() as usize)
        } else {
            Limit::Unbounded
        }
    }

    /// Returns true once `count` records fill the limit.
    pub fn is_reached(&self, count: usize) -> bool {
        match self {
            Limit::Unbounded => false,
            Limit::AtMost(max) => count >= *max,
        }
    }

    /// Truncates `items` to the limit, keeping order.
    pub fn apply<T>(&self, mut items: Vec<T>) -> Vec<T> {
        if let Limit::AtMost(max) = self {
            items.truncate(*max);
        }
        items
    }
}

impl From<Option<usize>> for Limit {
    fn from(max: Option<usize>) -> Self {
        max.map(Limit::new).unwrap_or_default()
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Unbounded => write!(f, "unbounded"),
            Limit::AtMost(max) => write!(f, "{}", max),
        }
    }
}

/// A fetched response body with its final URL and declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub body: String,
    pub url: String,
    pub content_type: String,
}
