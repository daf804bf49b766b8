//! Scrape query validation.

use crate::shop::models::Limit;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Every constraint a query violated, reported together.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    pub violations: Vec<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid input: {}", self.violations.join("; "))
    }
}

/// A validated scrape query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeQuery {
    pub category_url: Option<String>,
    pub product_url: Option<String>,
    pub max_items: Limit,
}

impl ScrapeQuery {
    /// Creates a query for a single product URL.
    pub fn for_product(url: impl Into<String>, max_items: Limit) -> Self {
        Self { category_url: None, product_url: Some(url.into()), max_items }
    }

    /// Validates a JSON query object with optional `categoryUrl`,
    /// `productUrl` and `maxItems` keys.
    pub fn from_value(input: &Value) -> Result<Self, ValidationError> {
        let Some(map) = input.as_object() else {
            return Err(ValidationError { violations: vec!["input must be a JSON object".into()] });
        };

        let mut violations = Vec::new();

        let category_url = url_field(map.get("categoryUrl"), "categoryUrl", &mut violations);
        let product_url = url_field(map.get("productUrl"), "productUrl", &mut violations);

        let has_url = |field: &str| {
            map.get(field).and_then(Value::as_str).is_some_and(|s| !s.trim().is_empty())
        };
        if !has_url("categoryUrl") && !has_url("productUrl") {
            violations.push("either categoryUrl or productUrl is required".to_string());
        }

        let max_items = match map.get("maxItems") {
            None | Some(Value::Null) => Limit::Unbounded,
            Some(value) => match positive_number(value) {
                Some(n) => Limit::from_f64(n),
                None => {
                    violations.push(format!(
                        "maxItems must be a finite number greater than 0 (got {})",
                        value
                    ));
                    Limit::Unbounded
                }
            },
        };

        if !violations.is_empty() {
            return Err(ValidationError { violations });
        }

        Ok(Self { category_url, product_url, max_items })
    }

    /// URL to fetch: the product URL when given, else the category URL.
    pub fn target_url(&self) -> Option<&str> {
        self.product_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.category_url.as_deref().filter(|url| !url.trim().is_empty()))
    }
}

fn url_field(value: Option<&Value>, name: &str, violations: &mut Vec<String>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(other) => {
            violations.push(format!("{} must be a string (got {})", name, other));
            None
        }
    }
}

/// Resolves a number or numeric string to a finite value greater than zero.
fn positive_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n.is_finite() && n > 0.0).then_some(n)
}
