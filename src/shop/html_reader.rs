//! Reader for HTML listing pages.

use crate::shop::models::{Limit, Product};
use crate::shop::selectors::card;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

/// Extracts product cards from an HTML document.
///
/// Malformed markup is parsed leniently, so this never fails; at worst it
/// returns an empty vector. Scanning stops as soon as `limit` records have
/// been collected.
pub fn read_html(text: &str, limit: Limit) -> Vec<Product> {
    let document = Html::parse_document(text);
    let products = collect_cards(document.select(&card::CARD), limit);

    debug!("Parsed {} products from HTML", products.len());
    products
}

/// Parses candidate cards in order, pulling no further cards once the limit is met.
fn collect_cards<'a>(cards: impl Iterator<Item = ElementRef<'a>>, limit: Limit) -> Vec<Product> {
    let mut products = Vec::new();

    for element in cards {
        match parse_card(element) {
            Some(product) => {
                trace!("Parsed card: {}", product.title);
                products.push(product);
            }
            None => {
                // No title and no link: skeleton or template card
                trace!("Skipping empty product card");
                continue;
            }
        }

        if limit.is_reached(products.len()) {
            trace!("Limit of {} reached, stopping card scan", limit);
            break;
        }
    }

    products
}

/// Parses one card, or returns `None` for a card with neither title nor link.
fn parse_card(element: ElementRef) -> Option<Product> {
    let title = nested_text(element, &card::TITLE)
        .or_else(|| attr(element, card::TITLE_ATTR))
        .unwrap_or_default();

    let price = nested_text(element, &card::PRICE).or_else(|| attr(element, card::PRICE_ATTR));

    let url = element.select(&card::LINK).next().and_then(|e| attr(e, "href"));

    let image = element
        .select(&card::IMAGE)
        .next()
        .and_then(|e| attr(e, "src"))
        .or_else(|| attr(element, card::IMAGE_ATTR));

    if title.is_empty() && url.is_none() {
        return None;
    }

    Some(Product::from_html(title, price, url, image))
}

/// Trimmed text of the first nested match, if non-empty.
fn nested_text(element: ElementRef, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Attribute value, if present and non-empty.
fn attr(element: ElementRef, name: &str) -> Option<String> {
    element.value().attr(name).filter(|value| !value.is_empty()).map(String::from)
}
