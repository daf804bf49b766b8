//! CSS selectors for product card extraction.
//!
//! Update this file when the shop changes its listing markup. Each field
//! selector is a comma-joined list; the first match in document order wins.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for product cards on listing pages.
pub mod card {
    use super::*;

    /// Product card container.
    ///
    /// Platform data attribute, generic class, then generic data attribute.
    /// Matching is a union: every element matching any entry is a candidate,
    /// visited once, in document order.
    pub static CARD: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "[data-e2e='search-card'], \
             .product-card, \
             [data-product-id]",
        )
        .unwrap()
    });

    /// Title element inside a card.
    pub static TITLE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "[data-e2e='product-title'], \
             .product-title, \
             .title",
        )
        .unwrap()
    });

    /// Price element inside a card.
    pub static PRICE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "[data-e2e='product-price'], \
             .product-price, \
             .price",
        )
        .unwrap()
    });

    /// Detail link.
    pub static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

    /// Product image.
    pub static IMAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());

    /// Card attribute used when no title element is present.
    pub const TITLE_ATTR: &str = "data-title";

    /// Card attribute used when no price element is present.
    pub const PRICE_ATTR: &str = "data-price";

    /// Card attribute used when no image element carries a `src`.
    pub const IMAGE_ATTR: &str = "data-image";
}
