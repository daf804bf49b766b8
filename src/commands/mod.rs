//! CLI command implementations.

pub mod batch;
pub mod extract;
pub mod scrape;

pub use batch::BatchCommand;
pub use extract::ExtractCommand;
pub use scrape::ScrapeCommand;
