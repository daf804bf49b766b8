//! Extract command: parse a saved response body without touching the network.

use crate::config::Config;
use crate::format::Formatter;
use crate::shop::{extract, Limit, Product};
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Extracts products from a body stored on disk (or read from stdin).
pub struct ExtractCommand {
    config: Config,
}

impl ExtractCommand {
    /// Creates a new extract command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Reads `input` (`-` for stdin), extracts, and returns formatted output.
    pub fn execute(&self, input: &Path, max_items: Option<usize>) -> Result<String> {
        let body = if input == Path::new("-") {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body).context("Failed to read stdin")?;
            body
        } else {
            std::fs::read_to_string(input)
                .with_context(|| format!("Failed to read input file: {}", input.display()))?
        };

        let products = self.extract_body(&body, max_items);
        info!("Extracted {} products from {}", products.len(), input.display());

        Ok(Formatter::new(self.config.format).format_products(&products))
    }

    /// Extracts from an in-memory body, falling back to the configured cap.
    pub fn extract_body(&self, body: &str, max_items: Option<usize>) -> Vec<Product> {
        let limit = Limit::from(max_items.or(self.config.max_items));
        extract(body, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn make_test_config(format: OutputFormat) -> Config {
        Config { format, ..Config::default() }
    }

    #[test]
    fn test_extract_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"items": [{{"id": "a1", "title": "Lamp", "price": 12.5}}, {{"id": "a2", "title": "Desk"}}]}}"#
        )
        .unwrap();

        let cmd = ExtractCommand::new(make_test_config(OutputFormat::Csv));
        let output = cmd.execute(file.path(), None).unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("a1,Lamp,12.5"));
        assert!(lines[2].starts_with("a2,Desk,"));
    }

    #[test]
    fn test_extract_html_file_with_cap() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"<div class="product-card" data-title="One"></div>
               <div class="product-card" data-title="Two"></div>"#
        )
        .unwrap();

        let cmd = ExtractCommand::new(make_test_config(OutputFormat::Json));
        let output = cmd.execute(file.path(), Some(1)).unwrap();

        assert!(output.contains("One"));
        assert!(!output.contains("Two"));
    }

    #[test]
    fn test_config_cap_applies_when_flag_absent() {
        let mut config = make_test_config(OutputFormat::Table);
        config.max_items = Some(2);
        let cmd = ExtractCommand::new(config);

        let products = cmd.extract_body("[1, 2, 3, 4]", None);
        assert_eq!(products.len(), 2);

        let products = cmd.extract_body("[1, 2, 3, 4]", Some(3));
        assert_eq!(products.len(), 3);
    }

    #[test]
    fn test_extract_file_with_byte_order_mark() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"\xEF\xBB\xBF{\"products\": [{\"id\": \"1\", \"title\": \"X\"}]}").unwrap();

        let cmd = ExtractCommand::new(make_test_config(OutputFormat::Csv));
        let output = cmd.execute(file.path(), None).unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "1,X,,,,,,,json");
    }

    #[test]
    fn test_extract_empty_file() {
        let file = NamedTempFile::new().unwrap();
        let cmd = ExtractCommand::new(make_test_config(OutputFormat::Table));
        assert_eq!(cmd.execute(file.path(), None).unwrap(), "No products found.");
    }

    #[test]
    fn test_extract_missing_file() {
        let cmd = ExtractCommand::new(Config::default());
        let err = cmd.execute(Path::new("/nonexistent/body.html"), None).unwrap_err();
        assert!(err.to_string().contains("Failed to read input file"));
    }
}
