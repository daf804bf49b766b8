//! Output formatting for products (table, JSON, markdown, CSV, HTML, XML).

use crate::config::OutputFormat;
use crate::shop::Product;
use quick_xml::escape::escape;
use serde_json::Value;

/// Formats products for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats multiple products.
    pub fn format_products(&self, products: &[Product]) -> String {
        if products.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_header(),
                OutputFormat::Html => "<html><body><p>No data available.</p></body></html>".to_string(),
                OutputFormat::Xml => format!("{}\n<products />", XML_DECLARATION),
                OutputFormat::Table | OutputFormat::Markdown => "No products found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json_products(products),
            OutputFormat::Table => self.table_products(products),
            OutputFormat::Markdown => self.markdown_products(products),
            OutputFormat::Csv => self.csv_products(products),
            OutputFormat::Html => self.html_products(products),
            OutputFormat::Xml => self.xml_products(products),
        }
    }

    fn json_products(&self, products: &[Product]) -> String {
        serde_json::to_string_pretty(products).unwrap_or_else(|_| "[]".to_string())
    }

    fn table_products(&self, products: &[Product]) -> String {
        let id_width = 20;
        let price_width = 14;
        let source_width = 6;
        let title_width = 50;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<id_width$}  {:<price_width$}  {:<source_width$}  {}",
            "ID", "Price", "Source", "Title"
        ));
        lines.push(format!(
            "{:-<id_width$}  {:-<price_width$}  {:-<source_width$}  {:-<title_width$}",
            "", "", "", ""
        ));

        for product in products {
            let id = product.id.as_deref().unwrap_or("-");
            let price = product.price.as_ref().map(|p| p.to_string()).unwrap_or("N/A".into());

            lines.push(format!(
                "{:<id_width$}  {:>price_width$}  {:<source_width$}  {}",
                truncate(id, id_width),
                truncate(&price, price_width),
                product.source,
                truncate(&product.title, title_width)
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} products", products.len()));

        lines.join("\n")
    }

    fn markdown_products(&self, products: &[Product]) -> String {
        let mut lines = Vec::new();

        lines.push("| ID | Price | Source | Title |".to_string());
        lines.push("|----|-------|--------|-------|".to_string());

        for product in products {
            let id = markdown_escape(product.id.as_deref().unwrap_or(""));
            let price = product.price.as_ref().map(|p| p.to_string()).unwrap_or("N/A".into());
            let title = markdown_escape(&truncate(&product.title, 40));

            let title_cell = match &product.url {
                Some(url) => format!("[{}]({})", title, markdown_escape(url)),
                None => title,
            };

            lines.push(format!(
                "| {} | {} | {} | {} |",
                id,
                markdown_escape(&price),
                product.source,
                title_cell
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} products found*", products.len()));

        lines.join("\n")
    }

    fn csv_header(&self) -> String {
        FIELDS.join(",")
    }

    fn csv_products(&self, products: &[Product]) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for product in products {
            lines.push(
                field_values(product)
                    .iter()
                    .map(|field| Self::csv_escape(field))
                    .collect::<Vec<_>>()
                    .join(","),
            );
        }

        lines.join("\n")
    }

    fn html_products(&self, products: &[Product]) -> String {
        let header: String = FIELDS.iter().map(|name| format!("<th>{}</th>", name)).collect();

        let rows: String = products
            .iter()
            .map(|product| {
                let cells: String = field_values(product)
                    .iter()
                    .map(|value| format!("<td>{}</td>", escape(value.as_str())))
                    .collect();
                format!("<tr>{}</tr>", cells)
            })
            .collect();

        format!(
            "<html><head><meta charset='utf-8'><title>Products</title></head>\
             <body><table border='1'><thead><tr>{}</tr></thead><tbody>{}</tbody></table></body></html>",
            header, rows
        )
    }

    fn xml_products(&self, products: &[Product]) -> String {
        let mut lines = vec![XML_DECLARATION.to_string(), "<products>".to_string()];

        for product in products {
            lines.push("  <product>".to_string());
            for (name, value) in FIELDS.iter().zip(field_values(product)) {
                lines.push(format!("    <{name}>{}</{name}>", escape(value.as_str())));
            }
            lines.push("  </product>".to_string());
        }

        lines.push("</products>".to_string());
        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

const XML_DECLARATION: &str = "<?xml version='1.0' encoding='utf-8'?>";

/// Column names shared by the CSV, HTML and XML outputs.
const FIELDS: [&str; 9] =
    ["id", "title", "price", "original_price", "sold", "rating", "url", "image", "source"];

/// Text of each field in `FIELDS` order; absent values are empty.
fn field_values(product: &Product) -> [String; 9] {
    [
        product.id.clone().unwrap_or_default(),
        product.title.clone(),
        product.price.as_ref().map(|p| p.to_string()).unwrap_or_default(),
        product.original_price.as_ref().map(|p| p.to_string()).unwrap_or_default(),
        product.sold.as_ref().map(scalar_text).unwrap_or_default(),
        product.rating.as_ref().map(scalar_text).unwrap_or_default(),
        product.url.clone().unwrap_or_default(),
        product.image.clone().unwrap_or_default(),
        product.source.to_string(),
    ]
}

/// Escapes pipes so a value stays inside its markdown table cell.
fn markdown_escape(s: &str) -> String {
    s.replace('|', "\\|")
}

/// Display text for a verbatim JSON scalar.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Truncates to `max` characters, marking the cut with "...".
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shop::{Price, Source};
    use serde_json::json;

    fn make_json_product() -> Product {
        Product {
            id: Some("1729384756".to_string()),
            title: "Magnetic Phone Case".to_string(),
            price: Some(Price::Numeric(9.99)),
            original_price: Some(Price::Numeric(19.99)),
            sold: Some(json!("1.2k")),
            rating: Some(json!(4.8)),
            url: Some("https://shop.example/p/1729384756".to_string()),
            image: Some("https://img.example/1.webp".to_string()),
            source: Source::Json,
            raw: Some(json!({"id": "1729384756"})),
        }
    }

    fn make_html_product() -> Product {
        Product::from_html("Desk Lamp".to_string(), Some("$24.00".to_string()), None, None)
    }

    fn make_long_title_product() -> Product {
        Product::from_html(
            "This is a very long product title that exceeds fifty characters and should be truncated in table output".to_string(),
            None,
            Some("/p/long".to_string()),
            None,
        )
    }

    // JSON format tests

    #[test]
    fn test_json_products() {
        let formatter = Formatter::new(OutputFormat::Json);
        let output = formatter.format_products(&[make_json_product(), make_html_product()]);

        assert!(output.starts_with('['));
        assert!(output.ends_with(']'));

        let parsed: Vec<Value> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["price"], 9.99);
        assert_eq!(parsed[0]["originalPrice"], 19.99);
        assert_eq!(parsed[1]["price"], "$24.00");
        assert_eq!(parsed[1]["source"], "html");
    }

    #[test]
    fn test_json_empty() {
        let formatter = Formatter::new(OutputFormat::Json);
        assert_eq!(formatter.format_products(&[]), "[]");
    }

    // Table format tests

    #[test]
    fn test_table_products() {
        let formatter = Formatter::new(OutputFormat::Table);
        let output = formatter.format_products(&[make_json_product(), make_html_product()]);

        assert!(output.contains("ID"));
        assert!(output.contains("Price"));
        assert!(output.contains("Source"));
        assert!(output.contains("----------"));
        assert!(output.contains("1729384756"));
        assert!(output.contains("9.99"));
        assert!(output.contains("$24.00"));
        assert!(output.contains("json"));
        assert!(output.contains("html"));
        assert!(output.contains("Total: 2 products"));
    }

    #[test]
    fn test_table_missing_price() {
        let formatter = Formatter::new(OutputFormat::Table);
        let output = formatter.format_products(&[make_long_title_product()]);

        assert!(output.contains("N/A"));
        assert!(output.contains("This is a very long product title that exceeds"));
        assert!(output.contains("..."));
    }

    #[test]
    fn test_table_empty() {
        let formatter = Formatter::new(OutputFormat::Table);
        assert_eq!(formatter.format_products(&[]), "No products found.");
    }

    // Markdown format tests

    #[test]
    fn test_markdown_products() {
        let formatter = Formatter::new(OutputFormat::Markdown);
        let output = formatter.format_products(&[make_json_product(), make_html_product()]);

        assert!(output.contains("| ID | Price | Source | Title |"));
        assert!(output.contains("|----|-------|--------|-------|"));
        assert!(output.contains(
            "| 1729384756 | 9.99 | json | [Magnetic Phone Case](https://shop.example/p/1729384756) |"
        ));
        assert!(output.contains("|  | $24.00 | html | Desk Lamp |"));
        assert!(output.contains("*2 products found*"));
    }

    #[test]
    fn test_markdown_escapes_pipes() {
        let formatter = Formatter::new(OutputFormat::Markdown);
        let product = Product::from_html("A | B".to_string(), None, None, None);
        let output = formatter.format_products(&[product]);
        assert!(output.contains("A \\| B"));
    }

    #[test]
    fn test_markdown_escapes_pipes_in_every_cell() {
        let formatter = Formatter::new(OutputFormat::Markdown);
        let mut product = Product::from_html(
            "Plain".to_string(),
            Some("$5|$9".to_string()),
            Some("https://shop.example/p?tags=a|b".to_string()),
            None,
        );
        product.id = Some("id|1".to_string());

        let output = formatter.format_products(&[product]);
        let row = output.lines().nth(2).unwrap();
        assert_eq!(
            row,
            "| id\\|1 | $5\\|$9 | html | [Plain](https://shop.example/p?tags=a\\|b) |"
        );
        assert_eq!(row.matches(" | ").count(), 3);
    }

    #[test]
    fn test_markdown_empty() {
        let formatter = Formatter::new(OutputFormat::Markdown);
        assert_eq!(formatter.format_products(&[]), "No products found.");
    }

    // CSV format tests

    #[test]
    fn test_csv_products() {
        let formatter = Formatter::new(OutputFormat::Csv);
        let output = formatter.format_products(&[make_json_product(), make_html_product()]);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "id,title,price,original_price,sold,rating,url,image,source");
        assert_eq!(
            lines[1],
            "1729384756,Magnetic Phone Case,9.99,19.99,1.2k,4.8,https://shop.example/p/1729384756,https://img.example/1.webp,json"
        );
        assert_eq!(lines[2], ",Desk Lamp,$24.00,,,,,,html");
    }

    #[test]
    fn test_csv_empty() {
        let formatter = Formatter::new(OutputFormat::Csv);
        assert_eq!(
            formatter.format_products(&[]),
            "id,title,price,original_price,sold,rating,url,image,source"
        );
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(Formatter::csv_escape("simple"), "simple");
        assert_eq!(Formatter::csv_escape("with,comma"), "\"with,comma\"");
        assert_eq!(Formatter::csv_escape("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(Formatter::csv_escape("with\nnewline"), "\"with\nnewline\"");
    }

    #[test]
    fn test_csv_escapes_price_ranges() {
        let formatter = Formatter::new(OutputFormat::Csv);
        let product =
            Product::from_html("Socks".to_string(), Some("$1,200.00".to_string()), None, None);
        let output = formatter.format_products(&[product]);
        assert!(output.contains("\"$1,200.00\""));
    }

    // HTML format tests

    #[test]
    fn test_html_products() {
        let formatter = Formatter::new(OutputFormat::Html);
        let output = formatter.format_products(&[make_json_product(), make_html_product()]);

        assert!(output.starts_with("<html><head><meta charset='utf-8'>"));
        assert!(output.contains(
            "<thead><tr><th>id</th><th>title</th><th>price</th><th>original_price</th>\
             <th>sold</th><th>rating</th><th>url</th><th>image</th><th>source</th></tr></thead>"
        ));
        assert!(output.contains("<tr><td>1729384756</td><td>Magnetic Phone Case</td><td>9.99</td>"));
        assert!(output.contains("<tr><td></td><td>Desk Lamp</td><td>$24.00</td>"));
        assert_eq!(output.matches("<tr>").count(), 3);
        assert!(output.ends_with("</tbody></table></body></html>"));
    }

    #[test]
    fn test_html_escapes_markup() {
        let formatter = Formatter::new(OutputFormat::Html);
        let product = Product::from_html("<b>Tea & \"Cups\"</b>".to_string(), None, None, None);
        let output = formatter.format_products(&[product]);

        assert!(output.contains("<td>&lt;b&gt;Tea &amp; &quot;Cups&quot;&lt;/b&gt;</td>"));
        assert!(!output.contains("<b>Tea"));
    }

    #[test]
    fn test_html_empty() {
        let formatter = Formatter::new(OutputFormat::Html);
        assert_eq!(
            formatter.format_products(&[]),
            "<html><body><p>No data available.</p></body></html>"
        );
    }

    // XML format tests

    #[test]
    fn test_xml_products() {
        let formatter = Formatter::new(OutputFormat::Xml);
        let output = formatter.format_products(&[make_json_product(), make_html_product()]);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "<?xml version='1.0' encoding='utf-8'?>");
        assert_eq!(lines[1], "<products>");
        assert_eq!(lines[2], "  <product>");
        assert_eq!(lines[3], "    <id>1729384756</id>");
        assert_eq!(lines[4], "    <title>Magnetic Phone Case</title>");
        assert_eq!(lines[5], "    <price>9.99</price>");
        assert_eq!(lines[11], "    <source>json</source>");
        assert_eq!(lines[12], "  </product>");
        assert_eq!(lines.last(), Some(&"</products>"));

        assert_eq!(output.matches("<product>").count(), 2);
        assert!(output.contains("    <id></id>\n    <title>Desk Lamp</title>"));
    }

    #[test]
    fn test_xml_escapes_text() {
        let formatter = Formatter::new(OutputFormat::Xml);
        let product = Product::from_html(
            "Salt & Pepper <2 pack>".to_string(),
            None,
            Some("/p?a=1&b=2".to_string()),
            None,
        );
        let output = formatter.format_products(&[product]);

        assert!(output.contains("<title>Salt &amp; Pepper &lt;2 pack&gt;</title>"));
        assert!(output.contains("<url>/p?a=1&amp;b=2</url>"));
    }

    #[test]
    fn test_xml_empty() {
        let formatter = Formatter::new(OutputFormat::Xml);
        assert_eq!(
            formatter.format_products(&[]),
            "<?xml version='1.0' encoding='utf-8'?>\n<products />"
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
        assert_eq!(truncate("ünïcödé-title", 8), "ünïcö...");
    }
}
