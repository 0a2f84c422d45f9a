//! HTML visible-text extraction using scraper.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Node};
use tracing::debug;

use super::{Result, TextExtractor};
use crate::error::TextError;
use crate::models::config::HtmlConfig;
use crate::models::document::DocumentType;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Elements that start a new line of text.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "br", "caption", "dd", "details",
    "dialog", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1",
    "h2", "h3", "h4", "h5", "h6", "head", "header", "hr", "html", "legend", "li", "main", "nav",
    "ol", "option", "p", "pre", "section", "summary", "table", "tbody", "td", "tfoot", "th",
    "thead", "title", "tr", "ul",
];

/// Extracts visible text from HTML, one line per block-level element.
#[derive(Debug, Clone)]
pub struct HtmlTextExtractor {
    skip_tags: HashSet<String>,
}

impl HtmlTextExtractor {
    /// Extractor skipping the default tags (`script`, `style`, `noscript`, `template`).
    pub fn new() -> Self {
        Self::from_config(&HtmlConfig::default())
    }

    pub fn from_config(config: &HtmlConfig) -> Self {
        Self {
            skip_tags: config.skip_tags.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    /// Visible text of an HTML string.
    pub fn text_from_str(&self, source: &str) -> String {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        let document = Html::parse_document(source);

        let mut raw = String::new();
        self.collect(document.root_element(), &mut raw);

        raw.split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn collect(&self, element: ElementRef<'_>, out: &mut String) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => {
                    out.push_str(&WHITESPACE.replace_all(text, " "));
                }
                Node::Element(el) => {
                    let name = el.name();
                    if self.skip_tags.contains(name) {
                        continue;
                    }
                    let Some(child_element) = ElementRef::wrap(child) else {
                        continue;
                    };

                    let block = BLOCK_ELEMENTS.contains(&name);
                    if block {
                        out.push('\n');
                    }
                    self.collect(child_element, out);
                    if block {
                        out.push('\n');
                    }
                }
                // comments, doctype, processing instructions
                _ => {}
            }
        }
    }
}

impl Default for HtmlTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for HtmlTextExtractor {
    fn document_type(&self) -> DocumentType {
        DocumentType::Html
    }

    fn extract_text(&self, data: &[u8]) -> Result<String> {
        let source = std::str::from_utf8(data).map_err(|e| TextError::Encoding(e.to_string()))?;
        let text = self.text_from_str(source);
        debug!("Extracted {} chars of visible text from {} bytes of HTML", text.len(), data.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(html: &str) -> String {
        HtmlTextExtractor::new().text_from_str(html)
    }

    #[test]
    fn test_paragraph_is_standalone_line() {
        let out = text("<p>Due Date: 2024-05-01</p>");
        assert!(out.lines().any(|l| l == "Due Date: 2024-05-01"));
    }

    #[test]
    fn test_one_line_per_block() {
        let html = r#"
            <html><head><title>RFP 17</title></head>
            <body>
              <h1>Request for Proposal</h1>
              <div>Bid Number: <b>RFP-17</b></div>
              <ul><li>Net 30</li><li>FOB destination</li></ul>
              <p>Line one<br>Line two</p>
            </body></html>
        "#;

        assert_eq!(
            text(html),
            "RFP 17\nRequest for Proposal\nBid Number: RFP-17\nNet 30\nFOB destination\nLine one\nLine two"
        );
    }

    #[test]
    fn test_scripts_styles_and_comments_dropped() {
        let html = r#"
            <html><head>
              <style>p { color: red; }</style>
              <script>var due = "never";</script>
            </head>
            <body><!-- internal note --><p>Visible</p><noscript>Enable JS</noscript></body></html>
        "#;

        assert_eq!(text(html), "Visible");
    }

    #[test]
    fn test_inline_whitespace_collapsed() {
        let html = "<p>Payment\n      Terms:&nbsp;&nbsp; Net   30</p>";
        assert_eq!(text(html), "Payment Terms: Net 30");
    }

    #[test]
    fn test_table_cells_split() {
        let html = "<table><tr><th>Part_no</th><td>A-100</td></tr></table>";
        assert_eq!(text(html), "Part_no\nA-100");
    }

    #[test]
    fn test_bom_and_invalid_utf8() {
        let extractor = HtmlTextExtractor::new();
        assert_eq!(
            extractor.extract_text("\u{feff}<p>Title</p>".as_bytes()).unwrap(),
            "Title"
        );
        assert!(matches!(
            extractor.extract_text(&[0x3c, 0x70, 0x3e, 0xff, 0xfe]),
            Err(TextError::Encoding(_))
        ));
    }

    #[test]
    fn test_custom_skip_tags() {
        let extractor = HtmlTextExtractor::from_config(&HtmlConfig {
            skip_tags: vec!["NAV".to_string()],
        });
        let out = extractor.text_from_str("<nav>Home | About</nav><p>Body</p>");
        assert_eq!(out, "Body");
    }
}
