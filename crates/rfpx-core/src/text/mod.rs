//! Document to plain-text conversion.

mod html;
pub(crate) mod pdf;

pub use html::HtmlTextExtractor;
pub use pdf::PdfTextExtractor;

use tracing::debug;

use crate::error::{RfpxError, TextError};
use crate::models::config::HtmlConfig;
use crate::models::document::{DocumentType, RawDocument};

/// Result type for text extraction.
pub type Result<T> = std::result::Result<T, TextError>;

/// Trait for document text extractors.
///
/// Implementations only read their input and keep nothing after returning.
pub trait TextExtractor: Send + Sync {
    /// The document type this extractor reads.
    fn document_type(&self) -> DocumentType;

    /// Convert document bytes into plain text.
    fn extract_text(&self, data: &[u8]) -> Result<String>;
}

/// Extractors keyed by document type.
pub struct TextExtractors {
    extractors: Vec<Box<dyn TextExtractor>>,
}

impl TextExtractors {
    /// An empty set; every document is unsupported until extractors are registered.
    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// The PDF and HTML extractors with the given HTML settings.
    pub fn with_html_config(html: &HtmlConfig) -> Self {
        let mut extractors = Self::empty();
        extractors.register(PdfTextExtractor::new());
        extractors.register(HtmlTextExtractor::from_config(html));
        extractors
    }

    /// Register an extractor, replacing any previous one for the same type.
    pub fn register<E: TextExtractor + 'static>(&mut self, extractor: E) {
        let document_type = extractor.document_type();
        self.extractors.retain(|e| e.document_type() != document_type);
        self.extractors.push(Box::new(extractor));
    }

    /// Extractor for a document type, if one is registered.
    pub fn get(&self, document_type: DocumentType) -> Option<&dyn TextExtractor> {
        self.extractors
            .iter()
            .find(|e| e.document_type() == document_type)
            .map(|e| e.as_ref())
    }

    /// Extract plain text from a document.
    pub fn extract(&self, document: &RawDocument) -> crate::Result<String> {
        let extractor = self
            .get(document.document_type)
            .ok_or_else(|| RfpxError::UnsupportedFormat(document.document_type.to_string()))?;

        debug!(
            "Extracting text from {} ({}, {} bytes)",
            document.name,
            document.document_type,
            document.data.len()
        );

        Ok(extractor.extract_text(&document.data)?)
    }
}

impl Default for TextExtractors {
    fn default() -> Self {
        Self::with_html_config(&HtmlConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct UpperHtml;

    impl TextExtractor for UpperHtml {
        fn document_type(&self) -> DocumentType {
            DocumentType::Html
        }

        fn extract_text(&self, data: &[u8]) -> Result<String> {
            Ok(String::from_utf8_lossy(data).to_uppercase())
        }
    }

    #[test]
    fn test_dispatch_by_type() {
        let extractors = TextExtractors::default();
        let document = RawDocument::new("a.html", DocumentType::Html, b"<p>Due Date: 2024-05-01</p>".to_vec());
        assert_eq!(extractors.extract(&document).unwrap(), "Due Date: 2024-05-01");
    }

    #[test]
    fn test_unregistered_type_is_unsupported() {
        let extractors = TextExtractors::empty();
        let document = RawDocument::new("a.pdf", DocumentType::Pdf, Vec::new());
        assert!(matches!(
            extractors.extract(&document),
            Err(RfpxError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_register_replaces_same_type() {
        let mut extractors = TextExtractors::default();
        extractors.register(UpperHtml);

        let document = RawDocument::new("a.html", DocumentType::Html, b"abc".to_vec());
        assert_eq!(extractors.extract(&document).unwrap(), "ABC");
        assert!(extractors.get(DocumentType::Pdf).is_some());
    }

    #[test]
    fn test_corrupt_pdf_is_extraction_failure() {
        let extractors = TextExtractors::default();
        let document = RawDocument::new("a.pdf", DocumentType::Pdf, b"this is not a pdf".to_vec());
        assert!(matches!(
            extractors.extract(&document),
            Err(RfpxError::Extraction(TextError::PdfParse(_)))
        ));
    }
}
