//! PDF text extraction using lopdf and pdf-extract.

use std::panic;

use lopdf::Document;
use tracing::{debug, warn};

use super::{Result, TextExtractor};
use crate::error::TextError;
use crate::models::document::DocumentType;

/// PDF text extractor.
///
/// lopdf validates the structure (and removes empty-password encryption),
/// pdf-extract decodes the content streams page by page in document order.
/// Layout is not preserved.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parse the document and return bytes pdf-extract can read.
    fn prepare(&self, data: &[u8]) -> Result<(Vec<u8>, usize)> {
        let mut doc = Document::load_mem(data).map_err(|e| TextError::PdfParse(e.to_string()))?;

        let bytes = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(TextError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| TextError::PdfParse(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(TextError::NoPages);
        }

        Ok((bytes, page_count))
    }
}

impl TextExtractor for PdfTextExtractor {
    fn document_type(&self) -> DocumentType {
        DocumentType::Pdf
    }

    fn extract_text(&self, data: &[u8]) -> Result<String> {
        let (bytes, page_count) = self.prepare(data)?;

        // pdf-extract panics on some structurally valid files (e.g. a font
        // missing from the page resources)
        let text = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&bytes))
            .map_err(|payload| TextError::PdfText(panic_message(payload.as_ref())))?
            .map_err(|e| TextError::PdfText(e.to_string()))?;

        if text.trim().is_empty() {
            warn!("PDF with {} pages has no extractable text (scanned?)", page_count);
        }
        debug!("Extracted {} chars from {} PDF pages", text.len(), page_count);

        Ok(text)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("decoder panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("decoder panicked: {}", message)
    } else {
        "decoder panicked".to_string()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// A single-page PDF showing each line with Helvetica.
    pub(crate) fn make_pdf(lines: &[&str]) -> Vec<u8> {
        make_pdf_with_font(lines, "F1")
    }

    /// Like [`make_pdf`], but the content selects `font`, which may be
    /// absent from the page resources (only `F1` is defined).
    pub(crate) fn make_pdf_with_font(lines: &[&str], font: &str) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(font.as_bytes().to_vec()), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
        ];
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                operations.push(Operation::new("Td", vec![0.into(), (-24).into()]));
            }
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn test_garbage_bytes() {
        let result = PdfTextExtractor::new().extract_text(b"this is not a pdf");
        assert!(matches!(result, Err(TextError::PdfParse(_))));
    }

    #[test]
    fn test_extracts_page_text() {
        let pdf = make_pdf(&["Bid Number: 12345", "Due Date: 2024-01-01"]);
        let text = PdfTextExtractor::new().extract_text(&pdf).unwrap();

        assert!(text.contains("Bid Number: 12345"), "got: {text:?}");
        assert!(text.contains("Due Date: 2024-01-01"), "got: {text:?}");
        let bid = text.find("Bid Number").unwrap();
        let due = text.find("Due Date").unwrap();
        assert!(bid < due);
    }

    #[test]
    fn test_undefined_font_is_an_error() {
        let pdf = make_pdf_with_font(&["Bid Number: 12345"], "F9");
        let result = PdfTextExtractor::new().extract_text(&pdf);
        assert!(matches!(result, Err(TextError::PdfText(_))), "got: {result:?}");
    }
}
