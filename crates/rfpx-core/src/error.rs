//! Error types for the rfpx-core library.

use thiserror::Error;

/// Main error type for the rfpx library.
///
/// Only infrastructure failures surface here. A model reply that cannot be
/// parsed is contained by the extraction engine and never becomes an error.
#[derive(Error, Debug)]
pub enum RfpxError {
    /// The document type is not one the pipeline can read.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// Text could not be extracted from the document.
    #[error("text extraction failed: {0}")]
    Extraction(#[from] TextError),

    /// The language model call itself failed.
    #[error("model invocation failed: {0}")]
    Model(#[from] rfpx_llm::InvocationError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning a document into plain text.
#[derive(Error, Debug)]
pub enum TextError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    PdfParse(String),

    /// Failed to decode text from the PDF content streams.
    #[error("failed to decode PDF text: {0}")]
    PdfText(String),

    /// The PDF is encrypted and the empty password did not open it.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The HTML document is not valid UTF-8.
    #[error("HTML is not valid UTF-8: {0}")]
    Encoding(String),
}

/// Result type for the rfpx library.
pub type Result<T> = std::result::Result<T, RfpxError>;
