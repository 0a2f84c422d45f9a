//! Data models: documents, extraction records, and configuration.

pub mod config;
pub mod document;
pub mod record;

pub use config::{ExtractionConfig, HtmlConfig, LlmConfig, ModelErrorPolicy, ReplyScan, RfpxConfig};
pub use document::{DocumentSource, DocumentType, RawDocument};
pub use record::ExtractionRecord;
