//! Core library for RFP field extraction.
//!
//! This crate provides:
//! - Plain-text extraction from PDF and HTML procurement documents
//! - The fixed 20-field RFP schema and its records
//! - Prompt construction and best-effort parsing of model replies
//! - A two-stage pipeline with single, batch and combined runs

pub mod error;
pub mod extraction;
pub mod models;
pub mod pipeline;
pub mod schema;
pub mod text;

pub use error::{Result, RfpxError, TextError};
pub use extraction::{ExtractionEngine, PromptBuilder};
#[cfg(feature = "http")]
pub use extraction::create_model;
pub use models::config::RfpxConfig;
pub use models::document::{DocumentSource, DocumentType, RawDocument};
pub use models::record::ExtractionRecord;
pub use pipeline::{BatchItem, CombinedRun, PipelineContext, RfpPipeline};
pub use text::{HtmlTextExtractor, PdfTextExtractor, TextExtractor, TextExtractors};

/// Re-export model types.
pub use rfpx_llm::{Completion, CompletionModel, FixedReplyBackend, InvocationError};

#[cfg(feature = "http")]
pub use rfpx_llm::{ChatCompletionsBackend, ChatCompletionsSettings};
