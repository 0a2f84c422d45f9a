//! Text completion abstraction layer for rfpx.
//!
//! This crate provides a single contract for calling a language model with a
//! prompt and getting its reply back as opaque text:
//! - `ChatCompletionsBackend` for OpenAI-compatible HTTP endpoints (Groq by default)
//! - `FixedReplyBackend` for dry runs and tests

mod backend;
mod error;

pub use backend::fixed::FixedReplyBackend;
pub use backend::{Completion, CompletionModel};
pub use error::InvocationError;

#[cfg(feature = "http")]
pub use backend::chat::{ChatCompletionsBackend, ChatCompletionsSettings};

/// Result type for model invocations.
pub type Result<T> = std::result::Result<T, InvocationError>;
