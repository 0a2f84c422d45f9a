//! Structured field extraction with a language model.

mod engine;
mod prompt;
pub mod reply;

pub use engine::ExtractionEngine;
pub use prompt::{truncate_chars, PromptBuilder};

/// Default cap on document characters embedded in a prompt.
pub const DEFAULT_MAX_TEXT_CHARS: usize = 8000;

/// Build the HTTP completion backend described by the config.
///
/// Fails if the API key variable is unset or the settings are unusable.
#[cfg(feature = "http")]
pub fn create_model(
    config: &crate::models::config::LlmConfig,
) -> crate::Result<rfpx_llm::ChatCompletionsBackend> {
    let settings = config.settings()?;
    Ok(rfpx_llm::ChatCompletionsBackend::new(settings)?)
}
