//! The structured extraction engine.

use std::time::Instant;

use rfpx_llm::CompletionModel;
use tracing::{debug, info, warn};

use super::prompt::PromptBuilder;
use super::reply::parse_reply;
use crate::error::Result;
use crate::models::config::{ExtractionConfig, ModelErrorPolicy, ReplyScan};
use crate::models::record::ExtractionRecord;
use crate::schema;

/// Turns document text into a schema-conformant record with one model call.
///
/// A reply without a recoverable JSON object yields the all-empty record, so
/// callers always receive a well-shaped result. An empty record is therefore
/// ambiguous: the document may have had no data, or the reply may have been
/// unusable.
pub struct ExtractionEngine<M> {
    model: M,
    prompt: PromptBuilder,
    reply_scan: ReplyScan,
    on_model_error: ModelErrorPolicy,
}

impl<M: CompletionModel> ExtractionEngine<M> {
    /// Create an engine with default settings.
    pub fn new(model: M) -> Self {
        Self {
            model,
            prompt: PromptBuilder::new(),
            reply_scan: ReplyScan::default(),
            on_model_error: ModelErrorPolicy::default(),
        }
    }

    /// Create an engine from the extraction section of the config.
    pub fn from_config(model: M, config: &ExtractionConfig) -> Self {
        Self::new(model)
            .with_max_text_chars(config.max_text_chars)
            .with_reply_scan(config.reply_scan)
            .with_model_error_policy(config.on_model_error)
    }

    /// Set the prompt's source text cap.
    pub fn with_max_text_chars(mut self, max_text_chars: usize) -> Self {
        self.prompt = self.prompt.with_max_text_chars(max_text_chars);
        self
    }

    /// Set the JSON location strategy.
    pub fn with_reply_scan(mut self, reply_scan: ReplyScan) -> Self {
        self.reply_scan = reply_scan;
        self
    }

    /// Set model failure handling.
    pub fn with_model_error_policy(mut self, policy: ModelErrorPolicy) -> Self {
        self.on_model_error = policy;
        self
    }

    /// The underlying model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// The prompt that `extract` would send for `text`.
    pub fn render_prompt(&self, text: &str) -> String {
        self.prompt.build(schema::fields(), text)
    }

    /// Extract a record from document text.
    ///
    /// Makes a single model call. Fails only if that call fails and the
    /// policy is [`ModelErrorPolicy::Propagate`].
    pub fn extract(&self, text: &str) -> Result<ExtractionRecord> {
        let start = Instant::now();
        let prompt = self.render_prompt(text);

        info!(
            "Extracting structured data from {} chars of text with {}",
            text.chars().count(),
            self.model.name()
        );
        debug!("Prompt is {} chars", prompt.len());

        let reply = match self.model.invoke(&prompt) {
            Ok(completion) => completion.content,
            Err(e) => match self.on_model_error {
                ModelErrorPolicy::Propagate => return Err(e.into()),
                ModelErrorPolicy::EmptyRecord => {
                    warn!("Model invocation failed, returning empty record: {}", e);
                    return Ok(schema::empty_record());
                }
            },
        };

        let record = match parse_reply(&reply, self.reply_scan) {
            Some(object) => {
                let dropped = object
                    .keys()
                    .filter(|k| schema::position(k).is_none())
                    .count();
                if dropped > 0 {
                    debug!("Dropped {} keys outside the schema", dropped);
                }
                ExtractionRecord::reconcile(&object)
            }
            None => {
                warn!(
                    "No JSON object recovered from {} char reply, returning empty record",
                    reply.len()
                );
                schema::empty_record()
            }
        };

        let (filled, total) = record.coverage();
        debug!(
            "Extraction finished in {}ms, {}/{} fields filled",
            start.elapsed().as_millis(),
            filled,
            total
        );

        Ok(record)
    }
}
