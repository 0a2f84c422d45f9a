//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for the rfpx pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RfpxConfig {
    /// Language model endpoint configuration.
    pub llm: LlmConfig,

    /// Structured extraction configuration.
    pub extraction: ExtractionConfig,

    /// HTML text extraction configuration.
    pub html: HtmlConfig,
}

/// Language model endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,

    /// Model identifier.
    pub model: String,

    /// Environment variable holding the API key. The key itself is never
    /// written to the config file.
    pub api_key_env: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Optional cap on reply tokens.
    pub max_tokens: Option<u32>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            temperature: 0.0,
            max_tokens: None,
            timeout_secs: 120,
        }
    }
}

/// How the JSON object is located inside a model reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyScan {
    /// Everything from the first `{` to the last `}`.
    #[default]
    Outermost,
    /// The first brace-balanced object, ignoring braces inside JSON strings.
    Balanced,
}

/// What the engine does when the model call itself fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelErrorPolicy {
    /// Return the invocation error to the caller.
    #[default]
    Propagate,
    /// Log the error and return the all-empty record.
    EmptyRecord,
}

/// Structured extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum number of characters of document text embedded in the prompt.
    pub max_text_chars: usize,

    /// JSON candidate location strategy.
    pub reply_scan: ReplyScan,

    /// Model failure handling.
    pub on_model_error: ModelErrorPolicy,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_text_chars: crate::extraction::DEFAULT_MAX_TEXT_CHARS,
            reply_scan: ReplyScan::default(),
            on_model_error: ModelErrorPolicy::default(),
        }
    }
}

/// HTML text extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    /// Elements whose text content is discarded.
    pub skip_tags: Vec<String>,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            skip_tags: ["script", "style", "noscript", "template"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

impl RfpxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(feature = "http")]
impl LlmConfig {
    /// Build connection settings, reading the API key from the environment.
    pub fn settings(&self) -> rfpx_llm::Result<rfpx_llm::ChatCompletionsSettings> {
        rfpx_llm::ChatCompletionsSettings {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key: String::new(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout: std::time::Duration::from_secs(self.timeout_secs),
        }
        .with_api_key_from_env(&self.api_key_env)
    }
}
