//! OpenAI-compatible chat completions backend (Groq, OpenRouter, Ollama, ...).

use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Completion, CompletionModel};
use crate::error::InvocationError;
use crate::Result;

/// Default endpoint: Groq's OpenAI-compatible API.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default model served by the default endpoint.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Connection settings for a chat completions endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionsSettings {
    /// Base URL without the `/chat/completions` suffix.
    pub base_url: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Bearer token.
    pub api_key: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Optional cap on reply tokens.
    pub max_tokens: Option<u32>,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for ChatCompletionsSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            temperature: 0.0,
            max_tokens: None,
            timeout: Duration::from_secs(120),
        }
    }
}

impl ChatCompletionsSettings {
    /// Read the API key from an environment variable.
    pub fn with_api_key_from_env(mut self, var: &str) -> Result<Self> {
        let key = std::env::var(var).unwrap_or_default();
        if key.trim().is_empty() {
            return Err(InvocationError::MissingApiKey(var.to_string()));
        }
        self.api_key = key.trim().to_string();
        Ok(self)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn into_completion(self) -> Result<Completion> {
        self.choices
            .into_iter()
            .next()
            .map(|c| Completion::new(c.message.content.unwrap_or_default()))
            .ok_or(InvocationError::EmptyResponse)
    }
}

/// Blocking client for `POST {base_url}/chat/completions`.
pub struct ChatCompletionsBackend {
    client: Client,
    settings: ChatCompletionsSettings,
}

impl ChatCompletionsBackend {
    /// Create a backend from settings.
    pub fn new(settings: ChatCompletionsSettings) -> Result<Self> {
        if settings.base_url.trim().is_empty() {
            return Err(InvocationError::Config("base_url is empty".to_string()));
        }
        if settings.model.trim().is_empty() {
            return Err(InvocationError::Config("model is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| InvocationError::Config(e.to_string()))?;

        Ok(Self { client, settings })
    }

    /// Model identifier this backend sends.
    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        }
    }
}

impl CompletionModel for ChatCompletionsBackend {
    fn name(&self) -> &str {
        "chat-completions"
    }

    fn invoke(&self, prompt: &str) -> Result<Completion> {
        let start = Instant::now();
        let url = self.settings.endpoint();

        debug!(model = %self.settings.model, url = %url, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.settings.api_key)
            .json(&self.request_body(prompt))
            .send()
            .map_err(|e| InvocationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(InvocationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response
            .json()
            .map_err(|e| InvocationError::InvalidResponse(e.to_string()))?;
        let completion = chat.into_completion()?;

        debug!(
            "Completion of {} chars received in {}ms",
            completion.content.len(),
            start.elapsed().as_millis()
        );

        Ok(completion)
    }
}
