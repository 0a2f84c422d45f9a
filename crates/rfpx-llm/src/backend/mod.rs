//! Completion backend implementations.

#[cfg(feature = "http")]
pub mod chat;

pub mod fixed;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Reply from a language model.
///
/// Only the text content is exposed; provider-specific metadata (usage,
/// finish reasons, ids) never crosses this boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// Raw reply text.
    pub content: String,
}

impl Completion {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Trait for text completion backends.
///
/// A call blocks the current thread until the provider answers or the
/// backend's own timeout fires. Implementations make exactly one attempt.
pub trait CompletionModel: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Send a prompt and return the model's reply.
    fn invoke(&self, prompt: &str) -> Result<Completion>;
}

impl<M: CompletionModel + ?Sized> CompletionModel for &M {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn invoke(&self, prompt: &str) -> Result<Completion> {
        (**self).invoke(prompt)
    }
}

impl<M: CompletionModel + ?Sized> CompletionModel for Box<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn invoke(&self, prompt: &str) -> Result<Completion> {
        (**self).invoke(prompt)
    }
}

impl<M: CompletionModel + ?Sized> CompletionModel for Arc<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn invoke(&self, prompt: &str) -> Result<Completion> {
        (**self).invoke(prompt)
    }
}
