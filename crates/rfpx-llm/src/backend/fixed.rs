//! Backend that answers every prompt with the same text.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::trace;

use super::{Completion, CompletionModel};
use crate::Result;

/// A backend returning a canned reply, used for dry runs and tests.
#[derive(Debug)]
pub struct FixedReplyBackend {
    reply: String,
    calls: AtomicUsize,
}

impl FixedReplyBackend {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of prompts this backend has answered.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Default for FixedReplyBackend {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl CompletionModel for FixedReplyBackend {
    fn name(&self) -> &str {
        "fixed"
    }

    fn invoke(&self, prompt: &str) -> Result<Completion> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        trace!("Fixed backend answering prompt of {} chars", prompt.len());
        Ok(Completion::new(self.reply.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fixed_reply_is_returned_verbatim() {
        let backend = FixedReplyBackend::new("not json at all");
        let reply = backend.invoke("anything").unwrap();
        assert_eq!(reply.content, "not json at all");
        assert_eq!(backend.calls(), 1);
    }

    #[test]
    fn test_calls_through_box() {
        let backend: Box<dyn CompletionModel> = Box::new(FixedReplyBackend::default());
        assert_eq!(backend.name(), "fixed");
        assert_eq!(backend.invoke("x").unwrap().content, "{}");
    }
}
