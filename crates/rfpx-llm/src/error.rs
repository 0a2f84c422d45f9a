//! Error types for the completion layer.

use thiserror::Error;

/// Errors that can occur while invoking a language model.
///
/// Every variant is an infrastructure failure (transport, auth, quota,
/// provider protocol). A reply that arrives but contains unusable text is not
/// an error at this layer.
#[derive(Error, Debug)]
pub enum InvocationError {
    /// No API key was found in the configured environment variable.
    #[error("API key not set: environment variable {0} is empty or missing")]
    MissingApiKey(String),

    /// The request could not be sent or the connection failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-success HTTP status.
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The provider answered but the body could not be decoded.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// The provider answered with no choices.
    #[error("provider returned no completion")]
    EmptyResponse,

    /// The backend was configured with unusable settings.
    #[error("invalid backend configuration: {0}")]
    Config(String),
}
