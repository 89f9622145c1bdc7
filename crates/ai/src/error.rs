use openpaws_core::error::CoreError;

/// Errors from the AI layer.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// No API key was configured, so no request can be made.
    #[error("AI API key is not configured")]
    NotConfigured,

    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("AI API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The model declined to answer.
    #[error("Model refused the request: {0}")]
    Refusal(String),

    /// The completion carried no usable content.
    #[error("Model returned an empty response")]
    EmptyResponse,

    /// The reply did not satisfy the requested output schema.
    #[error("Model output is invalid: {0}")]
    InvalidOutput(#[from] CoreError),
}
