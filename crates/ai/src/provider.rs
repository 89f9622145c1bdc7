use async_trait::async_trait;

use crate::error::AiError;
use crate::types::{ChatCompletion, ChatRequest};

/// Something that can answer a chat-completion request.
///
/// [`crate::OpenAiClient`] talks to the real API; tests substitute canned
/// replies.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, AiError>;
}
