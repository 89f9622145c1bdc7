//! REST client for an OpenAI-compatible `/chat/completions` endpoint.

use async_trait::async_trait;

use crate::config::AiConfig;
use crate::error::AiError;
use crate::provider::CompletionProvider;
use crate::types::{ChatCompletion, ChatRequest};

/// HTTP client for the chat-completion API.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiClient {
    /// Build a client with the configured request timeout.
    pub fn new(config: &AiConfig) -> Result<Self, AiError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &AiConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`AiError::Api`] containing
    /// the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, AiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::NotConfigured)?;

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            structured = request.response_format.is_some(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        let completion: ChatCompletion = Self::ensure_success(response).await?.json().await?;

        if let Some(usage) = completion.usage {
            tracing::debug!(
                model = %completion.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Chat completion received"
            );
        }
        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::types::ChatMessage;

    fn request() -> ChatRequest {
        ChatRequest {
            model: "gpt-3.5-turbo".into(),
            messages: vec![ChatMessage::user("hi")],
            response_format: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
        }
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let client = OpenAiClient::new(&AiConfig::default()).unwrap();
        assert!(!client.is_configured());
        let err = client.complete(&request()).await.unwrap_err();
        assert_matches!(err, AiError::NotConfigured);
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = AiConfig {
            api_key: Some("  ".into()),
            ..AiConfig::default()
        };
        let client = OpenAiClient::new(&config).unwrap();
        assert!(!client.is_configured());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = AiConfig {
            base_url: "http://localhost:8080/v1/".into(),
            ..AiConfig::default()
        };
        let client = OpenAiClient::new(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:8080/v1");
    }
}
