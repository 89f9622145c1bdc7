//! Photo analysis and adoption-profile generation on top of a
//! [`CompletionProvider`].

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use openpaws_core::analysis::{self, ImageAnalysis, ANALYSIS_SCHEMA_NAME};
use openpaws_core::animal::AnimalSubmission;
use openpaws_core::prompt;
use openpaws_core::upload::ImageKind;

use crate::error::AiError;
use crate::provider::CompletionProvider;
use crate::types::{
    ChatCompletion, ChatMessage, ChatRequest, ContentPart, ImageUrl, JsonSchemaFormat,
    ResponseFormat,
};

/// Token budget for the structured analysis reply.
pub const ANALYSIS_MAX_TOKENS: u32 = 800;

/// Token budget for a generated profile.
pub const PROFILE_MAX_TOKENS: u32 = 500;

pub const PROFILE_TEMPERATURE: f32 = 0.7;

pub const PROFILE_TOP_P: f32 = 0.9;

/// An uploaded photo to send inline with a vision request.
#[derive(Debug, Clone, Copy)]
pub struct ImageAttachment<'a> {
    pub kind: ImageKind,
    pub data: &'a [u8],
}

impl ImageAttachment<'_> {
    /// `data:{mime};base64,{payload}` URL for inline transmission.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.kind.mime(), STANDARD.encode(self.data))
    }
}

/// The backend's two AI operations, bound to a provider and model names.
#[derive(Clone)]
pub struct AiService {
    provider: Arc<dyn CompletionProvider>,
    vision_model: String,
    profile_model: String,
}

impl AiService {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        vision_model: impl Into<String>,
        profile_model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            vision_model: vision_model.into(),
            profile_model: profile_model.into(),
        }
    }

    /// Analyze one or more photos of the same animal in a single request.
    ///
    /// The reply must conform to [`analysis::analysis_schema`]; anything else
    /// is reported as [`AiError::InvalidOutput`].
    pub async fn analyze_images(
        &self,
        images: &[ImageAttachment<'_>],
    ) -> Result<ImageAnalysis, AiError> {
        let mut parts = Vec::with_capacity(images.len() + 1);
        parts.push(ContentPart::Text {
            text: prompt::ANALYSIS_USER_PROMPT.to_string(),
        });
        parts.extend(images.iter().map(|image| ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: image.data_url(),
            },
        }));

        let request = ChatRequest {
            model: self.vision_model.clone(),
            messages: vec![
                ChatMessage::system(prompt::ANALYSIS_SYSTEM_PROMPT),
                ChatMessage::user_parts(parts),
            ],
            response_format: Some(ResponseFormat::JsonSchema {
                json_schema: JsonSchemaFormat {
                    name: ANALYSIS_SCHEMA_NAME.to_string(),
                    strict: true,
                    schema: analysis::analysis_schema(),
                },
            }),
            max_tokens: Some(ANALYSIS_MAX_TOKENS),
            temperature: None,
            top_p: None,
        };

        tracing::debug!(image_count = images.len(), model = %self.vision_model, "Requesting image analysis");
        let completion = self.provider.complete(&request).await?;
        let content = reply_content(&completion)?;
        let analysis = analysis::parse_analysis(content)?;
        tracing::debug!(breed = ?analysis.breed, "Image analysis parsed");
        Ok(analysis)
    }

    /// Write an adoption profile for the given animal.
    pub async fn generate_profile(&self, animal: &AnimalSubmission) -> Result<String, AiError> {
        let request = ChatRequest {
            model: self.profile_model.clone(),
            messages: vec![
                ChatMessage::system(prompt::PROFILE_SYSTEM_PROMPT),
                ChatMessage::user(prompt::build_profile_prompt(animal)),
            ],
            response_format: None,
            max_tokens: Some(PROFILE_MAX_TOKENS),
            temperature: Some(PROFILE_TEMPERATURE),
            top_p: Some(PROFILE_TOP_P),
        };

        let completion = self.provider.complete(&request).await?;
        let profile = reply_content(&completion)?.trim().to_string();
        tracing::info!(name = %animal.name, chars = profile.len(), "Profile generated");
        Ok(profile)
    }
}

/// Extract the first choice's text, surfacing refusals and empty replies.
fn reply_content(completion: &ChatCompletion) -> Result<&str, AiError> {
    let message = completion.first_message().ok_or(AiError::EmptyResponse)?;
    if let Some(refusal) = message.refusal.as_deref().filter(|r| !r.is_empty()) {
        return Err(AiError::Refusal(refusal.to_string()));
    }
    message
        .content
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .ok_or(AiError::EmptyResponse)
}
