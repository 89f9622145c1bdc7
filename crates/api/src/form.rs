//! Extraction of animal submissions from request bodies.
//!
//! Two body shapes are accepted:
//!
//! - `multipart/form-data` with image files in `images`, `images[]` or
//!   `image` parts and the JSON record in a `data` part;
//! - `application/json` carrying the record itself, without images.
//!
//! Every image is validated while it is read, so an oversize file is
//! rejected as soon as it crosses the limit.

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use openpaws_core::animal::AnimalSubmission;
use openpaws_core::error::CoreError;
use openpaws_core::upload::{self, ImageKind, UploadError, MAX_IMAGE_BYTES};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Multipart part names that carry image files.
pub const IMAGE_FIELDS: &[&str] = &["images", "images[]", "image"];

/// Multipart part name that carries the JSON record.
pub const DATA_FIELD: &str = "data";

/// A validated image held in memory until it is stored.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Client-side file name, for logging only.
    pub file_name: String,
    /// Format detected from the file content.
    pub kind: ImageKind,
    pub data: Bytes,
}

/// A submission body: the raw JSON record (if any) plus validated images.
#[derive(Debug, Default)]
pub struct AnimalForm {
    pub data: Option<Bytes>,
    pub images: Vec<UploadedImage>,
}

impl AnimalForm {
    /// Parse and validate the JSON record.
    ///
    /// Malformed JSON is an [`AppError::InvalidJson`]; well-formed JSON
    /// with missing or wrongly typed fields, or values that fail
    /// validation, is a [`CoreError::Validation`].
    pub fn submission(&self) -> AppResult<AnimalSubmission> {
        let raw = self
            .data
            .as_ref()
            .filter(|d| !d.iter().all(u8::is_ascii_whitespace))
            .ok_or_else(|| AppError::BadRequest(format!("Missing required '{DATA_FIELD}' field")))?;

        let submission: AnimalSubmission = match serde_json::from_slice(raw) {
            Ok(submission) => submission,
            Err(e) if e.is_data() => return Err(CoreError::Validation(e.to_string()).into()),
            Err(e) => return Err(AppError::InvalidJson(e)),
        };
        submission.validate().map_err(CoreError::from)?;
        Ok(submission)
    }

    /// The images, or [`UploadError::NoImages`] when there are none.
    pub fn require_images(&self) -> Result<&[UploadedImage], UploadError> {
        if self.images.is_empty() {
            return Err(UploadError::NoImages);
        }
        Ok(&self.images)
    }
}

impl<S> FromRequest<S> for AnimalForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            read_multipart(multipart).await
        } else if content_type.starts_with("application/json") {
            let body = Bytes::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(AnimalForm {
                data: Some(body),
                images: Vec::new(),
            })
        } else {
            Err(AppError::BadRequest(
                "Expected a multipart/form-data or application/json body".into(),
            ))
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> AppResult<AnimalForm> {
    let mut form = AnimalForm::default();

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        if name == DATA_FIELD {
            form.data = Some(field.bytes().await?);
        } else if IMAGE_FIELDS.contains(&name.as_str()) {
            upload::validate_image_count(form.images.len() + 1)?;

            let file_name = field.file_name().unwrap_or("upload").to_string();
            let content_type = field.content_type().map(str::to_string);

            let mut data = Vec::new();
            while let Some(chunk) = field.chunk().await? {
                if data.len() + chunk.len() > MAX_IMAGE_BYTES {
                    return Err(UploadError::TooLarge {
                        file_name,
                        size: data.len() + chunk.len(),
                        limit: MAX_IMAGE_BYTES,
                    }
                    .into());
                }
                data.extend_from_slice(&chunk);
            }

            let kind = upload::validate_image(&file_name, content_type.as_deref(), &data)?;
            form.images.push(UploadedImage {
                file_name,
                kind,
                data: Bytes::from(data),
            });
        } else {
            tracing::debug!(field = %name, "Ignoring unknown multipart field");
        }
    }

    Ok(form)
}
