use axum::extract::multipart::MultipartError;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use openpaws_ai::AiError;
use openpaws_core::error::CoreError;
use openpaws_core::upload::UploadError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain, upload, AI and database errors and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent
/// `{ "error", "code", "details" }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `openpaws_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An uploaded file broke the upload rules.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// The AI API failed or returned unusable output.
    #[error("AI service error: {0}")]
    Ai(#[from] AiError),

    /// The multipart body could not be read.
    #[error("Invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),

    /// The `data` field (or JSON body) is not valid JSON for an animal record.
    #[error("Invalid JSON data: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Status, machine-readable code, summary and optional details of an error.
struct ErrorParts {
    status: StatusCode,
    code: &'static str,
    error: String,
    details: Option<String>,
}

impl ErrorParts {
    fn new(status: StatusCode, code: &'static str, error: impl Into<String>) -> Self {
        Self {
            status,
            code,
            error: error.into(),
            details: None,
        }
    }

    fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred",
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let parts = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => {
                    ErrorParts::new(StatusCode::NOT_FOUND, "NOT_FOUND", format!("{entity} not found"))
                        .details(format!("No {entity} with id {id}"))
                }
                CoreError::Validation(msg) => {
                    ErrorParts::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", "Validation failed")
                        .details(msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    ErrorParts::internal()
                }
            },

            // --- Upload rule violations ---
            AppError::Upload(err) => {
                let summary = match err {
                    UploadError::NoImages => "No image files uploaded",
                    UploadError::UnsupportedType { .. } | UploadError::ContentMismatch { .. } => {
                        "Invalid file type"
                    }
                    UploadError::TooLarge { .. } => "File too large",
                    UploadError::TooMany { .. } => "Too many files",
                };
                tracing::warn!(error = %err, "Rejected upload");
                ErrorParts::new(StatusCode::BAD_REQUEST, "INVALID_UPLOAD", summary)
                    .details(err.to_string())
            }

            // --- AI API failures ---
            AppError::Ai(err) => {
                tracing::error!(error = %err, "AI request failed");
                ErrorParts::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AI_SERVICE_ERROR",
                    "AI service request failed",
                )
                .details(err.to_string())
            }

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::Multipart(err) => {
                // Includes bodies cut off by the size limit (413 from axum).
                tracing::warn!(error = %err, status = %err.status(), "Unreadable multipart body");
                ErrorParts::new(StatusCode::BAD_REQUEST, "INVALID_UPLOAD", "Invalid multipart body")
                    .details(err.body_text())
            }
            AppError::InvalidJson(err) => {
                ErrorParts::new(StatusCode::BAD_REQUEST, "INVALID_JSON", "Invalid JSON data")
                    .details(format!("The data field must contain valid JSON: {err}"))
            }
            AppError::BadRequest(msg) => {
                ErrorParts::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ErrorParts::internal()
            }
        };

        let mut body = json!({
            "error": parts.error,
            "code": parts.code,
        });
        if let Some(details) = parts.details {
            body["details"] = json!(details);
        }

        (parts.status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into HTTP error parts.
///
/// - `RowNotFound` maps to 404.
/// - CHECK constraint violations (SQLSTATE 23514) map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    match err {
        sqlx::Error::RowNotFound => {
            ErrorParts::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23514") => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            ErrorParts::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", "Validation failed")
                .details(format!("Value violates check constraint: {constraint}"))
        }
        other => {
            tracing::error!(error = %other, "Database error");
            ErrorParts::internal()
        }
    }
}
