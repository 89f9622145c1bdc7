//! Shared query parameter types for API handlers.

use axum::extract::FromRequestParts;
use serde::Deserialize;

use crate::error::AppError;

/// `Query<T>` whose rejection is an [`AppError`], so malformed query
/// strings get the same JSON error body as every other failure.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped with `openpaws_core::search::clamp_limit` /
/// `clamp_offset` before they reach the repository.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Options for `POST /api/animals/generate-profile`.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateProfileParams {
    /// Run photo analysis on the uploaded images first and store its
    /// attributes on the new record.
    #[serde(default)]
    pub analyze: bool,
}
