pub mod animal;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /animals                          list, create
/// /animals/generate-profile         create with generated profile (POST)
/// /animals/analyze-image            photo analysis, nothing stored (POST)
/// /animals/{id}                     get
/// /animals/{id}/generate-profile    regenerate stored profile (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/animals", animal::router())
}
