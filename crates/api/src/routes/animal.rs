//! Route definitions for animal adoption records, mounted at `/animals`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use openpaws_core::upload::MAX_UPLOAD_BODY_BYTES;

use crate::handlers::animal;
use crate::state::AppState;

/// ```text
/// GET    /                        -> list
/// POST   /                        -> create
/// POST   /generate-profile        -> generate_profile
/// POST   /analyze-image           -> analyze_image
/// GET    /{id}                    -> get_by_id
/// POST   /{id}/generate-profile   -> regenerate_profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(animal::list).post(animal::create))
        .route("/generate-profile", post(animal::generate_profile))
        .route("/analyze-image", post(animal::analyze_image))
        .route("/{id}", get(animal::get_by_id))
        .route("/{id}/generate-profile", post(animal::regenerate_profile))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES))
}
