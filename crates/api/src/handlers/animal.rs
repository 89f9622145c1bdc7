//! Handlers for animal adoption records.
//!
//! Submissions are fully read and validated before any side effect; images
//! are written to disk only once the record is about to be inserted, and
//! removed again if the insert fails.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use openpaws_ai::ImageAttachment;
use openpaws_core::animal::AnimalSubmission;
use openpaws_core::error::CoreError;
use openpaws_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use openpaws_core::types::DbId;
use openpaws_db::models::animal::{Animal, CreateAnimal};
use openpaws_db::repositories::AnimalRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::form::{AnimalForm, UploadedImage};
use crate::query::{ApiQuery, GenerateProfileParams, PaginationParams};
use crate::response::MessageResponse;
use crate::state::AppState;

/// Payload of a successful profile generation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedProfileResponse {
    pub animal: Animal,
    pub generated_profile: String,
}

/// POST /api/animals
///
/// Create a record from the `data` field and the uploaded images.
pub async fn create(
    State(state): State<AppState>,
    form: AnimalForm,
) -> AppResult<impl IntoResponse> {
    let submission = form.submission()?;
    let animal = persist(&state, submission, &form.images, None).await?;

    tracing::info!(animal_id = animal.id, images = animal.images.len(), "Animal profile created");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Animal profile created successfully", animal)),
    ))
}

/// POST /api/animals/generate-profile
///
/// Create a record and write its adoption profile. With `?analyze=true`
/// the uploaded photos are analyzed first and the detected attributes are
/// merged into the record before the profile is written.
pub async fn generate_profile(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<GenerateProfileParams>,
    form: AnimalForm,
) -> AppResult<impl IntoResponse> {
    let mut submission = form.submission()?;

    if params.analyze {
        let images = form.require_images()?;
        let analysis = state.ai.analyze_images(&attachments(images)).await?;
        submission.apply_analysis(analysis);
    }

    let profile = state.ai.generate_profile(&submission).await?;
    let animal = persist(&state, submission, &form.images, Some(profile.clone())).await?;

    tracing::info!(animal_id = animal.id, analyzed = params.analyze, "Profile generated and saved");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "Profile generated and saved successfully",
            GeneratedProfileResponse {
                animal,
                generated_profile: profile,
            },
        )),
    ))
}

/// POST /api/animals/analyze-image
///
/// Analyze one or more photos of the same animal. Nothing is stored.
pub async fn analyze_image(
    State(state): State<AppState>,
    form: AnimalForm,
) -> AppResult<impl IntoResponse> {
    let images = form.require_images()?;
    let analysis = state.ai.analyze_images(&attachments(images)).await?;

    tracing::info!(images = images.len(), "Images analyzed");
    Ok(Json(MessageResponse::new("Images analyzed successfully", analysis)))
}

/// GET /api/animals
///
/// Newest records first, paged with `?limit=&offset=`.
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);
    let animals = AnimalRepo::list(&state.pool, limit, offset).await?;

    Ok(Json(MessageResponse::new("Animals retrieved successfully", animals)))
}

/// GET /api/animals/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&raw_id)?;
    let animal = AnimalRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(&raw_id))?;

    Ok(Json(MessageResponse::new("Animal retrieved successfully", animal)))
}

/// POST /api/animals/{id}/generate-profile
///
/// Write a fresh profile for an existing record and store it.
pub async fn regenerate_profile(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&raw_id)?;
    let existing = AnimalRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(&raw_id))?;

    let profile = state.ai.generate_profile(&existing.to_submission()).await?;
    let animal = AnimalRepo::update_generated_profile(&state.pool, id, &profile)
        .await?
        .ok_or_else(|| not_found(&raw_id))?;

    tracing::info!(animal_id = id, "Profile regenerated");
    Ok(Json(MessageResponse::new(
        "Profile regenerated successfully",
        GeneratedProfileResponse {
            animal,
            generated_profile: profile,
        },
    )))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Write the images, then insert the record; on insert failure the files
/// written here are removed.
async fn persist(
    state: &AppState,
    submission: AnimalSubmission,
    images: &[UploadedImage],
    generated_profile: Option<String>,
) -> AppResult<Animal> {
    let stored = state.images.save_all(images).await.map_err(|e| {
        AppError::InternalError(format!("Failed to store uploaded images: {e}"))
    })?;

    let input = CreateAnimal {
        submission,
        images: stored.iter().map(|f| f.url.clone()).collect(),
        generated_profile,
    };

    match AnimalRepo::create(&state.pool, &input).await {
        Ok(animal) => Ok(animal),
        Err(e) => {
            state.images.remove_all(&stored).await;
            Err(e.into())
        }
    }
}

fn attachments(images: &[UploadedImage]) -> Vec<ImageAttachment<'_>> {
    images
        .iter()
        .map(|image| ImageAttachment {
            kind: image.kind,
            data: &image.data,
        })
        .collect()
}

/// Ids that are not positive integers can never match a record.
fn parse_id(raw: &str) -> Result<DbId, CoreError> {
    raw.parse::<DbId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| not_found(raw))
}

fn not_found(id: &str) -> CoreError {
    CoreError::NotFound {
        entity: "Animal",
        id: id.to_string(),
    }
}
