//! Animal adoption record model and DTOs.

use openpaws_core::analysis::{Coat, HealthIndicators, PhysicalCharacteristics};
use openpaws_core::animal::AnimalSubmission;
use openpaws_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `animals` table, serialized in the client's camelCase shape.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    pub id: DbId,
    pub name: String,
    #[serde(rename = "type")]
    pub animal_type: String,
    pub age: String,
    pub gender: String,
    pub temperament: Option<String>,
    pub health_notes: Option<String>,
    pub backstory: Option<String>,
    pub ideal_home: Option<String>,
    /// Public URLs of the stored photos.
    pub images: Vec<String>,
    pub keywords: Vec<String>,
    pub features: Vec<String>,
    pub colors: Vec<String>,
    pub distinctive_features: Vec<String>,
    pub breed: Vec<String>,
    pub coat: Option<Json<Coat>>,
    pub physical_characteristics: Option<Json<PhysicalCharacteristics>>,
    pub health_indicators: Option<Json<HealthIndicators>>,
    pub generated_profile: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Animal {
    /// Rebuild the submission this record was created from, e.g. to
    /// regenerate its profile.
    pub fn to_submission(&self) -> AnimalSubmission {
        AnimalSubmission {
            name: self.name.clone(),
            animal_type: self.animal_type.clone(),
            age: self.age.clone(),
            gender: self.gender.clone(),
            temperament: self.temperament.clone(),
            health_notes: self.health_notes.clone(),
            backstory: self.backstory.clone(),
            ideal_home: self.ideal_home.clone(),
            keywords: self.keywords.clone(),
            features: self.features.clone(),
            colors: self.colors.clone(),
            distinctive_features: self.distinctive_features.clone(),
            breed: self.breed.clone(),
            coat: self.coat.as_ref().map(|c| c.0.clone()),
            physical_characteristics: self.physical_characteristics.as_ref().map(|p| p.0.clone()),
            health_indicators: self.health_indicators.as_ref().map(|h| h.0.clone()),
        }
    }
}

/// DTO for inserting a new record.
#[derive(Debug, Clone)]
pub struct CreateAnimal {
    pub submission: AnimalSubmission,
    pub images: Vec<String>,
    pub generated_profile: Option<String>,
}
