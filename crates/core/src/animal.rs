//! The animal record as submitted by shelter staff.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::analysis::{Coat, HealthIndicators, ImageAnalysis, PhysicalCharacteristics};

/// The JSON `data` part of a create / generate-profile submission.
///
/// Analysis fields are whatever the client kept from a previous
/// `analyze-image` call; they are optional and default to empty.
/// Unknown keys (including any client-supplied `images`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnimalSubmission {
    #[validate(custom(function = "non_blank"))]
    pub name: String,
    #[serde(rename = "type")]
    #[validate(custom(function = "non_blank"))]
    pub animal_type: String,
    #[validate(custom(function = "non_blank"))]
    pub age: String,
    #[validate(custom(function = "non_blank"))]
    pub gender: String,
    pub temperament: Option<String>,
    pub health_notes: Option<String>,
    pub backstory: Option<String>,
    pub ideal_home: Option<String>,

    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub distinctive_features: Vec<String>,
    #[serde(default)]
    pub breed: Vec<String>,
    pub coat: Option<Coat>,
    pub physical_characteristics: Option<PhysicalCharacteristics>,
    #[validate(nested)]
    pub health_indicators: Option<HealthIndicators>,
}

impl AnimalSubmission {
    /// Overwrite the analysis fields with a fresh photo analysis.
    pub fn apply_analysis(&mut self, analysis: ImageAnalysis) {
        self.keywords = analysis.keywords;
        self.features = analysis.features;
        self.colors = analysis.colors;
        self.distinctive_features = analysis.distinctive_features;
        self.breed = analysis.breed;
        self.coat = Some(analysis.coat);
        self.physical_characteristics = Some(analysis.physical_characteristics);
        self.health_indicators = Some(analysis.health_indicators);
    }
}

/// Required text fields must contain something other than whitespace.
fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be empty".into()));
    }
    Ok(())
}
