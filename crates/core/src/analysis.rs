//! Structured photo analysis returned by the vision model.
//!
//! The model is asked to reply with JSON conforming to [`analysis_schema`];
//! [`parse_analysis`] turns that reply into an [`ImageAnalysis`] and rejects
//! anything outside the schema's value ranges.

use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::error::CoreError;

/// Lowest allowed `healthIndicators.appearanceScore`.
pub const MIN_APPEARANCE_SCORE: f64 = 1.0;

/// Highest allowed `healthIndicators.appearanceScore`.
pub const MAX_APPEARANCE_SCORE: f64 = 10.0;

/// Name under which the schema is registered in the structured-output request.
pub const ANALYSIS_SCHEMA_NAME: &str = "analysis";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coat {
    #[serde(rename = "type")]
    pub coat_type: String,
    pub texture: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalCharacteristics {
    pub eye_color: String,
    pub ear_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HealthIndicators {
    #[validate(range(
        min = MIN_APPEARANCE_SCORE,
        max = MAX_APPEARANCE_SCORE,
        message = "must be between 1 and 10"
    ))]
    pub appearance_score: f64,
    #[serde(default)]
    pub visible_conditions: Vec<String>,
    pub general_health: String,
}

/// Attributes extracted from one or more photos of the same animal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    pub keywords: Vec<String>,
    pub features: Vec<String>,
    pub colors: Vec<String>,
    pub distinctive_features: Vec<String>,
    pub breed: Vec<String>,
    pub coat: Coat,
    pub physical_characteristics: PhysicalCharacteristics,
    #[validate(nested)]
    pub health_indicators: HealthIndicators,
}

/// JSON Schema for [`ImageAnalysis`] in the strict structured-output dialect:
/// every property required, no additional properties.
///
/// Range constraints are not expressible in that dialect, so the appearance
/// score bounds are enforced by [`parse_analysis`] instead.
pub fn analysis_schema() -> serde_json::Value {
    let string_list = json!({ "type": "array", "items": { "type": "string" } });

    json!({
        "type": "object",
        "properties": {
            "keywords": string_list,
            "features": string_list,
            "colors": string_list,
            "distinctiveFeatures": string_list,
            "breed": string_list,
            "coat": {
                "type": "object",
                "properties": {
                    "type": { "type": "string" },
                    "texture": { "type": "string" }
                },
                "required": ["type", "texture"],
                "additionalProperties": false
            },
            "physicalCharacteristics": {
                "type": "object",
                "properties": {
                    "eyeColor": { "type": "string" },
                    "earType": { "type": "string" }
                },
                "required": ["eyeColor", "earType"],
                "additionalProperties": false
            },
            "healthIndicators": {
                "type": "object",
                "properties": {
                    "appearanceScore": {
                        "type": "number",
                        "description": "Overall visual condition from 1 (poor) to 10 (excellent)"
                    },
                    "visibleConditions": string_list,
                    "generalHealth": { "type": "string" }
                },
                "required": ["appearanceScore", "visibleConditions", "generalHealth"],
                "additionalProperties": false
            }
        },
        "required": [
            "keywords",
            "features",
            "colors",
            "distinctiveFeatures",
            "breed",
            "coat",
            "physicalCharacteristics",
            "healthIndicators"
        ],
        "additionalProperties": false
    })
}

/// Parse and validate the model's JSON reply.
pub fn parse_analysis(content: &str) -> Result<ImageAnalysis, CoreError> {
    let analysis: ImageAnalysis = serde_json::from_str(content).map_err(|e| {
        CoreError::Validation(format!("analysis does not match the expected schema: {e}"))
    })?;
    analysis.validate()?;
    Ok(analysis)
}
