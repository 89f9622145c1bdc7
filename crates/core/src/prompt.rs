//! Prompt text for the vision analysis and profile-writing requests.

use crate::animal::AnimalSubmission;

/// System prompt for photo analysis.
pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are an expert at analyzing animal photos. \
Extract keywords and distinctive features about the animal and describe its coat, \
physical characteristics and visible health indicators.";

/// User instruction sent alongside the photos.
pub const ANALYSIS_USER_PROMPT: &str = "Analyze this animal photo and provide:\n\
1. Keywords that describe the animal (breed, color, size, etc)\n\
2. Distinctive features or characteristics\n\
3. Coat type and texture, eye color and ear type\n\
4. Visible health indicators with an appearance score from 1 to 10";

/// System prompt for adoption-profile writing.
pub const PROFILE_SYSTEM_PROMPT: &str = "You are an expert at writing compelling and emotional \
pet adoption profiles. Write a profile that will help this pet find their forever home.";

const PROFILE_CLOSING: &str =
    "Make it emotional and engaging, highlighting the pet's unique personality and needs.";

/// Build the user prompt for profile generation.
///
/// Name, type and age are always listed. Optional details and analysis
/// attributes only produce a line when present and non-empty.
pub fn build_profile_prompt(animal: &AnimalSubmission) -> String {
    let mut lines = vec![
        "Create an adoption profile with these details:".to_string(),
        format!("Name: {}", animal.name),
        format!("Type: {}", animal.animal_type),
        format!("Age: {}", animal.age),
    ];

    push_field(&mut lines, "Gender", Some(animal.gender.as_str()));
    push_field(&mut lines, "Temperament", animal.temperament.as_deref());
    push_field(&mut lines, "Health Information", animal.health_notes.as_deref());
    push_field(&mut lines, "Background Story", animal.backstory.as_deref());
    push_field(&mut lines, "Ideal Home", animal.ideal_home.as_deref());

    let mut details = Vec::new();
    push_list(&mut details, "Colors", &animal.colors);
    push_list(&mut details, "Breed", &animal.breed);
    push_list(&mut details, "Distinctive Features", &animal.distinctive_features);
    push_list(&mut details, "Keywords", &animal.keywords);
    if let Some(coat) = &animal.coat {
        details.push(format!("Coat: {} - {}", coat.coat_type, coat.texture));
    }
    if let Some(physical) = &animal.physical_characteristics {
        details.push(format!(
            "Physical Characteristics: Eye Color: {}, Ear Type: {}",
            physical.eye_color, physical.ear_type
        ));
    }
    if let Some(health) = &animal.health_indicators {
        let mut line = format!(
            "Health: General Health: {}, Appearance Score: {}/10",
            health.general_health, health.appearance_score
        );
        if !health.visible_conditions.is_empty() {
            line.push_str(&format!(
                ", Conditions: {}",
                health.visible_conditions.join(", ")
            ));
        }
        details.push(line);
    }

    if !details.is_empty() {
        lines.push(String::new());
        lines.push("Additional Details:".to_string());
        lines.extend(details);
    }

    lines.push(String::new());
    lines.push(PROFILE_CLOSING.to_string());
    lines.join("\n")
}

fn push_field(lines: &mut Vec<String>, label: &str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        lines.push(format!("{label}: {value}"));
    }
}

fn push_list(lines: &mut Vec<String>, label: &str, values: &[String]) {
    if !values.is_empty() {
        lines.push(format!("{label}: {}", values.join(", ")));
    }
}
