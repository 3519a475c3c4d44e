use sha2::{Digest, Sha256};

use crate::matching::types::Requirement;

/// Stable hex SHA-256 of a requirement, used to tie feedback to the search that
/// produced it. Free text is trimmed and lower-cased and skills are de-duplicated
/// case-insensitively, so cosmetic differences hash the same.
pub fn requirement_signature(requirement: &Requirement) -> String {
    let skills: std::collections::BTreeSet<String> = requirement
        .specific_skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    let canonical = [
        format!("sector={}", requirement.sector.trim()),
        format!("training_type={}", normalize(&requirement.training_type)),
        format!("language={:?}", requirement.preferred_language),
        format!("format={:?}", requirement.format),
        format!("experience={:?}", requirement.experience_level),
        format!(
            "budget={}",
            requirement
                .budget_per_hour
                .map(|b| format!("{b:.4}"))
                .unwrap_or_default()
        ),
        format!(
            "timeframe={}",
            requirement.timeframe.as_deref().map(normalize).unwrap_or_default()
        ),
        format!("skills={}", skills.into_iter().collect::<Vec<_>>().join(",")),
        format!(
            "location={}",
            requirement.location.as_deref().map(normalize).unwrap_or_default()
        ),
    ]
    .join("\n");

    hex::encode(Sha256::digest(canonical.as_bytes()))
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
