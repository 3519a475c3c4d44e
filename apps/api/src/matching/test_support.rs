//! Shared builders for matching tests.

use std::collections::BTreeSet;

use crate::matching::types::{
    Candidate, DeliveryFormat, ExperienceLevel, Language, PreferredLanguage, Requirement,
};

pub fn candidate(id: &str) -> Candidate {
    Candidate {
        id: id.to_string(),
        name: format!("Trainer {id}"),
        title: "Corporate Trainer".to_string(),
        location: Some("Riyadh".to_string()),
        years_experience: 10.0,
        rate_per_hour: Some(150.0),
        rating: 4.5,
        languages: BTreeSet::from([Language::English, Language::Arabic]),
        formats_supported: BTreeSet::from([DeliveryFormat::Hybrid]),
        expertise_tags: BTreeSet::from(["safety".to_string()]),
        certifications: vec![],
        sector_affinity: BTreeSet::from(["oil-gas".to_string()]),
    }
}

pub fn requirement(sector: &str) -> Requirement {
    Requirement {
        sector: sector.to_string(),
        training_type: "Safety Training".to_string(),
        preferred_language: PreferredLanguage::Bilingual,
        format: DeliveryFormat::Hybrid,
        experience_level: ExperienceLevel::Senior,
        budget_per_hour: None,
        timeframe: None,
        specific_skills: BTreeSet::new(),
        location: None,
    }
}
