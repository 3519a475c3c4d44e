use std::collections::BTreeSet;

use crate::matching::types::{
    DeliveryFormat, ExperienceLevel, PreferredLanguage, Requirement, SectorId,
};

/// An employer's job posting, ranked through the same engine as a training need.
#[derive(Debug, Clone)]
pub struct JobPosting {
    pub sector: SectorId,
    pub title: String,
    pub required_skills: Vec<String>,
    pub location: Option<String>,
    pub format: DeliveryFormat,
    pub experience_level: ExperienceLevel,
    pub language: PreferredLanguage,
    pub hourly_budget: Option<f64>,
}

impl From<JobPosting> for Requirement {
    fn from(job: JobPosting) -> Self {
        let specific_skills: BTreeSet<String> = job
            .required_skills
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Requirement {
            sector: job.sector,
            training_type: job.title.trim().to_string(),
            preferred_language: job.language,
            format: job.format,
            experience_level: job.experience_level,
            budget_per_hour: job.hourly_budget,
            timeframe: None,
            specific_skills,
            location: job.location.filter(|l| !l.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_posting_becomes_requirement() {
        let job = JobPosting {
            sector: "technology".to_string(),
            title: "  Cloud Architect Bootcamp ".to_string(),
            required_skills: vec!["AWS".into(), " ".into(), "Kubernetes ".into()],
            location: Some("Jeddah".to_string()),
            format: DeliveryFormat::InPerson,
            experience_level: ExperienceLevel::Expert,
            language: PreferredLanguage::Bilingual,
            hourly_budget: Some(400.0),
        };

        let req = Requirement::from(job);
        assert_eq!(req.training_type, "Cloud Architect Bootcamp");
        assert_eq!(
            req.specific_skills,
            BTreeSet::from(["AWS".to_string(), "Kubernetes".to_string()])
        );
        assert_eq!(req.budget_per_hour, Some(400.0));
        assert_eq!(req.location.as_deref(), Some("Jeddah"));
    }
}
