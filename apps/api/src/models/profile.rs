use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::debug;

use crate::matching::types::Candidate;

/// Row shape of the read-only `professionals` table owned by the profile service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfessionalRow {
    pub id: String,
    pub name: String,
    pub title: String,
    pub location: Option<String>,
    pub years_experience: f64,
    pub rate_per_hour: Option<f64>,
    pub rating: f64,
    pub languages: Vec<String>,
    pub formats_supported: Vec<String>,
    pub expertise_tags: Vec<String>,
    pub certifications: Vec<String>,
    pub sector_affinity: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfessionalRow> for Candidate {
    /// Unknown language or format strings are dropped; the scorer treats the
    /// remaining set as authoritative.
    fn from(row: ProfessionalRow) -> Self {
        let languages = parse_all(&row.id, "language", &row.languages);
        let formats_supported = parse_all(&row.id, "format", &row.formats_supported);

        Candidate {
            id: row.id,
            name: row.name,
            title: row.title,
            location: row.location.filter(|l| !l.trim().is_empty()),
            years_experience: row.years_experience,
            rate_per_hour: row.rate_per_hour,
            rating: row.rating,
            languages,
            formats_supported,
            expertise_tags: row
                .expertise_tags
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            certifications: row.certifications,
            sector_affinity: row
                .sector_affinity
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

fn parse_all<T: FromStr + Ord>(id: &str, field: &str, raw: &[String]) -> BTreeSet<T> {
    raw.iter()
        .filter_map(|value| match value.parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                debug!(candidate_id = id, field, value = value.as_str(), "Dropping unrecognised profile value");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::types::{DeliveryFormat, Language};

    #[test]
    fn test_row_converts_and_drops_unknown_values() {
        let row = ProfessionalRow {
            id: "p-1".to_string(),
            name: "Huda".to_string(),
            title: "HSE Trainer".to_string(),
            location: Some("  ".to_string()),
            years_experience: 9.0,
            rate_per_hour: Some(200.0),
            rating: 4.8,
            languages: vec!["english".into(), "Arabic".into(), "French".into()],
            formats_supported: vec!["in-person".into(), "webinar".into()],
            expertise_tags: vec![" NEBOSH ".into(), "".into()],
            certifications: vec!["IOSH".into()],
            sector_affinity: vec!["oil-gas".into(), " ".into()],
            updated_at: Utc::now(),
        };

        let candidate = Candidate::from(row);
        assert_eq!(candidate.location, None);
        assert_eq!(
            candidate.languages,
            BTreeSet::from([Language::English, Language::Arabic])
        );
        assert_eq!(
            candidate.formats_supported,
            BTreeSet::from([DeliveryFormat::InPerson])
        );
        assert_eq!(candidate.expertise_tags, BTreeSet::from(["NEBOSH".to_string()]));
        assert_eq!(candidate.sector_affinity, BTreeSet::from(["oil-gas".to_string()]));
    }
}
