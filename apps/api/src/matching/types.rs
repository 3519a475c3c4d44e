use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matching::error::MatchError;

pub type SectorId = String;

/// Number of scored dimensions. Weight vectors and served-score snapshots are
/// laid out in `Dimension::ALL` order.
pub const DIMENSIONS: usize = 6;

/// Score used when a dimension has no usable signal ("unknown, not disqualifying").
pub const UNKNOWN_SIGNAL: f64 = 0.5;

// ────────────────────────────────────────────────────────────────────────────
// Enumerations
// ────────────────────────────────────────────────────────────────────────────

/// A language a professional can deliver training in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Language {
    English,
    Arabic,
}

/// The delivery language a requirement asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreferredLanguage {
    English,
    Arabic,
    Bilingual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryFormat {
    Online,
    InPerson,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    Junior,
    Intermediate,
    Senior,
    Expert,
}

impl ExperienceLevel {
    /// Position on the shared 1..=5 scale used by `experienceMatch`.
    pub fn ordinal(self) -> u8 {
        match self {
            ExperienceLevel::Entry => 1,
            ExperienceLevel::Junior => 2,
            ExperienceLevel::Intermediate => 3,
            ExperienceLevel::Senior => 4,
            ExperienceLevel::Expert => 5,
        }
    }

    /// Maps years of practice onto the level scale.
    ///
    /// | years   | level        |
    /// |---------|--------------|
    /// | < 2     | entry        |
    /// | 2 – 4   | junior       |
    /// | 5 – 7   | intermediate |
    /// | 8 – 11  | senior       |
    /// | ≥ 12    | expert       |
    pub fn from_years(years: f64) -> Self {
        if years < 2.0 {
            ExperienceLevel::Entry
        } else if years < 5.0 {
            ExperienceLevel::Junior
        } else if years < 8.0 {
            ExperienceLevel::Intermediate
        } else if years < 12.0 {
            ExperienceLevel::Senior
        } else {
            ExperienceLevel::Expert
        }
    }
}

/// Upper-cases and converts separators so `in-person`, `In Person` and
/// `IN_PERSON` all parse the same way.
fn normalize_token(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

impl FromStr for Language {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "ENGLISH" | "EN" => Ok(Language::English),
            "ARABIC" | "AR" => Ok(Language::Arabic),
            _ => Err(MatchError::Validation(format!("unknown language '{s}'"))),
        }
    }
}

impl FromStr for PreferredLanguage {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "ENGLISH" | "EN" => Ok(PreferredLanguage::English),
            "ARABIC" | "AR" => Ok(PreferredLanguage::Arabic),
            "BILINGUAL" | "BOTH" => Ok(PreferredLanguage::Bilingual),
            _ => Err(MatchError::Validation(format!(
                "preferred_language must be one of ENGLISH, ARABIC, BILINGUAL (got '{s}')"
            ))),
        }
    }
}

impl FromStr for DeliveryFormat {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "ONLINE" => Ok(DeliveryFormat::Online),
            "IN_PERSON" | "INPERSON" | "ONSITE" => Ok(DeliveryFormat::InPerson),
            "HYBRID" => Ok(DeliveryFormat::Hybrid),
            _ => Err(MatchError::Validation(format!(
                "format must be one of ONLINE, IN_PERSON, HYBRID (got '{s}')"
            ))),
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "ENTRY" => Ok(ExperienceLevel::Entry),
            "JUNIOR" => Ok(ExperienceLevel::Junior),
            "INTERMEDIATE" | "MID" => Ok(ExperienceLevel::Intermediate),
            "SENIOR" => Ok(ExperienceLevel::Senior),
            "EXPERT" => Ok(ExperienceLevel::Expert),
            _ => Err(MatchError::Validation(format!(
                "experience_level must be one of entry, junior, intermediate, senior, expert (got '{s}')"
            ))),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Requirement / Candidate
// ────────────────────────────────────────────────────────────────────────────

/// A structured training need. Built per search call and never persisted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub sector: SectorId,
    pub training_type: String,
    pub preferred_language: PreferredLanguage,
    pub format: DeliveryFormat,
    pub experience_level: ExperienceLevel,
    pub budget_per_hour: Option<f64>,
    pub timeframe: Option<String>,
    pub specific_skills: BTreeSet<String>,
    pub location: Option<String>,
}

/// Read-projection of a professional profile, owned by the external profile store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub location: Option<String>,
    pub years_experience: f64,
    #[serde(default)]
    pub rate_per_hour: Option<f64>,
    pub rating: f64,
    #[serde(default)]
    pub languages: BTreeSet<Language>,
    #[serde(default)]
    pub formats_supported: BTreeSet<DeliveryFormat>,
    #[serde(default)]
    pub expertise_tags: BTreeSet<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub sector_affinity: BTreeSet<SectorId>,
}

impl Candidate {
    pub fn is_remote_capable(&self) -> bool {
        self.formats_supported.contains(&DeliveryFormat::Online)
            || self.formats_supported.contains(&DeliveryFormat::Hybrid)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scores
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Sector,
    Language,
    Format,
    Experience,
    Location,
    CulturalFit,
}

impl Dimension {
    pub const ALL: [Dimension; DIMENSIONS] = [
        Dimension::Sector,
        Dimension::Language,
        Dimension::Format,
        Dimension::Experience,
        Dimension::Location,
        Dimension::CulturalFit,
    ];
}

/// The six per-dimension scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionScores {
    pub sector_match: f64,
    pub language_match: f64,
    pub format_match: f64,
    pub experience_match: f64,
    pub location_match: f64,
    pub cultural_fit: f64,
}

impl DimensionScores {
    pub fn as_array(&self) -> [f64; DIMENSIONS] {
        [
            self.sector_match,
            self.language_match,
            self.format_match,
            self.experience_match,
            self.location_match,
            self.cultural_fit,
        ]
    }

    pub fn from_array(values: [f64; DIMENSIONS]) -> Self {
        Self {
            sector_match: values[0],
            language_match: values[1],
            format_match: values[2],
            experience_match: values[3],
            location_match: values[4],
            cultural_fit: values[5],
        }
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Sector => self.sector_match,
            Dimension::Language => self.language_match,
            Dimension::Format => self.format_match,
            Dimension::Experience => self.experience_match,
            Dimension::Location => self.location_match,
            Dimension::CulturalFit => self.cultural_fit,
        }
    }
}

/// Scoring result for one candidate against one requirement. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub candidate_id: String,
    pub overall_score: f64,
    #[serde(flatten)]
    pub dimensions: DimensionScores,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBand {
    Excellent,
    Good,
    Fair,
    Low,
}

impl MatchBand {
    pub fn from_score(overall: f64) -> Self {
        if overall >= 0.8 {
            MatchBand::Excellent
        } else if overall >= 0.6 {
            MatchBand::Good
        } else if overall >= 0.4 {
            MatchBand::Fair
        } else {
            MatchBand::Low
        }
    }
}

/// One ranked entry: the denormalized candidate profile plus its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub candidate: Candidate,
    pub score: MatchScore,
    pub band: MatchBand,
    /// Requirement skills found in the candidate's tags or certifications.
    pub matched_skills: Vec<String>,
    /// `None` when either the budget or the candidate's rate is unknown.
    pub within_budget: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub requirement: Requirement,
    pub requirement_signature: String,
    pub total_found: usize,
    pub recommendations: Vec<Recommendation>,
    pub generated_at: DateTime<Utc>,
    /// Set when candidate data was unavailable and the empty result is a fallback.
    pub degraded: bool,
}

impl RecommendationSet {
    pub fn empty(requirement: Requirement, requirement_signature: String, degraded: bool) -> Self {
        Self {
            requirement,
            requirement_signature,
            total_found: 0,
            recommendations: Vec::new(),
            generated_at: Utc::now(),
            degraded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_level_from_years_boundaries() {
        assert_eq!(ExperienceLevel::from_years(0.0), ExperienceLevel::Entry);
        assert_eq!(ExperienceLevel::from_years(1.9), ExperienceLevel::Entry);
        assert_eq!(ExperienceLevel::from_years(2.0), ExperienceLevel::Junior);
        assert_eq!(ExperienceLevel::from_years(5.0), ExperienceLevel::Intermediate);
        assert_eq!(ExperienceLevel::from_years(10.0), ExperienceLevel::Senior);
        assert_eq!(ExperienceLevel::from_years(12.0), ExperienceLevel::Expert);
        assert_eq!(ExperienceLevel::from_years(40.0), ExperienceLevel::Expert);
    }

    #[test]
    fn test_enum_parsing_accepts_common_spellings() {
        assert_eq!("in-person".parse::<DeliveryFormat>().unwrap(), DeliveryFormat::InPerson);
        assert_eq!("IN_PERSON".parse::<DeliveryFormat>().unwrap(), DeliveryFormat::InPerson);
        assert_eq!(" hybrid ".parse::<DeliveryFormat>().unwrap(), DeliveryFormat::Hybrid);
        assert_eq!("Bilingual".parse::<PreferredLanguage>().unwrap(), PreferredLanguage::Bilingual);
        assert_eq!("ar".parse::<Language>().unwrap(), Language::Arabic);
        assert_eq!("Senior".parse::<ExperienceLevel>().unwrap(), ExperienceLevel::Senior);
    }

    #[test]
    fn test_enum_parsing_rejects_unknown_values() {
        assert!(matches!(
            "carrier-pigeon".parse::<DeliveryFormat>(),
            Err(MatchError::Validation(_))
        ));
        assert!("french".parse::<PreferredLanguage>().is_err());
        assert!("guru".parse::<ExperienceLevel>().is_err());
    }

    #[test]
    fn test_match_band_thresholds() {
        assert_eq!(MatchBand::from_score(0.8), MatchBand::Excellent);
        assert_eq!(MatchBand::from_score(0.79), MatchBand::Good);
        assert_eq!(MatchBand::from_score(0.4), MatchBand::Fair);
        assert_eq!(MatchBand::from_score(0.1), MatchBand::Low);
    }

    #[test]
    fn test_match_score_serializes_dimensions_flat() {
        let score = MatchScore {
            candidate_id: "c-1".to_string(),
            overall_score: 0.9,
            dimensions: DimensionScores::from_array([1.0, 1.0, 0.7, 0.75, 1.0, 0.5]),
            reasons: vec![],
        };
        let json = serde_json::to_value(&score).unwrap();
        assert_eq!(json["sector_match"], 1.0);
        assert_eq!(json["format_match"], 0.7);
        assert!(json.get("dimensions").is_none());
    }

    #[test]
    fn test_remote_capable() {
        let mut candidate = Candidate {
            id: "c".into(),
            name: "n".into(),
            title: "t".into(),
            location: None,
            years_experience: 1.0,
            rate_per_hour: None,
            rating: 4.0,
            languages: BTreeSet::new(),
            formats_supported: BTreeSet::from([DeliveryFormat::InPerson]),
            expertise_tags: BTreeSet::new(),
            certifications: vec![],
            sector_affinity: BTreeSet::new(),
        };
        assert!(!candidate.is_remote_capable());
        candidate.formats_supported.insert(DeliveryFormat::Hybrid);
        assert!(candidate.is_remote_capable());
    }
}
