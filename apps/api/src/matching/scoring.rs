//! Scoring Engine: six-dimension heuristic match between a requirement and a candidate.
//!
//! `AppState` carries an `Arc<dyn CandidateScorer>`; the default backend is
//! `HeuristicScorer`, a pure function of (requirement, candidate, weights) plus the
//! read-only sector catalog. No hidden state, so it is safe to call from many
//! worker threads at once.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::matching::error::MatchError;
use crate::matching::reasons::explain;
use crate::matching::types::{
    Candidate, DeliveryFormat, DimensionScores, ExperienceLevel, Language, MatchScore,
    PreferredLanguage, Requirement, UNKNOWN_SIGNAL,
};
use crate::matching::weights::WeightVector;
use crate::taxonomy::TaxonomyStore;

const PARTIAL_LANGUAGE: f64 = 0.6;
const HYBRID_FALLBACK: f64 = 0.7;
const LOCATION_BASELINE: f64 = 0.3;

const CULTURAL_LANGUAGE_WEIGHT: f64 = 0.4;
const CULTURAL_KEYWORD_WEIGHT: f64 = 0.6;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Scores one candidate. Implementations must be deterministic: the same inputs
/// always yield a bit-identical `MatchScore`.
pub trait CandidateScorer: Send + Sync {
    fn score(
        &self,
        requirement: &Requirement,
        candidate: &Candidate,
        weights: &WeightVector,
    ) -> Result<MatchScore, MatchError>;

    /// Backend label, surfaced in logs.
    fn backend(&self) -> &'static str;
}

/// Default weighted-heuristic scorer.
pub struct HeuristicScorer {
    taxonomy: Arc<TaxonomyStore>,
}

impl HeuristicScorer {
    pub fn new(taxonomy: Arc<TaxonomyStore>) -> Self {
        Self { taxonomy }
    }
}

impl CandidateScorer for HeuristicScorer {
    fn score(
        &self,
        requirement: &Requirement,
        candidate: &Candidate,
        weights: &WeightVector,
    ) -> Result<MatchScore, MatchError> {
        let keywords = self.taxonomy.cultural_keywords(&requirement.sector);
        score_candidate(requirement, candidate, weights, keywords)
    }

    fn backend(&self) -> &'static str {
        "heuristic"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core algorithm
// ────────────────────────────────────────────────────────────────────────────

pub fn score_candidate(
    requirement: &Requirement,
    candidate: &Candidate,
    weights: &WeightVector,
    cultural_keywords: &[String],
) -> Result<MatchScore, MatchError> {
    validate_candidate(candidate)?;

    let language = language_match(requirement.preferred_language, &candidate.languages);
    let dimensions = DimensionScores {
        sector_match: sector_match(&requirement.sector, &candidate.sector_affinity),
        language_match: language,
        format_match: format_match(requirement.format, &candidate.formats_supported),
        experience_match: experience_match(
            requirement.experience_level,
            candidate.years_experience,
        ),
        location_match: location_match(
            requirement.format,
            requirement.location.as_deref(),
            candidate.location.as_deref(),
        ),
        cultural_fit: cultural_fit(candidate, language, cultural_keywords),
    };
    let dimensions = DimensionScores::from_array(dimensions.as_array().map(|s| s.clamp(0.0, 1.0)));

    Ok(MatchScore {
        candidate_id: candidate.id.clone(),
        overall_score: weights.apply(&dimensions),
        dimensions,
        reasons: explain(&dimensions),
    })
}

/// Rejects records the scorer cannot interpret. The error is scoped to this
/// candidate; the ranking pass skips it and carries on.
pub fn validate_candidate(candidate: &Candidate) -> Result<(), MatchError> {
    if candidate.id.trim().is_empty() {
        return Err(MatchError::computation("<blank>", "candidate id is empty"));
    }
    if !candidate.rating.is_finite() || !(0.0..=5.0).contains(&candidate.rating) {
        return Err(MatchError::computation(
            &candidate.id,
            format!("rating {} outside 0–5", candidate.rating),
        ));
    }
    if !candidate.years_experience.is_finite() || candidate.years_experience < 0.0 {
        return Err(MatchError::computation(
            &candidate.id,
            format!("invalid years_experience {}", candidate.years_experience),
        ));
    }
    if let Some(rate) = candidate.rate_per_hour {
        if !rate.is_finite() || rate < 0.0 {
            return Err(MatchError::computation(
                &candidate.id,
                format!("invalid rate_per_hour {rate}"),
            ));
        }
    }
    Ok(())
}

/// 1.0 declared affinity, 0.5 no declared affinity, 0.0 otherwise.
pub fn sector_match(sector: &str, affinity: &BTreeSet<String>) -> f64 {
    if affinity.is_empty() {
        UNKNOWN_SIGNAL
    } else if affinity.contains(sector) {
        1.0
    } else {
        0.0
    }
}

/// 1.0 exact match (a one-language candidate for that language, or a
/// bilingual candidate for a BILINGUAL request), 0.6 partial overlap in
/// either direction, 0.0 when disjoint. A candidate with no declared
/// languages is unknown.
pub fn language_match(preferred: PreferredLanguage, spoken: &BTreeSet<Language>) -> f64 {
    if spoken.is_empty() {
        return UNKNOWN_SIGNAL;
    }
    let english = spoken.contains(&Language::English);
    let arabic = spoken.contains(&Language::Arabic);

    match preferred {
        PreferredLanguage::Bilingual if english && arabic => 1.0,
        PreferredLanguage::Bilingual if english || arabic => PARTIAL_LANGUAGE,
        PreferredLanguage::English if english && arabic => PARTIAL_LANGUAGE,
        PreferredLanguage::Arabic if english && arabic => PARTIAL_LANGUAGE,
        PreferredLanguage::English if english => 1.0,
        PreferredLanguage::Arabic if arabic => 1.0,
        _ => 0.0,
    }
}

/// 1.0 exact, 0.7 hybrid-capable candidate for an ONLINE/IN_PERSON request, 0.0 otherwise.
pub fn format_match(requested: DeliveryFormat, supported: &BTreeSet<DeliveryFormat>) -> f64 {
    if supported.contains(&requested) {
        1.0
    } else if requested != DeliveryFormat::Hybrid && supported.contains(&DeliveryFormat::Hybrid) {
        HYBRID_FALLBACK
    } else {
        0.0
    }
}

/// `1 - |levelDelta| / 4`, floored at 0.
pub fn experience_match(requested: ExperienceLevel, years: f64) -> f64 {
    let actual = ExperienceLevel::from_years(years);
    let delta = (i16::from(requested.ordinal()) - i16::from(actual.ordinal())).abs();
    (1.0 - f64::from(delta) / 4.0).max(0.0)
}

/// ONLINE engagements ignore location. Otherwise a case-insensitive substring
/// match in either direction scores 1.0 and anything else gets the travel baseline.
pub fn location_match(
    format: DeliveryFormat,
    requested: Option<&str>,
    candidate: Option<&str>,
) -> f64 {
    if format == DeliveryFormat::Online {
        return 1.0;
    }
    let Some(requested) = requested.filter(|r| !r.trim().is_empty()) else {
        return 1.0;
    };
    match candidate {
        Some(candidate) if locations_match(requested, candidate) => 1.0,
        _ => LOCATION_BASELINE,
    }
}

pub fn locations_match(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    !a.is_empty() && !b.is_empty() && (a.contains(&b) || b.contains(&a))
}

/// Weighted mean of the available soft signals:
/// - language alignment (the `languageMatch` value, when languages are declared)
/// - sector cultural keywords found in tags or certifications
///   (1 hit → 0.6, each further hit +0.2, capped at 1.0)
///
/// A missing keyword hit is "no signal", not a penalty. No signals → 0.5.
pub fn cultural_fit(candidate: &Candidate, language_alignment: f64, keywords: &[String]) -> f64 {
    let mut signals: Vec<(f64, f64)> = Vec::with_capacity(2);

    if !candidate.languages.is_empty() {
        signals.push((language_alignment, CULTURAL_LANGUAGE_WEIGHT));
    }

    let hits = keyword_hits(candidate, keywords);
    if hits > 0 {
        let value = (0.6 + 0.2 * (hits as f64 - 1.0)).min(1.0);
        signals.push((value, CULTURAL_KEYWORD_WEIGHT));
    }

    let total_weight: f64 = signals.iter().map(|(_, w)| w).sum();
    if total_weight <= 0.0 {
        return UNKNOWN_SIGNAL;
    }
    (signals.iter().map(|(v, w)| v * w).sum::<f64>() / total_weight).clamp(0.0, 1.0)
}

fn keyword_hits(candidate: &Candidate, keywords: &[String]) -> usize {
    if keywords.is_empty() {
        return 0;
    }
    let haystack: Vec<String> = candidate
        .expertise_tags
        .iter()
        .chain(candidate.certifications.iter())
        .map(|t| t.to_lowercase())
        .collect();

    keywords
        .iter()
        .filter(|kw| haystack.iter().any(|h| h.contains(kw.as_str())))
        .count()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
