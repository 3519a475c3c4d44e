//! Reason strings: a formatting pass over already-computed dimension scores.

use crate::matching::types::{Dimension, DimensionScores};

/// A dimension must score at least this much to earn a reason.
pub const REASON_THRESHOLD: f64 = 0.8;

/// At most this many reasons are attached to a score.
pub const MAX_REASONS: usize = 4;

fn reason_text(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Sector => "Sector expertise confirmed",
        Dimension::Language => "Fluent in requested language",
        Dimension::Format => "Delivers in the requested format",
        Dimension::Experience => "Experience level matches the requirement",
        Dimension::Location => "Location suits the engagement",
        Dimension::CulturalFit => "Strong regional and cultural fit",
    }
}

/// Returns one reason per dimension scoring ≥ 0.8, highest score first.
/// Equal scores keep `Dimension::ALL` order.
pub fn explain(dimensions: &DimensionScores) -> Vec<String> {
    let mut qualifying: Vec<(Dimension, f64)> = Dimension::ALL
        .iter()
        .map(|&d| (d, dimensions.get(d)))
        .filter(|(_, score)| *score >= REASON_THRESHOLD)
        .collect();

    // stable sort keeps dimension order for ties
    qualifying.sort_by(|a, b| b.1.total_cmp(&a.1));

    qualifying
        .into_iter()
        .take(MAX_REASONS)
        .map(|(d, _)| reason_text(d).to_string())
        .collect()
}
