//! Weight adaptation rule.
//!
//! For each dimension, the Pearson correlation between the score it was served
//! with and the observed outcome is centred on the mean correlation across
//! dimensions. The centred values become zero-sum deltas, scaled so no weight
//! moves by more than `MAX_STEP` in one cycle. Dimensions that predicted success
//! better than average gain weight; the others pay for it.

use crate::matching::error::MatchError;
use crate::matching::types::{DimensionScores, DIMENSIONS};
use crate::matching::weights::WeightVector;

/// Largest change to any single weight per cycle.
pub const MAX_STEP: f64 = 0.02;

/// Floor that adaptation never pushes a weight below.
pub const MIN_WEIGHT: f64 = 0.01;

#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub dimensions: DimensionScores,
    pub outcome: f64,
}

/// Booking success, blended 50/50 with the normalized rating when one exists.
pub fn outcome_value(booking_success: bool, rating: Option<f64>) -> f64 {
    let booked = if booking_success { 1.0 } else { 0.0 };
    match rating {
        Some(r) => 0.5 * booked + 0.5 * (r / 5.0).clamp(0.0, 1.0),
        None => booked,
    }
}

/// Sample Pearson correlation. Zero when either side has no variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs[..n].iter().zip(&ys[..n]) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= f64::EPSILON || var_y <= f64::EPSILON {
        return 0.0;
    }
    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

/// Per-dimension correlation between served score and outcome.
pub fn correlations(samples: &[Sample]) -> [f64; DIMENSIONS] {
    let outcomes: Vec<f64> = samples.iter().map(|s| s.outcome).collect();
    std::array::from_fn(|d| {
        let xs: Vec<f64> = samples.iter().map(|s| s.dimensions.as_array()[d]).collect();
        pearson(&xs, &outcomes)
    })
}

/// One adaptation step. Returns `current` unchanged when the samples carry no
/// signal.
pub fn adapt(current: &WeightVector, samples: &[Sample]) -> Result<WeightVector, MatchError> {
    let corr = correlations(samples);
    let mean = corr.iter().sum::<f64>() / DIMENSIONS as f64;
    let centred = corr.map(|c| c - mean);
    let spread = centred.iter().fold(0.0_f64, |acc, c| acc.max(c.abs()));
    if spread <= f64::EPSILON {
        return Ok(*current);
    }

    let scale = MAX_STEP / spread.max(1.0);
    let weights = current.as_array();
    let mut deltas = centred.map(|c| c * scale);

    // Respect the floor, then take the shortfall back out of the gains so the
    // deltas stay zero-sum.
    for (delta, w) in deltas.iter_mut().zip(weights) {
        if *delta < 0.0 {
            *delta = delta.max((MIN_WEIGHT - w).min(0.0));
        }
    }
    let excess: f64 = deltas.iter().sum();
    if excess > 0.0 {
        let gains: f64 = deltas.iter().filter(|d| **d > 0.0).sum();
        if gains > 0.0 {
            let keep = ((gains - excess) / gains).max(0.0);
            for delta in deltas.iter_mut().filter(|d| **d > 0.0) {
                *delta *= keep;
            }
        }
    }

    let mut next = weights;
    for (w, d) in next.iter_mut().zip(deltas) {
        *w = (*w + d).max(0.0);
    }
    WeightVector::new(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sector_driven_samples(n: usize) -> Vec<Sample> {
        (0..n)
            .map(|i| {
                let high = i % 2 == 0;
                Sample {
                    dimensions: DimensionScores::from_array([
                        if high { 1.0 } else { 0.0 },
                        0.8,
                        0.7,
                        0.6,
                        1.0,
                        0.5,
                    ]),
                    outcome: outcome_value(high, None),
                }
            })
            .collect()
    }

    #[test]
    fn test_outcome_value() {
        assert_eq!(outcome_value(true, None), 1.0);
        assert_eq!(outcome_value(false, None), 0.0);
        assert!((outcome_value(true, Some(2.5)) - 0.75).abs() < 1e-12);
        assert!((outcome_value(false, Some(5.0)) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_edges() {
        assert!((pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]) - 1.0).abs() < 1e-12);
        assert!((pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]) + 1.0).abs() < 1e-12);
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[0.0, 1.0, 0.0]), 0.0);
        assert_eq!(pearson(&[1.0], &[1.0]), 0.0);
    }

    #[test]
    fn test_sector_driven_feedback_raises_sector_weight_within_step() {
        let current = WeightVector::default();
        let next = adapt(&current, &sector_driven_samples(50)).unwrap();

        let gain = next.sector_weight - current.sector_weight;
        assert!(gain > 0.0);
        assert!(gain <= MAX_STEP + 1e-12);
        assert!(next.language_weight < current.language_weight);
        assert!(next.is_normalized());
    }

    #[test]
    fn test_no_signal_keeps_weights() {
        let flat: Vec<Sample> = (0..30)
            .map(|i| Sample {
                dimensions: DimensionScores::from_array([0.5; DIMENSIONS]),
                outcome: (i % 2) as f64,
            })
            .collect();
        let current = WeightVector::default();
        assert_eq!(adapt(&current, &flat).unwrap(), current);
    }

    #[test]
    fn test_floor_is_respected() {
        let current = WeightVector::new([0.945, 0.011, 0.011, 0.011, 0.011, 0.011]).unwrap();
        let next = adapt(&current, &sector_driven_samples(40)).unwrap();
        for w in next.as_array() {
            assert!(w >= MIN_WEIGHT - 1e-9);
        }
        assert!(next.is_normalized());
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

        #[test]
        fn prop_adapt_keeps_sum_and_bounds_step(
            raw in prop::array::uniform6(0.05f64..1.0),
            scores in prop::collection::vec(prop::array::uniform6(0.0f64..=1.0), 2..60),
            outcomes in prop::collection::vec(0.0f64..=1.0, 60),
        ) {
            let current = WeightVector::new(raw).unwrap();
            let samples: Vec<Sample> = scores
                .iter()
                .zip(&outcomes)
                .map(|(s, o)| Sample { dimensions: DimensionScores::from_array(*s), outcome: *o })
                .collect();

            let next = adapt(&current, &samples).unwrap();
            prop_assert!(next.is_normalized());
            for (before, after) in current.as_array().iter().zip(next.as_array()) {
                prop_assert!((after - before).abs() <= MAX_STEP + 1e-9);
            }
        }
    }
}
