use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::matching::error::MatchError;
use crate::matching::types::{DimensionScores, DIMENSIONS};

/// Tolerance for "sums to 1.0".
pub const WEIGHT_SUM_EPSILON: f64 = 1e-9;

/// Per-dimension importance weights. Non-negative and summing to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    pub sector_weight: f64,
    pub language_weight: f64,
    pub format_weight: f64,
    pub experience_weight: f64,
    pub location_weight: f64,
    pub cultural_fit_weight: f64,
}

impl Default for WeightVector {
    fn default() -> Self {
        Self {
            sector_weight: 0.25,
            language_weight: 0.20,
            format_weight: 0.15,
            experience_weight: 0.20,
            location_weight: 0.10,
            cultural_fit_weight: 0.10,
        }
    }
}

impl WeightVector {
    /// Builds a vector from raw components, renormalizing them to sum to 1.0.
    pub fn new(components: [f64; DIMENSIONS]) -> Result<Self, MatchError> {
        if components.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(MatchError::Validation(
                "weights must be finite and non-negative".to_string(),
            ));
        }
        let sum: f64 = components.iter().sum();
        if sum <= 0.0 {
            return Err(MatchError::Validation(
                "at least one weight must be positive".to_string(),
            ));
        }
        Ok(Self::from_array(components.map(|w| w / sum)))
    }

    pub fn as_array(&self) -> [f64; DIMENSIONS] {
        [
            self.sector_weight,
            self.language_weight,
            self.format_weight,
            self.experience_weight,
            self.location_weight,
            self.cultural_fit_weight,
        ]
    }

    fn from_array(values: [f64; DIMENSIONS]) -> Self {
        Self {
            sector_weight: values[0],
            language_weight: values[1],
            format_weight: values[2],
            experience_weight: values[3],
            location_weight: values[4],
            cultural_fit_weight: values[5],
        }
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    pub fn is_normalized(&self) -> bool {
        self.as_array().iter().all(|w| *w >= 0.0) && (self.sum() - 1.0).abs() < WEIGHT_SUM_EPSILON
    }

    /// Weighted sum of the dimension scores, clamped to `[0, 1]`.
    pub fn apply(&self, dimensions: &DimensionScores) -> f64 {
        self.as_array()
            .iter()
            .zip(dimensions.as_array())
            .map(|(w, s)| w * s)
            .sum::<f64>()
            .clamp(0.0, 1.0)
    }
}

/// A published weight vector. Scoring calls hold an `Arc` to one of these for
/// their whole pass, so a concurrent swap never changes weights mid-computation.
#[derive(Debug, Clone, Serialize)]
pub struct WeightSnapshot {
    pub version: u64,
    pub weights: WeightVector,
    pub updated_at: DateTime<Utc>,
}

/// Copy-and-swap holder for the live weight vector. One writer (the adaptation
/// routine), many readers; the lock is held only long enough to clone the `Arc`.
pub struct WeightStore {
    current: RwLock<Arc<WeightSnapshot>>,
}

impl WeightStore {
    pub fn new(initial: WeightVector) -> Self {
        Self {
            current: RwLock::new(Arc::new(WeightSnapshot {
                version: 1,
                weights: initial,
                updated_at: Utc::now(),
            })),
        }
    }

    pub fn snapshot(&self) -> Arc<WeightSnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Publishes a new vector and returns the snapshot it replaced.
    pub fn publish(&self, weights: WeightVector) -> Arc<WeightSnapshot> {
        debug_assert!(weights.is_normalized(), "published weights must sum to 1.0");
        let mut guard = self.current.write();
        let next = Arc::new(WeightSnapshot {
            version: guard.version + 1,
            weights,
            updated_at: Utc::now(),
        });
        std::mem::replace(&mut *guard, next)
    }
}

impl Default for WeightStore {
    fn default() -> Self {
        Self::new(WeightVector::default())
    }
}
