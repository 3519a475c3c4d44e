//! Bounded memory of the dimension scores handed out per requirement signature.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;

use crate::matching::types::{DimensionScores, RecommendationSet};

type ServedKey = (String, String);

pub struct ServedScoreLog {
    capacity: usize,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    scores: HashMap<ServedKey, DimensionScores>,
    /// Insertion order, oldest first, for eviction.
    order: VecDeque<ServedKey>,
    last_signature: Option<String>,
}

impl ServedScoreLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Records every recommendation in `set` and marks its signature as the
    /// most recent search context.
    pub fn remember(&self, set: &RecommendationSet) {
        let mut inner = self.inner.lock();
        for rec in &set.recommendations {
            let key = (set.requirement_signature.clone(), rec.candidate.id.clone());
            if inner.scores.insert(key.clone(), rec.score.dimensions).is_none() {
                inner.order.push_back(key);
            }
        }
        while inner.order.len() > self.capacity {
            if let Some(evicted) = inner.order.pop_front() {
                inner.scores.remove(&evicted);
            }
        }
        inner.last_signature = Some(set.requirement_signature.clone());
    }

    pub fn lookup(&self, signature: &str, candidate_id: &str) -> Option<DimensionScores> {
        self.inner
            .lock()
            .scores
            .get(&(signature.to_string(), candidate_id.to_string()))
            .copied()
    }

    pub fn last_signature(&self) -> Option<String> {
        self.inner.lock().last_signature.clone()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner.lock().scores.len()
    }
}
