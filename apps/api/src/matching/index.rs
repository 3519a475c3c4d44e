//! Candidate Index: cached, eventually-consistent view of professional profiles.
//!
//! Snapshots are immutable; `refresh` builds a new one and swaps the `Arc`, so a
//! ranking pass in flight keeps reading the snapshot it started with.
//!
//! Staleness bound: a snapshot older than `2 × refresh_interval` is stale. Stale
//! snapshots are still served (a missed refresh must not empty the result panel)
//! but every shortlist taken from one logs a warning.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::matching::error::MatchError;
use crate::matching::profiles::{ProfileStore, ProfileStoreError};
use crate::matching::scoring::{format_match, locations_match};
use crate::matching::types::{Candidate, DeliveryFormat, Requirement, SectorId};

#[derive(Debug, Clone)]
pub struct IndexConfig {
    pub refresh_interval: Duration,
    /// Upper bound on shortlist size handed to the scorer.
    pub max_shortlist: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(300),
            max_shortlist: 500,
        }
    }
}

#[derive(Debug)]
pub struct IndexSnapshot {
    pub version: u64,
    pub refreshed_at: Option<Instant>,
    candidates: Vec<Candidate>,
    by_sector: HashMap<SectorId, Vec<usize>>,
    /// Candidates with no declared sector affinity.
    unaffiliated: Vec<usize>,
}

impl IndexSnapshot {
    fn unloaded() -> Self {
        Self {
            version: 0,
            refreshed_at: None,
            candidates: Vec::new(),
            by_sector: HashMap::new(),
            unaffiliated: Vec::new(),
        }
    }

    fn build(version: u64, raw: Vec<Candidate>) -> Self {
        let mut seen = HashSet::with_capacity(raw.len());
        let mut candidates = Vec::with_capacity(raw.len());
        for candidate in raw {
            if !seen.insert(candidate.id.clone()) {
                warn!(candidate_id = %candidate.id, "Duplicate candidate id in profile store; keeping first");
                continue;
            }
            candidates.push(candidate);
        }

        let mut by_sector: HashMap<SectorId, Vec<usize>> = HashMap::new();
        let mut unaffiliated = Vec::new();
        for (idx, candidate) in candidates.iter().enumerate() {
            if candidate.sector_affinity.is_empty() {
                unaffiliated.push(idx);
            }
            for sector in &candidate.sector_affinity {
                by_sector.entry(sector.clone()).or_default().push(idx);
            }
        }

        Self {
            version,
            refreshed_at: Some(Instant::now()),
            candidates,
            by_sector,
            unaffiliated,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.refreshed_at.is_some()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn age(&self) -> Option<Duration> {
        self.refreshed_at.map(|at| at.elapsed())
    }
}

/// A shortlist borrows candidates from the snapshot it was taken from.
#[derive(Debug)]
pub struct Shortlist {
    snapshot: Arc<IndexSnapshot>,
    indices: Vec<usize>,
}

impl Shortlist {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Candidate> {
        self.indices
            .get(position)
            .map(|&idx| &self.snapshot.candidates[idx])
    }

    pub fn snapshot_version(&self) -> u64 {
        self.snapshot.version
    }
}

pub struct CandidateIndex {
    store: Arc<dyn ProfileStore>,
    config: IndexConfig,
    current: RwLock<Arc<IndexSnapshot>>,
    invalidated: Notify,
}

impl CandidateIndex {
    pub fn new(store: Arc<dyn ProfileStore>, config: IndexConfig) -> Self {
        Self {
            store,
            config,
            current: RwLock::new(Arc::new(IndexSnapshot::unloaded())),
            invalidated: Notify::new(),
        }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Reloads all profiles and publishes a new snapshot. On failure the
    /// previous snapshot stays in place.
    pub async fn refresh(&self) -> Result<usize, ProfileStoreError> {
        let started = Instant::now();
        let candidates = self.store.list_candidates().await?;

        let next_version = self.snapshot().version + 1;
        let snapshot = Arc::new(IndexSnapshot::build(next_version, candidates));
        let count = snapshot.len();
        if snapshot.is_empty() {
            warn!(version = next_version, "Profile store returned no candidates");
        }
        *self.current.write() = snapshot;

        info!(
            version = next_version,
            candidates = count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Candidate index refreshed"
        );
        Ok(count)
    }

    /// Requests an out-of-schedule refresh from the background refresher.
    pub fn invalidate(&self) {
        self.invalidated.notify_one();
    }

    pub async fn invalidated(&self) {
        self.invalidated.notified().await;
    }

    pub fn staleness_bound(&self) -> Duration {
        self.config.refresh_interval * 2
    }

    pub fn is_stale(&self, snapshot: &IndexSnapshot) -> bool {
        match snapshot.age() {
            Some(age) => age > self.staleness_bound(),
            None => true,
        }
    }

    /// Recall-oriented pre-filter. Keeps a candidate when its sector affinity
    /// contains the requested sector or is empty, and, if a location is
    /// requested, when it matches, is unknown, or the candidate can work remotely.
    pub fn shortlist(&self, requirement: &Requirement) -> Result<Shortlist, MatchError> {
        let snapshot = self.snapshot();
        if !snapshot.is_loaded() {
            return Err(MatchError::DataUnavailable(
                "candidate index has not been loaded yet".to_string(),
            ));
        }
        if self.is_stale(&snapshot) {
            warn!(
                version = snapshot.version,
                age_secs = snapshot.age().map(|a| a.as_secs()).unwrap_or_default(),
                bound_secs = self.staleness_bound().as_secs(),
                "Serving shortlist from a stale candidate index"
            );
        }

        let mut indices: Vec<usize> = snapshot
            .by_sector
            .get(requirement.sector.as_str())
            .into_iter()
            .flatten()
            .chain(snapshot.unaffiliated.iter())
            .copied()
            .filter(|&idx| passes_location(requirement, &snapshot.candidates[idx]))
            .collect();

        if indices.len() > self.config.max_shortlist {
            indices.sort_by(|&a, &b| {
                cap_order(requirement, &snapshot.candidates[a], &snapshot.candidates[b])
            });
            indices.truncate(self.config.max_shortlist);
        }

        Ok(Shortlist { snapshot, indices })
    }
}

/// Cheap relevance key for trimming an oversized shortlist: declared sector
/// affinity first, then format fit, then rating desc, then id asc.
fn cap_order(requirement: &Requirement, a: &Candidate, b: &Candidate) -> Ordering {
    let declared = |c: &Candidate| c.sector_affinity.contains(requirement.sector.as_str());
    let format = |c: &Candidate| format_match(requirement.format, &c.formats_supported);

    declared(b)
        .cmp(&declared(a))
        .then_with(|| format(b).total_cmp(&format(a)))
        .then_with(|| b.rating.total_cmp(&a.rating))
        .then_with(|| a.id.cmp(&b.id))
}

fn passes_location(requirement: &Requirement, candidate: &Candidate) -> bool {
    let Some(wanted) = requirement.location.as_deref().filter(|l| !l.trim().is_empty()) else {
        return true;
    };
    if requirement.format == DeliveryFormat::Online || candidate.is_remote_capable() {
        return true;
    }
    match candidate.location.as_deref() {
        Some(location) => locations_match(wanted, location),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::profiles::StaticProfileStore;
    use crate::matching::test_support::{candidate, requirement};
    use async_trait::async_trait;
    use std::collections::BTreeSet;

    fn index_with(candidates: Vec<Candidate>, config: IndexConfig) -> CandidateIndex {
        CandidateIndex::new(Arc::new(StaticProfileStore::new(candidates)), config)
    }

    fn kept(shortlist: &Shortlist) -> Vec<String> {
        (0..shortlist.len())
            .filter_map(|position| shortlist.get(position))
            .map(|c| c.id.clone())
            .collect()
    }

    fn ids(shortlist: &Shortlist) -> Vec<String> {
        let mut ids = kept(shortlist);
        ids.sort();
        ids
    }

    struct FailingStore;

    #[async_trait]
    impl ProfileStore for FailingStore {
        async fn list_candidates(&self) -> Result<Vec<Candidate>, ProfileStoreError> {
            Err(ProfileStoreError::Io(std::io::Error::other("profile service down")))
        }
    }

    #[tokio::test]
    async fn test_unloaded_index_is_data_unavailable() {
        let index = index_with(vec![candidate("a")], IndexConfig::default());
        assert!(matches!(
            index.shortlist(&requirement("oil-gas")),
            Err(MatchError::DataUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_sector_filter_keeps_unaffiliated() {
        let mut banker = candidate("banker");
        banker.sector_affinity = BTreeSet::from(["banking-finance".to_string()]);
        let mut generalist = candidate("generalist");
        generalist.sector_affinity.clear();

        let index = index_with(vec![candidate("driller"), banker, generalist], IndexConfig::default());
        index.refresh().await.unwrap();

        let shortlist = index.shortlist(&requirement("oil-gas")).unwrap();
        assert_eq!(ids(&shortlist), vec!["driller", "generalist"]);
    }

    #[tokio::test]
    async fn test_location_filter_is_permissive() {
        let mut onsite_riyadh = candidate("onsite-riyadh");
        onsite_riyadh.formats_supported = BTreeSet::from([DeliveryFormat::InPerson]);
        let mut onsite_dammam = candidate("onsite-dammam");
        onsite_dammam.formats_supported = BTreeSet::from([DeliveryFormat::InPerson]);
        onsite_dammam.location = Some("Dammam".to_string());
        let mut onsite_unknown = candidate("onsite-unknown");
        onsite_unknown.formats_supported = BTreeSet::from([DeliveryFormat::InPerson]);
        onsite_unknown.location = None;
        let mut remote_dammam = candidate("remote-dammam");
        remote_dammam.location = Some("Dammam".to_string());

        let index = index_with(
            vec![onsite_riyadh, onsite_dammam, onsite_unknown, remote_dammam],
            IndexConfig::default(),
        );
        index.refresh().await.unwrap();

        let mut req = requirement("oil-gas");
        req.format = DeliveryFormat::InPerson;
        req.location = Some("riyadh".to_string());
        let shortlist = index.shortlist(&req).unwrap();
        assert_eq!(
            ids(&shortlist),
            vec!["onsite-riyadh", "onsite-unknown", "remote-dammam"]
        );

        req.format = DeliveryFormat::Online;
        assert_eq!(index.shortlist(&req).unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_shortlist_cap_breaks_ties_on_rating_then_id() {
        let mut low = candidate("low");
        low.rating = 2.0;
        let mut high_b = candidate("b-high");
        high_b.rating = 4.9;
        let mut high_a = candidate("a-high");
        high_a.rating = 4.9;

        let config = IndexConfig {
            max_shortlist: 2,
            ..IndexConfig::default()
        };
        let index = index_with(vec![low, high_b, high_a], config);
        index.refresh().await.unwrap();

        let shortlist = index.shortlist(&requirement("oil-gas")).unwrap();
        assert_eq!(kept(&shortlist), vec!["a-high", "b-high"]);
    }

    #[tokio::test]
    async fn test_shortlist_cap_keeps_strong_low_rated_match() {
        // Perfect sector and format fit, modest rating.
        let mut strong = candidate("strong");
        strong.rating = 3.0;

        let mut star_generalist = candidate("star-generalist");
        star_generalist.sector_affinity.clear();
        star_generalist.rating = 5.0;
        let mut star_online = candidate("star-online");
        star_online.formats_supported = BTreeSet::from([DeliveryFormat::Online]);
        star_online.rating = 5.0;

        let config = IndexConfig {
            max_shortlist: 2,
            ..IndexConfig::default()
        };
        let index = index_with(vec![star_generalist, star_online, strong], config);
        index.refresh().await.unwrap();

        let shortlist = index.shortlist(&requirement("oil-gas")).unwrap();
        assert_eq!(kept(&shortlist), vec!["strong", "star-online"]);
    }

    #[tokio::test]
    async fn test_duplicate_ids_keep_first() {
        let mut dup = candidate("same");
        dup.name = "Second".to_string();
        let index = index_with(vec![candidate("same"), dup], IndexConfig::default());
        assert_eq!(index.refresh().await.unwrap(), 1);
        assert_eq!(
            index.shortlist(&requirement("oil-gas")).unwrap().get(0).unwrap().name,
            "Trainer same"
        );
    }

    #[tokio::test]
    async fn test_empty_store_still_loads_index() {
        let index = index_with(vec![], IndexConfig::default());
        assert_eq!(index.refresh().await.unwrap(), 0);
        assert!(index.snapshot().is_loaded());
        assert!(index.snapshot().is_empty());
        assert!(index.shortlist(&requirement("oil-gas")).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let index = CandidateIndex::new(Arc::new(FailingStore), IndexConfig::default());
        assert!(index.refresh().await.is_err());
        assert!(!index.snapshot().is_loaded());
    }

    #[tokio::test]
    async fn test_shortlist_holds_its_snapshot_across_refresh() {
        let index = index_with(vec![candidate("a")], IndexConfig::default());
        index.refresh().await.unwrap();
        let shortlist = index.shortlist(&requirement("oil-gas")).unwrap();

        index.refresh().await.unwrap();
        assert_eq!(shortlist.snapshot_version(), 1);
        assert_eq!(index.snapshot().version, 2);
        assert_eq!(shortlist.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_staleness_bound_is_twice_refresh_interval() {
        let config = IndexConfig {
            refresh_interval: Duration::from_secs(60),
            ..IndexConfig::default()
        };
        let index = index_with(vec![candidate("a")], config);
        assert_eq!(index.staleness_bound(), Duration::from_secs(120));

        index.refresh().await.unwrap();
        tokio::time::advance(Duration::from_secs(119)).await;
        assert!(!index.is_stale(&index.snapshot()));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(index.is_stale(&index.snapshot()));
        // stale snapshots are still served
        assert_eq!(index.shortlist(&requirement("oil-gas")).unwrap().len(), 1);

        index.refresh().await.unwrap();
        assert!(!index.is_stale(&index.snapshot()));
    }
}
