//! Taxonomy Store: the fixed sector catalog with bilingual display names.
//!
//! Loaded once at startup (built-in catalog or a JSON file) and read-only
//! afterwards. Lookups go through an id-keyed map.

pub mod catalog;

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::types::SectorId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub id: SectorId,
    pub display_name_english: String,
    pub display_name_arabic: String,
    /// Lower-case terms that signal regulatory or localization familiarity
    /// with this sector when found in a candidate's tags or certifications.
    #[serde(default)]
    pub cultural_keywords: Vec<String>,
}

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("Sector '{0}' not found")]
    NotFound(String),

    #[error("Invalid sector catalog: {0}")]
    InvalidCatalog(String),

    #[error("Failed to read sector catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse sector catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct TaxonomyStore {
    sectors: Vec<Sector>,
    by_id: HashMap<SectorId, usize>,
}

impl TaxonomyStore {
    /// Builds the store, preserving catalog order. Rejects empty catalogs,
    /// blank ids and duplicate ids.
    pub fn new(sectors: Vec<Sector>) -> Result<Self, TaxonomyError> {
        if sectors.is_empty() {
            return Err(TaxonomyError::InvalidCatalog(
                "catalog contains no sectors".to_string(),
            ));
        }

        let mut normalized = Vec::with_capacity(sectors.len());
        let mut by_id = HashMap::with_capacity(sectors.len());
        for mut sector in sectors {
            sector.id = sector.id.trim().to_string();
            if sector.id.is_empty() {
                return Err(TaxonomyError::InvalidCatalog(
                    "sector id cannot be empty".to_string(),
                ));
            }
            if by_id.contains_key(&sector.id) {
                return Err(TaxonomyError::InvalidCatalog(format!(
                    "duplicate sector id '{}'",
                    sector.id
                )));
            }
            sector.cultural_keywords = sector
                .cultural_keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
            by_id.insert(sector.id.clone(), normalized.len());
            normalized.push(sector);
        }

        Ok(Self {
            sectors: normalized,
            by_id,
        })
    }

    pub fn builtin() -> Result<Self, TaxonomyError> {
        Self::new(catalog::builtin_sectors())
    }

    /// Loads a catalog from a JSON array of sectors.
    pub fn from_json_file(path: &Path) -> Result<Self, TaxonomyError> {
        let raw = std::fs::read_to_string(path)?;
        let sectors: Vec<Sector> = serde_json::from_str(&raw)?;
        Self::new(sectors)
    }

    pub fn list_sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn get_sector(&self, id: &str) -> Result<&Sector, TaxonomyError> {
        self.by_id
            .get(id.trim())
            .map(|&idx| &self.sectors[idx])
            .ok_or_else(|| TaxonomyError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id.trim())
    }

    /// Cultural keywords for a sector; empty for unknown ids.
    pub fn cultural_keywords(&self, id: &str) -> &[String] {
        self.get_sector(id)
            .map(|s| s.cultural_keywords.as_slice())
            .unwrap_or(&[])
    }
}
