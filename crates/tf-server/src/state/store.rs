//! In-memory terrain store using DashMap.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tf_core::TerrainProfile;
use uuid::Uuid;

use crate::config::Config;

/// An editable terrain held by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredTerrain {
    pub id: String,
    pub terrain: TerrainProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainSummary {
    pub id: String,
    pub length: usize,
    pub grid_m: f64,
    pub distance_m: f64,
    pub updated_at: DateTime<Utc>,
}

impl From<&StoredTerrain> for TerrainSummary {
    fn from(stored: &StoredTerrain) -> Self {
        Self {
            id: stored.id.clone(),
            length: stored.terrain.len(),
            grid_m: stored.terrain.grid_m,
            distance_m: stored.terrain.distance_m(),
            updated_at: stored.updated_at,
        }
    }
}

/// Application state - thread-safe store for terrains.
pub struct AppState {
    terrains: DashMap<String, StoredTerrain>,
    config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            terrains: DashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Store a terrain under a fresh id.
    pub fn insert_terrain(&self, terrain: TerrainProfile) -> StoredTerrain {
        let now = Utc::now();
        let stored = StoredTerrain {
            id: Uuid::new_v4().to_string(),
            terrain,
            created_at: now,
            updated_at: now,
        };
        self.terrains.insert(stored.id.clone(), stored.clone());
        stored
    }

    pub fn get_terrain(&self, id: &str) -> Option<StoredTerrain> {
        self.terrains.get(id).map(|t| t.value().clone())
    }

    pub fn list_terrains(&self) -> Vec<TerrainSummary> {
        let mut summaries: Vec<TerrainSummary> = self
            .terrains
            .iter()
            .map(|entry| TerrainSummary::from(entry.value()))
            .collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        summaries
    }

    pub fn remove_terrain(&self, id: &str) -> bool {
        self.terrains.remove(id).is_some()
    }

    /// Apply `edit` to a stored terrain.
    ///
    /// Returns `None` when the id is unknown, otherwise the edit's verdict and
    /// the terrain as it stands afterwards. `updated_at` only moves when the
    /// edit reports a change.
    pub fn edit_terrain<F>(&self, id: &str, edit: F) -> Option<(bool, StoredTerrain)>
    where
        F: FnOnce(&mut TerrainProfile) -> bool,
    {
        let mut entry = self.terrains.get_mut(id)?;
        let changed = edit(&mut entry.terrain);
        if changed {
            entry.updated_at = Utc::now();
        }
        Some((changed, entry.value().clone()))
    }

    pub fn terrain_count(&self) -> usize {
        self.terrains.len()
    }
}
