//! Durable storage for the saved-build list
//!
//! The whole list is written on every change; there is no incremental
//! persistence.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::build::Build;
use crate::error::BuilderError;

/// Storage key (and file stem) of the saved-build list
pub const BUILDS_STORAGE_KEY: &str = "weapon-builds-v2";

/// Backing storage for saved builds
pub trait BuildStore {
    /// Read the full list; an absent list is empty
    fn load_all(&self) -> Result<Vec<Build>, BuilderError>;

    /// Replace the stored list
    fn store_all(&mut self, builds: &[Build]) -> Result<(), BuilderError>;
}

/// In-process store, used for tests and sessions without a data directory
#[derive(Debug, Default)]
pub struct MemoryStore {
    builds: Vec<Build>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `store_all` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl BuildStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<Build>, BuilderError> {
        Ok(self.builds.clone())
    }

    fn store_all(&mut self, builds: &[Build]) -> Result<(), BuilderError> {
        self.builds = builds.to_vec();
        self.writes += 1;
        Ok(())
    }
}

/// Saved builds as one pretty-printed JSON array on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/weapon-builds-v2.json`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{}.json", BUILDS_STORAGE_KEY)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BuildStore for JsonFileStore {
    fn load_all(&self) -> Result<Vec<Build>, BuilderError> {
        if !self.path.exists() {
            debug!("No saved builds at {:?}", self.path);
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&self.path)
            .map_err(|e| BuilderError::Storage(format!("Failed to read {:?}: {}", self.path, e)))?;
        let builds: Vec<Build> = serde_json::from_str(&json)
            .map_err(|e| BuilderError::Storage(format!("Failed to parse {:?}: {}", self.path, e)))?;
        info!("Loaded {} saved builds from {:?}", builds.len(), self.path);
        Ok(builds)
    }

    fn store_all(&mut self, builds: &[Build]) -> Result<(), BuilderError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(builds)?;
        fs::write(&self.path, json)
            .map_err(|e| BuilderError::Storage(format!("Failed to write {:?}: {}", self.path, e)))?;
        debug!("Wrote {} builds to {:?}", builds.len(), self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equipment::EquipmentTree;
    use crate::stats::AggregatedStats;
    use crate::test_fixtures::{make_mod, make_weapon};
    use chrono::Utc;
    use gunsmith_core::{BuildId, SlotPath};

    fn sample_build() -> Build {
        let weapon = make_weapon(45, 100, 80, &["Muzzle"]);
        let mut tree = EquipmentTree::new();
        tree.equip(SlotPath::parse("Muzzle").unwrap(), make_mod("B", 0, Some(0.9), &["Suppressor"]))
            .unwrap();
        Build {
            id: BuildId::new(),
            name: "Low recoil".to_string(),
            stats: AggregatedStats { ergonomics: 45, recoil_vertical: 90, recoil_horizontal: 72, recoil_sum: 162 },
            weapon,
            attachments: tree,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        assert!(store.load_all().unwrap().is_empty());
        assert!(store.path().ends_with("weapon-builds-v2.json"));
    }

    #[test]
    fn test_store_and_reload() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut store = JsonFileStore::in_dir(&dir.path().join("nested"));
        let build = sample_build();
        store.store_all(std::slice::from_ref(&build)).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, build.id);
        assert_eq!(loaded[0].stats.recoil_sum, 162);
        assert_eq!(loaded[0].attachments, build.attachments);
    }

    #[test]
    fn test_persisted_layout() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut store = JsonFileStore::in_dir(dir.path());
        store.store_all(&[sample_build()]).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        let first = &raw[0];
        for key in ["id", "name", "weapon", "attachments", "stats", "createdAt"] {
            assert!(first.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(first["stats"]["recoilSum"], 162);
        assert_eq!(first["attachments"]["Muzzle"]["recoilMultiplier"], 0.9);
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.load_all(), Err(BuilderError::Storage(_))));
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let mut store = MemoryStore::new();
        store.store_all(&[sample_build()]).unwrap();
        store.store_all(&[]).unwrap();
        assert_eq!(store.writes(), 2);
        assert!(store.load_all().unwrap().is_empty());
    }
}
