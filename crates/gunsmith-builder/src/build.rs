//! Saved builds and the build repository

use chrono::{DateTime, Utc};
use gunsmith_core::BuildId;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::equipment::EquipmentTree;
use crate::error::BuilderError;
use crate::record::WeaponRecord;
use crate::stats::AggregatedStats;
use crate::store::BuildStore;

/// A named snapshot of a weapon, its attachments and their stats
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub id: BuildId,
    pub name: String,
    pub weapon: WeaponRecord,
    /// Slot path -> equipped modification
    pub attachments: EquipmentTree,
    /// Stats at save time
    pub stats: AggregatedStats,
    pub created_at: DateTime<Utc>,
}

/// What a session needs to resume editing a saved build
#[derive(Debug, Clone)]
pub struct LoadedBuild {
    pub weapon: WeaponRecord,
    pub tree: EquipmentTree,
    pub name: String,
}

/// Saved builds in insertion order, mirrored to a [`BuildStore`]
pub struct BuildRepository<S: BuildStore> {
    store: S,
    builds: Vec<Build>,
}

impl<S: BuildStore> BuildRepository<S> {
    /// Open the repository, reading any previously saved builds
    pub fn open(store: S) -> Result<Self, BuilderError> {
        let builds = store.load_all()?;
        Ok(Self { store, builds })
    }

    /// Save a new build.
    ///
    /// Fails with [`BuilderError::Validation`] when the name is blank or no
    /// weapon is selected; nothing is stored in that case. Empty required
    /// slots do not block saving.
    pub fn save(
        &mut self,
        name: &str,
        weapon: Option<&WeaponRecord>,
        tree: &EquipmentTree,
        stats: AggregatedStats,
    ) -> Result<Build, BuilderError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BuilderError::Validation("build name is empty".into()));
        }
        let weapon = weapon.ok_or_else(|| BuilderError::Validation("no weapon selected".into()))?;

        let build = Build {
            id: BuildId::new(),
            name: name.to_string(),
            weapon: weapon.clone(),
            attachments: tree.clone(),
            stats,
            created_at: Utc::now(),
        };

        self.builds.push(build.clone());
        if let Err(e) = self.store.store_all(&self.builds) {
            self.builds.pop();
            return Err(e);
        }

        info!("Saved build '{}' ({})", build.name, build.id);
        Ok(build)
    }

    /// All builds in the order they were saved
    pub fn list(&self) -> &[Build] {
        &self.builds
    }

    pub fn get(&self, id: BuildId) -> Option<&Build> {
        self.builds.iter().find(|b| b.id == id)
    }

    /// Delete a build. Returns whether anything was removed; an unknown id
    /// is not an error.
    pub fn delete(&mut self, id: BuildId) -> Result<bool, BuilderError> {
        let Some(index) = self.builds.iter().position(|b| b.id == id) else {
            return Ok(false);
        };

        let removed = self.builds.remove(index);
        if let Err(e) = self.store.store_all(&self.builds) {
            self.builds.insert(index, removed);
            return Err(e);
        }

        info!("Deleted build '{}' ({})", removed.name, id);
        Ok(true)
    }

    /// Copy a saved build's weapon, tree and name out for editing.
    /// The stored build is left untouched.
    pub fn load(&self, id: BuildId) -> Result<LoadedBuild, BuilderError> {
        let build = self.get(id).ok_or(BuilderError::NotFound(id))?;
        Ok(LoadedBuild {
            weapon: build.weapon.clone(),
            tree: build.attachments.clone(),
            name: build.name.clone(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
