//! Equipment tree
//!
//! Maps slot paths to equipped modifications. A nested path can only be
//! present when its parent path holds a modification that exposes the
//! nested slot, so the tree never contains orphaned children. Removing a
//! path removes everything below it.
//!
//! Compatibility with the slot's allow/exclude lists is not checked here;
//! callers resolve it first (see [`crate::compat`]).

use std::collections::BTreeMap;

use gunsmith_core::{ItemId, SlotPath};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::ModificationRecord;

/// Error when placing a modification in the tree
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EquipError {
    /// Nested path whose parent slot is empty
    #[error("Cannot equip at {path}: parent slot is empty")]
    MissingParent { path: SlotPath },

    /// Parent modification has no slot with this name
    #[error("No slot at {path}")]
    NoSuchSlot { path: SlotPath },

    /// Modification is not compatible with the slot
    #[error("Modification {id} does not fit slot {path}")]
    Incompatible { path: SlotPath, id: ItemId },

    /// Modification id is not in the catalog
    #[error("Unknown modification {0}")]
    UnknownModification(ItemId),

    /// No weapon selected for the build
    #[error("No weapon selected")]
    NoWeapon,
}

/// The attachments of one in-progress build
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<SlotPath, ModificationRecord>",
    into = "BTreeMap<SlotPath, ModificationRecord>"
)]
pub struct EquipmentTree {
    /// Ancestors sort before their descendants
    entries: BTreeMap<SlotPath, ModificationRecord>,
}

impl EquipmentTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Equip `modification` at `path`, returning the previous occupant.
    ///
    /// Replacing an occupied path clears its descendants, since the new
    /// modification may expose different slots.
    pub fn equip(
        &mut self,
        path: SlotPath,
        modification: ModificationRecord,
    ) -> Result<Option<ModificationRecord>, EquipError> {
        if let Some(parent) = path.parent() {
            let host = self
                .entries
                .get(&parent)
                .ok_or_else(|| EquipError::MissingParent { path: path.clone() })?;
            if host.slot(path.slot_name()).is_none() {
                return Err(EquipError::NoSuchSlot { path });
            }
        }

        self.remove_descendants(&path);
        Ok(self.entries.insert(path, modification))
    }

    /// Remove the modification at `path` and everything nested below it.
    /// Removing an empty path is a no-op.
    pub fn unequip(&mut self, path: &SlotPath) -> Option<ModificationRecord> {
        let removed = self.entries.remove(path)?;
        self.remove_descendants(path);
        Some(removed)
    }

    fn remove_descendants(&mut self, path: &SlotPath) {
        self.entries.retain(|p, _| !p.is_descendant_of(path));
    }

    pub fn get(&self, path: &SlotPath) -> Option<&ModificationRecord> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &SlotPath) -> bool {
        self.entries.contains_key(path)
    }

    /// Entries in path order (parents before children)
    pub fn iter(&self) -> impl Iterator<Item = (&SlotPath, &ModificationRecord)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every attachment
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

impl TryFrom<BTreeMap<SlotPath, ModificationRecord>> for EquipmentTree {
    type Error = EquipError;

    fn try_from(attachments: BTreeMap<SlotPath, ModificationRecord>) -> Result<Self, Self::Error> {
        let mut tree = Self::new();
        for (path, modification) in attachments {
            tree.equip(path, modification)?;
        }
        Ok(tree)
    }
}

impl From<EquipmentTree> for BTreeMap<SlotPath, ModificationRecord> {
    fn from(tree: EquipmentTree) -> Self {
        tree.entries
    }
}
