//! Build session - the state behind one open weapon builder
//!
//! Holds the selected weapon, the equipment tree, and the transient UI state
//! (expanded slots, the open attachment picker, the pending build name).
//! Stats only ever depend on the weapon and the tree.

use std::collections::HashSet;

use gunsmith_core::{ItemId, SlotPath};
use tracing::debug;

use crate::build::{Build, BuildRepository, LoadedBuild};
use crate::catalog::CatalogIndex;
use crate::compat::{compatible_modifications, filter_by_search_term};
use crate::equipment::{EquipError, EquipmentTree};
use crate::error::BuilderError;
use crate::record::{ModificationRecord, SlotDefinition, WeaponRecord};
use crate::stats::{compute_stats, AggregatedStats, StatDelta};
use crate::store::BuildStore;

/// Which slots are shown expanded
#[derive(Debug, Clone, Default)]
pub struct ExpansionState {
    expanded: HashSet<SlotPath>,
}

impl ExpansionState {
    pub fn is_expanded(&self, path: &SlotPath) -> bool {
        self.expanded.contains(path)
    }

    /// Flip a slot between expanded and collapsed
    pub fn toggle(&mut self, path: &SlotPath) {
        if !self.expanded.remove(path) {
            self.expanded.insert(path.clone());
        }
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }
}

/// The attachment picker opened on one slot
#[derive(Debug, Clone, PartialEq)]
pub struct SlotPicker {
    pub path: SlotPath,
    pub search_term: String,
}

/// One row of the visible slot listing
#[derive(Debug, Clone)]
pub struct SlotRow<'a> {
    pub path: SlotPath,
    /// 0 for the weapon's own slots
    pub depth: usize,
    pub slot: &'a SlotDefinition,
    pub equipped: Option<&'a ModificationRecord>,
    /// Equipped modification exposes nested slots
    pub expandable: bool,
}

/// State of one in-progress build
#[derive(Debug, Default)]
pub struct BuildSession {
    weapon: Option<WeaponRecord>,
    tree: EquipmentTree,
    expansion: ExpansionState,
    picker: Option<SlotPicker>,
    build_name: String,
}

impl BuildSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to `weapon`, discarding the current attachments
    pub fn select_weapon(&mut self, weapon: WeaponRecord) {
        debug!("Selected weapon {}", weapon.id);
        self.weapon = Some(weapon);
        self.tree.reset();
        self.expansion.clear();
        self.picker = None;
    }

    pub fn weapon(&self) -> Option<&WeaponRecord> {
        self.weapon.as_ref()
    }

    pub fn tree(&self) -> &EquipmentTree {
        &self.tree
    }

    /// Slot definition at `path`: a weapon slot for top-level paths, else a
    /// nested slot of the modification equipped at the parent path
    pub fn slot_at(&self, path: &SlotPath) -> Option<&SlotDefinition> {
        match path.parent() {
            None => self.weapon.as_ref()?.slot(path.slot_name()),
            Some(parent) => self.tree.get(&parent)?.slot(path.slot_name()),
        }
    }

    /// Equip without a compatibility check and close the picker
    pub fn equip(
        &mut self,
        path: SlotPath,
        modification: ModificationRecord,
    ) -> Result<Option<ModificationRecord>, EquipError> {
        let previous = self.tree.equip(path, modification)?;
        self.close_picker();
        Ok(previous)
    }

    /// Look up `id` in the catalog and equip it at `path` if the slot
    /// accepts it
    pub fn equip_checked(
        &mut self,
        catalog: &CatalogIndex,
        path: SlotPath,
        id: &ItemId,
    ) -> Result<Option<ModificationRecord>, BuilderError> {
        if self.weapon.is_none() {
            return Err(EquipError::NoWeapon.into());
        }
        let slot = self
            .slot_at(&path)
            .ok_or_else(|| EquipError::NoSuchSlot { path: path.clone() })?;
        let modification = catalog
            .modification_by_id(id)
            .ok_or_else(|| EquipError::UnknownModification(id.clone()))?;
        if !slot.accepts(id) {
            return Err(EquipError::Incompatible { path, id: id.clone() }.into());
        }
        Ok(self.equip(path, modification.clone())?)
    }

    /// Remove the modification at `path` and everything below it
    pub fn unequip(&mut self, path: &SlotPath) -> Option<ModificationRecord> {
        self.tree.unequip(path)
    }

    /// Clear all attachments and expansion state
    pub fn reset(&mut self) {
        self.tree.reset();
        self.expansion.clear();
    }

    pub fn is_expanded(&self, path: &SlotPath) -> bool {
        self.expansion.is_expanded(path)
    }

    pub fn toggle_expansion(&mut self, path: &SlotPath) {
        self.expansion.toggle(path);
    }

    /// Open the attachment picker on `path` with an empty search
    pub fn open_picker(&mut self, path: SlotPath) {
        self.picker = Some(SlotPicker {
            path,
            search_term: String::new(),
        });
    }

    pub fn close_picker(&mut self) {
        self.picker = None;
    }

    pub fn picker(&self) -> Option<&SlotPicker> {
        self.picker.as_ref()
    }

    pub fn set_picker_search(&mut self, term: &str) {
        if let Some(picker) = &mut self.picker {
            picker.search_term = term.to_string();
        }
    }

    /// Compatible modifications for the open picker, narrowed by its search
    pub fn picker_options<'a>(&self, catalog: &'a CatalogIndex) -> Vec<&'a ModificationRecord> {
        let Some(picker) = &self.picker else {
            return Vec::new();
        };
        let Some(slot) = self.slot_at(&picker.path) else {
            return Vec::new();
        };
        filter_by_search_term(compatible_modifications(catalog, slot), &picker.search_term)
    }

    pub fn build_name(&self) -> &str {
        &self.build_name
    }

    pub fn set_build_name(&mut self, name: &str) {
        self.build_name = name.to_string();
    }

    /// Current stats, if a weapon is selected
    pub fn stats(&self) -> Option<AggregatedStats> {
        self.weapon.as_ref().map(|w| compute_stats(w, &self.tree))
    }

    /// Current stats relative to the bare weapon
    pub fn stat_delta(&self) -> Option<StatDelta> {
        let weapon = self.weapon.as_ref()?;
        let stats = compute_stats(weapon, &self.tree);
        Some(stats.delta_from(&AggregatedStats::base(weapon)))
    }

    /// Save the current weapon and tree under the pending build name, then
    /// clear the name
    pub fn save<S: BuildStore>(&mut self, repo: &mut BuildRepository<S>) -> Result<Build, BuilderError> {
        let stats = self
            .stats()
            .ok_or_else(|| BuilderError::Validation("no weapon selected".into()))?;
        let build = repo.save(&self.build_name, self.weapon.as_ref(), &self.tree, stats)?;
        self.build_name.clear();
        Ok(build)
    }

    /// Replace the session with a saved build's weapon, tree and name
    pub fn load_build(&mut self, loaded: LoadedBuild) {
        self.weapon = Some(loaded.weapon);
        self.tree = loaded.tree;
        self.build_name = loaded.name;
        self.expansion.clear();
        self.picker = None;
    }

    /// Slots to display: every weapon slot, plus the nested slots of
    /// expanded, equipped modifications
    pub fn visible_slots(&self) -> Vec<SlotRow<'_>> {
        let mut rows = Vec::new();
        if let Some(weapon) = &self.weapon {
            self.collect_rows(&weapon.slots, None, &mut rows);
        }
        rows
    }

    fn collect_rows<'a>(
        &'a self,
        slots: &'a [SlotDefinition],
        parent: Option<&SlotPath>,
        rows: &mut Vec<SlotRow<'a>>,
    ) {
        for slot in slots {
            let path = match parent {
                Some(parent) => parent.child(&slot.name),
                None => SlotPath::root(&slot.name),
            };
            let Ok(path) = path else {
                continue;
            };
            let equipped = self.tree.get(&path);
            let expandable = equipped.is_some_and(ModificationRecord::has_slots);
            rows.push(SlotRow {
                path: path.clone(),
                depth: path.depth(),
                slot,
                equipped,
                expandable,
            });
            if let (Some(modification), true) = (equipped, self.is_expanded(&path)) {
                self.collect_rows(&modification.slots, Some(&path), rows);
            }
        }
    }
}
