//! Stat aggregation over an equipment tree
//!
//! Ergonomics deltas add up; recoil multipliers multiply both recoil axes.
//! Components are rounded only once, at the end, and the recoil sum is the
//! sum of the already-rounded axes.

use gunsmith_core::SlotPath;
use serde::{Deserialize, Serialize};

use crate::equipment::EquipmentTree;
use crate::record::{ModificationRecord, SlotDefinition, WeaponRecord};

/// Final build stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedStats {
    pub ergonomics: i32,
    pub recoil_vertical: i32,
    pub recoil_horizontal: i32,
    pub recoil_sum: i32,
}

impl AggregatedStats {
    /// The weapon's own stats with nothing attached
    pub fn base(weapon: &WeaponRecord) -> Self {
        RawStats::base(weapon).rounded()
    }

    /// Change relative to `base`
    pub fn delta_from(&self, base: &AggregatedStats) -> StatDelta {
        StatDelta {
            ergonomics: self.ergonomics - base.ergonomics,
            recoil_vertical: self.recoil_vertical - base.recoil_vertical,
            recoil_horizontal: self.recoil_horizontal - base.recoil_horizontal,
            recoil_sum: self.recoil_sum - base.recoil_sum,
        }
    }
}

/// Stat change against the bare weapon.
/// Higher ergonomics and lower recoil are improvements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatDelta {
    pub ergonomics: i32,
    pub recoil_vertical: i32,
    pub recoil_horizontal: i32,
    pub recoil_sum: i32,
}

impl StatDelta {
    pub fn improves_ergonomics(&self) -> bool {
        self.ergonomics > 0
    }

    pub fn improves_recoil(&self) -> bool {
        self.recoil_sum < 0
    }
}

/// Unrounded running totals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawStats {
    pub ergonomics: f64,
    pub recoil_vertical: f64,
    pub recoil_horizontal: f64,
}

impl RawStats {
    pub fn base(weapon: &WeaponRecord) -> Self {
        Self {
            ergonomics: f64::from(weapon.ergonomics),
            recoil_vertical: f64::from(weapon.recoil_vertical),
            recoil_horizontal: f64::from(weapon.recoil_horizontal),
        }
    }

    /// Fold one modification into the totals
    pub fn apply(&mut self, modification: &ModificationRecord) {
        self.ergonomics += f64::from(modification.ergonomics);
        if let Some(multiplier) = modification.recoil_multiplier {
            self.recoil_vertical *= multiplier;
            self.recoil_horizontal *= multiplier;
        }
    }

    pub fn rounded(&self) -> AggregatedStats {
        let recoil_vertical = self.recoil_vertical.round() as i32;
        let recoil_horizontal = self.recoil_horizontal.round() as i32;
        AggregatedStats {
            ergonomics: self.ergonomics.round() as i32,
            recoil_vertical,
            recoil_horizontal,
            recoil_sum: recoil_vertical + recoil_horizontal,
        }
    }
}

/// Every modification reachable from the weapon's slots, depth-first
pub fn reachable_modifications<'a>(
    weapon: &WeaponRecord,
    tree: &'a EquipmentTree,
) -> Vec<(SlotPath, &'a ModificationRecord)> {
    let mut found = Vec::new();
    visit_slots(&weapon.slots, None, tree, &mut found);
    found
}

fn visit_slots<'a>(
    slots: &[SlotDefinition],
    parent: Option<&SlotPath>,
    tree: &'a EquipmentTree,
    found: &mut Vec<(SlotPath, &'a ModificationRecord)>,
) {
    for slot in slots {
        let path = match parent {
            Some(parent) => parent.child(&slot.name),
            None => SlotPath::root(&slot.name),
        };
        let Ok(path) = path else {
            continue;
        };
        if let Some(modification) = tree.get(&path) {
            found.push((path.clone(), modification));
            visit_slots(&modification.slots, Some(&path), tree, found);
        }
    }
}

/// Unrounded totals for `weapon` with `tree` attached
pub fn accumulate(weapon: &WeaponRecord, tree: &EquipmentTree) -> RawStats {
    let mut raw = RawStats::base(weapon);
    for (_, modification) in reachable_modifications(weapon, tree) {
        raw.apply(modification);
    }
    raw
}

/// Final stats for `weapon` with `tree` attached
pub fn compute_stats(weapon: &WeaponRecord, tree: &EquipmentTree) -> AggregatedStats {
    accumulate(weapon, tree).rounded()
}
