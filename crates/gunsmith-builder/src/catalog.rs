//! Catalog index - weapons and modifications loaded from the provider

use std::collections::{BTreeSet, HashMap, HashSet};

use gunsmith_core::ItemId;
use gunsmith_integration::types::ProviderItem;
use tracing::{info, warn};

use crate::conversion::{modification_from_provider, weapon_from_provider, GUN_TYPE, MODS_TYPE};
use crate::error::BuilderError;
use crate::record::{ModificationRecord, WeaponRecord};

/// Caliber filter value that matches every weapon
pub const ALL_CALIBERS: &str = "all";

/// Read-only index of every weapon and modification, built once at startup.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    /// Weapons sorted by name
    weapons: Vec<WeaponRecord>,
    /// Modifications sorted by name
    modifications: Vec<ModificationRecord>,
    weapon_index: HashMap<ItemId, usize>,
    modification_index: HashMap<ItemId, usize>,
}

impl CatalogIndex {
    /// Build a catalog from provider items.
    /// `gun` items missing required stats are skipped; the load fails only if
    /// no usable weapon remains.
    pub fn load(items: Vec<ProviderItem>) -> Result<Self, BuilderError> {
        let mut weapons = Vec::new();
        let mut modifications = Vec::new();
        let mut skipped = 0usize;

        for item in &items {
            if item.has_type(GUN_TYPE) {
                match weapon_from_provider(item) {
                    Ok(weapon) => weapons.push(weapon),
                    Err(e) => {
                        warn!("Skipping weapon: {}", e);
                        skipped += 1;
                    }
                }
            }
            if item.has_type(MODS_TYPE) {
                match modification_from_provider(item) {
                    Ok(modification) => modifications.push(modification),
                    Err(e) => warn!("Skipping modification: {}", e),
                }
            }
        }

        info!(
            "Catalog: {} weapons ({} skipped), {} modifications",
            weapons.len(),
            skipped,
            modifications.len()
        );
        Self::from_records(weapons, modifications)
    }

    /// Build a catalog from already-typed records
    pub fn from_records(
        mut weapons: Vec<WeaponRecord>,
        mut modifications: Vec<ModificationRecord>,
    ) -> Result<Self, BuilderError> {
        if weapons.is_empty() {
            return Err(BuilderError::DataUnavailable("no usable weapon records".into()));
        }

        dedup_by_id(&mut weapons, |w| &w.id, "weapon");
        dedup_by_id(&mut modifications, |m| &m.id, "modification");

        weapons.sort_by_cached_key(|w| sort_key(&w.name));
        modifications.sort_by_cached_key(|m| sort_key(&m.name));

        let weapon_index = index_by_id(weapons.iter().map(|w| &w.id));
        let modification_index = index_by_id(modifications.iter().map(|m| &m.id));

        Ok(Self {
            weapons,
            modifications,
            weapon_index,
            modification_index,
        })
    }

    /// All weapons, sorted by name.
    pub fn weapons(&self) -> &[WeaponRecord] {
        &self.weapons
    }

    /// All modifications, sorted by name.
    pub fn modifications(&self) -> &[ModificationRecord] {
        &self.modifications
    }

    pub fn weapon_by_id(&self, id: &ItemId) -> Option<&WeaponRecord> {
        self.weapon_index.get(id).map(|&i| &self.weapons[i])
    }

    pub fn modification_by_id(&self, id: &ItemId) -> Option<&ModificationRecord> {
        self.modification_index.get(id).map(|&i| &self.modifications[i])
    }

    /// Weapons whose name or short name contains `term` (case-insensitive),
    /// restricted to `caliber` unless it is [`ALL_CALIBERS`].
    pub fn weapons_by_caliber_filter(&self, term: &str, caliber: &str) -> Vec<&WeaponRecord> {
        self.weapons
            .iter()
            .filter(|w| w.matches_search(term))
            .filter(|w| caliber == ALL_CALIBERS || w.caliber == caliber)
            .collect()
    }

    /// Distinct calibers, sorted, for the caliber filter.
    pub fn calibers(&self) -> Vec<&str> {
        self.weapons
            .iter()
            .map(|w| w.caliber.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Case-insensitive name order, exact name as tie-break
fn sort_key(name: &str) -> (String, String) {
    (name.to_lowercase(), name.to_string())
}

/// Drop records whose id was already seen; the first occurrence wins
fn dedup_by_id<T>(records: &mut Vec<T>, id: impl Fn(&T) -> &ItemId, kind: &str) {
    let mut seen = HashSet::new();
    records.retain(|record| {
        let first = seen.insert(id(record).clone());
        if !first {
            warn!("Duplicate {} id {}", kind, id(record));
        }
        first
    });
}

fn index_by_id<'a>(ids: impl Iterator<Item = &'a ItemId>) -> HashMap<ItemId, usize> {
    ids.enumerate().map(|(i, id)| (id.clone(), i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{make_mod, make_weapon};

    fn weapon(id: &str, name: &str, short: &str, caliber: &str) -> WeaponRecord {
        let mut w = make_weapon(50, 100, 200, &[]);
        w.id = id.into();
        w.name = name.to_string();
        w.short_name = Some(short.to_string());
        w.caliber = caliber.to_string();
        w
    }

    fn test_catalog() -> CatalogIndex {
        CatalogIndex::from_records(
            vec![
                weapon("w2", "Kalashnikov AK-74N", "AK-74N", "Caliber545x39"),
                weapon("w1", "Colt M4A1", "M4A1", "Caliber556x45NATO"),
                weapon("w3", "HK 416A5", "HK416", "Caliber556x45NATO"),
            ],
            vec![make_mod("m1", 5, None, &[]), make_mod("m2", 0, Some(0.9), &[])],
        )
        .unwrap()
    }

    fn provider(json: &str) -> Vec<ProviderItem> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_weapons_sorted_by_name() {
        let catalog = test_catalog();
        let names: Vec<&str> = catalog.weapons().iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Colt M4A1", "HK 416A5", "Kalashnikov AK-74N"]);
        assert_eq!(catalog.weapon_by_id(&"w2".into()).unwrap().caliber, "Caliber545x39");
    }

    #[test]
    fn test_sort_ignores_case() {
        let catalog = CatalogIndex::from_records(
            vec![
                weapon("w1", "Colt M4A1", "M4A1", "Caliber556x45NATO"),
                weapon("w2", "aks-74u", "AKS-74U", "Caliber545x39"),
                weapon("w3", "AK-74N", "AK-74N", "Caliber545x39"),
            ],
            Vec::new(),
        )
        .unwrap();
        let names: Vec<&str> = catalog.weapons().iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["AK-74N", "aks-74u", "Colt M4A1"]);
    }

    #[test]
    fn test_duplicate_ids_keep_first_record() {
        let catalog = CatalogIndex::from_records(
            vec![
                weapon("w1", "Colt M4A1", "M4A1", "Caliber556x45NATO"),
                weapon("w1", "Colt M4A1 (copy)", "M4A1", "Caliber556x45NATO"),
            ],
            vec![make_mod("m1", 5, None, &[]), make_mod("m1", 9, None, &[])],
        )
        .unwrap();
        assert_eq!(catalog.weapons().len(), 1);
        assert_eq!(catalog.weapons_by_caliber_filter("m4a1", ALL_CALIBERS).len(), 1);
        assert_eq!(catalog.weapon_by_id(&"w1".into()).unwrap().name, "Colt M4A1");
        assert_eq!(catalog.modifications().len(), 1);
        assert_eq!(catalog.modification_by_id(&"m1".into()).unwrap().ergonomics, 5);
    }

    #[test]
    fn test_filter_by_term_and_caliber() {
        let catalog = test_catalog();
        assert_eq!(catalog.weapons_by_caliber_filter("", ALL_CALIBERS).len(), 3);
        assert_eq!(catalog.weapons_by_caliber_filter("", "Caliber556x45NATO").len(), 2);
        let hits = catalog.weapons_by_caliber_filter("ak", ALL_CALIBERS);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, ItemId::from("w2"));
        assert!(catalog.weapons_by_caliber_filter("ak", "Caliber556x45NATO").is_empty());
        assert_eq!(catalog.weapons_by_caliber_filter("hk416", "all").len(), 1);
    }

    #[test]
    fn test_calibers_distinct_sorted() {
        let catalog = test_catalog();
        assert_eq!(catalog.calibers(), vec!["Caliber545x39", "Caliber556x45NATO"]);
    }

    #[test]
    fn test_modification_lookup() {
        let catalog = test_catalog();
        assert_eq!(catalog.modification_by_id(&"m2".into()).unwrap().recoil_multiplier, Some(0.9));
        assert!(catalog.modification_by_id(&"nope".into()).is_none());
    }

    #[test]
    fn test_load_from_provider_skips_malformed_weapons() {
        let items = provider(
            r#"[
                {"id": "w1", "name": "M4A1", "types": ["gun"],
                 "properties": {"caliber": "Caliber556x45NATO", "ergonomics": 50,
                                "recoilVertical": 56, "recoilHorizontal": 240}},
                {"id": "w2", "name": "Broken gun", "types": ["gun"], "properties": {}},
                {"id": "m1", "name": "Flash hider", "types": ["mods"],
                 "properties": {"ergonomics": -1, "recoilModifier": 0.95}}
            ]"#,
        );
        let catalog = CatalogIndex::load(items).unwrap();
        assert_eq!(catalog.weapons().len(), 1);
        assert_eq!(catalog.modifications().len(), 1);
        assert_eq!(catalog.modification_by_id(&"m1".into()).unwrap().ergonomics, -1);
    }

    #[test]
    fn test_load_without_weapons_is_data_unavailable() {
        let items = provider(r#"[{"id": "m1", "name": "Flash hider", "types": ["mods"]}]"#);
        assert!(matches!(CatalogIndex::load(items), Err(BuilderError::DataUnavailable(_))));
        assert!(matches!(CatalogIndex::load(Vec::new()), Err(BuilderError::DataUnavailable(_))));
    }
}
