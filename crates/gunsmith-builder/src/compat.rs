//! Slot compatibility resolution

use tracing::debug;

use crate::catalog::CatalogIndex;
use crate::record::{ModificationRecord, SlotDefinition};

/// Modifications that may be equipped into `slot`, in allow-list order.
///
/// Allow-list ids missing from the catalog are stale references and are
/// dropped. Anything on the exclude-list is removed even if allowed.
pub fn compatible_modifications<'a>(
    catalog: &'a CatalogIndex,
    slot: &SlotDefinition,
) -> Vec<&'a ModificationRecord> {
    let mut stale = 0usize;
    let compatible = slot
        .allowed
        .iter()
        .filter(|id| !slot.excluded.contains(id))
        .filter_map(|id| {
            let found = catalog.modification_by_id(id);
            if found.is_none() {
                stale += 1;
            }
            found
        })
        .collect();

    if stale > 0 {
        debug!("Slot '{}': {} allowed ids not in catalog", slot.name, stale);
    }
    compatible
}

/// Narrow a modification list by case-insensitive name or short-name match.
/// An empty term returns the list unchanged.
pub fn filter_by_search_term<'a>(
    mods: Vec<&'a ModificationRecord>,
    term: &str,
) -> Vec<&'a ModificationRecord> {
    if term.is_empty() {
        return mods;
    }
    mods.into_iter().filter(|m| m.matches_search(term)).collect()
}
