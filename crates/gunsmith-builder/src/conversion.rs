//! Conversion from provider items to typed weapon and modification records
//!
//! This is the only place the provider's loosely-typed property bag is
//! inspected. Anything that comes out of here has a validated shape.

use gunsmith_core::{ItemId, SlotPath};
use gunsmith_integration::types::{ProviderItem, ProviderItemRef, ProviderSlot};
use thiserror::Error;
use tracing::warn;

use crate::record::{ModificationRecord, SlotDefinition, WeaponRecord};

/// Provider item kind for firearms
pub const GUN_TYPE: &str = "gun";
/// Provider item kind for weapon modifications
pub const MODS_TYPE: &str = "mods";

const UNKNOWN_CALIBER: &str = "Unknown";

/// Why a provider item could not become a record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("item {id} is not a {kind}")]
    WrongKind { id: String, kind: &'static str },

    #[error("item {id} has no properties")]
    MissingProperties { id: String },

    #[error("item {id} is missing numeric field '{field}'")]
    MissingField { id: String, field: &'static str },
}

/// Convert a provider `gun` item into a weapon record
pub fn weapon_from_provider(item: &ProviderItem) -> Result<WeaponRecord, RecordError> {
    if !item.has_type(GUN_TYPE) {
        return Err(RecordError::WrongKind { id: item.id.clone(), kind: GUN_TYPE });
    }
    let props = item
        .properties
        .as_ref()
        .ok_or_else(|| RecordError::MissingProperties { id: item.id.clone() })?;

    let required = |value: Option<f64>, field: &'static str| {
        value
            .filter(|v| v.is_finite())
            .map(|v| v.round() as i32)
            .ok_or_else(|| RecordError::MissingField { id: item.id.clone(), field })
    };

    Ok(WeaponRecord {
        id: ItemId::new(item.id.clone()),
        name: item.name.clone(),
        short_name: item.short_name.clone(),
        caliber: props
            .caliber
            .clone()
            .unwrap_or_else(|| UNKNOWN_CALIBER.to_string()),
        ergonomics: required(props.ergonomics, "ergonomics")?,
        recoil_vertical: required(props.recoil_vertical, "recoilVertical")?,
        recoil_horizontal: required(props.recoil_horizontal, "recoilHorizontal")?,
        slots: convert_slots(&item.id, props.slots.as_deref()),
        fire_rate: props.fire_rate.filter(|r| *r >= 0.0).map(|r| r.round() as u32),
        fire_modes: props.fire_modes.clone().unwrap_or_default(),
        effective_distance: props
            .effective_distance
            .filter(|d| *d >= 0.0)
            .map(|d| d.round() as u32),
        default_ammo: props.default_ammo.as_ref().map(|a| a.name.clone()),
    })
}

/// Convert a provider `mods` item into a modification record.
///
/// A mod without properties is still a valid (stat-less) modification.
pub fn modification_from_provider(item: &ProviderItem) -> Result<ModificationRecord, RecordError> {
    if !item.has_type(MODS_TYPE) {
        return Err(RecordError::WrongKind { id: item.id.clone(), kind: MODS_TYPE });
    }
    let props = item.properties.clone().unwrap_or_default();

    let recoil_multiplier = match props.recoil_modifier {
        Some(m) if m > 0.0 && m <= 2.0 => Some(m),
        Some(m) if m != 0.0 => {
            warn!("Ignoring out-of-range recoil modifier {} on mod {}", m, item.id);
            None
        }
        _ => None,
    };

    Ok(ModificationRecord {
        id: ItemId::new(item.id.clone()),
        name: item.name.clone(),
        short_name: item.short_name.clone(),
        ergonomics: props
            .ergonomics
            .filter(|e| e.is_finite())
            .map(|e| e.round() as i32)
            .unwrap_or(0),
        recoil_multiplier,
        slots: convert_slots(&item.id, props.slots.as_deref()),
    })
}

fn convert_slots(owner: &str, slots: Option<&[ProviderSlot]>) -> Vec<SlotDefinition> {
    let mut converted: Vec<SlotDefinition> = Vec::new();
    for slot in slots.unwrap_or_default() {
        let Some(segment) = slot_segment(slot, &converted) else {
            warn!("Skipping slot '{}' on {}: name is invalid or repeated", slot.name, owner);
            continue;
        };
        let filters = slot.filters.clone().unwrap_or_default();
        converted.push(SlotDefinition {
            label: (segment != slot.name).then(|| slot.name.clone()),
            name: segment,
            required: slot.required.unwrap_or(false),
            allowed: ref_ids(filters.allowed_items.as_deref()),
            excluded: ref_ids(filters.excluded_items.as_deref()),
        });
    }
    converted
}

/// Path segment for `slot`: its name, or its `nameId` when the name is not
/// a valid segment or is already taken by a sibling
fn slot_segment(slot: &ProviderSlot, siblings: &[SlotDefinition]) -> Option<String> {
    let usable = |candidate: &str| {
        SlotPath::root(candidate).is_ok() && !siblings.iter().any(|s| s.name == candidate)
    };
    if usable(&slot.name) {
        return Some(slot.name.clone());
    }
    slot.name_id.as_deref().filter(|id| usable(id)).map(str::to_string)
}

fn ref_ids(refs: Option<&[ProviderItemRef]>) -> Vec<ItemId> {
    refs.unwrap_or_default()
        .iter()
        .filter(|r| !r.id.is_empty())
        .map(|r| ItemId::new(r.id.clone()))
        .collect()
}
