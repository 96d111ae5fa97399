//! Weapon and modification records
//!
//! Typed, validated views of the provider's weapon and weapon-mod items.
//! Records are immutable once the catalog is loaded.

use gunsmith_core::ItemId;
use serde::{Deserialize, Serialize};

/// A slot on a weapon or modification that can host one modification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDefinition {
    /// Path segment; unique among its siblings, not globally
    pub name: String,
    /// Provider display name when it differs from `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Shown to the user only; saving does not require it to be filled
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub allowed: Vec<ItemId>,
    #[serde(default)]
    pub excluded: Vec<ItemId>,
}

impl SlotDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            required: false,
            allowed: Vec::new(),
            excluded: Vec::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Whether `id` may go in this slot. The exclude-list wins.
    pub fn accepts(&self, id: &ItemId) -> bool {
        self.allowed.contains(id) && !self.excluded.contains(id)
    }
}

/// A weapon as the root of a build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponRecord {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    pub caliber: String,
    pub ergonomics: i32,
    pub recoil_vertical: i32,
    pub recoil_horizontal: i32,
    #[serde(default)]
    pub slots: Vec<SlotDefinition>,
    #[serde(default)]
    pub fire_rate: Option<u32>,
    #[serde(default)]
    pub fire_modes: Vec<String>,
    #[serde(default)]
    pub effective_distance: Option<u32>,
    #[serde(default)]
    pub default_ammo: Option<String>,
}

impl WeaponRecord {
    /// Short name if the provider has one, else the full name
    pub fn display_name(&self) -> &str {
        self.short_name.as_deref().unwrap_or(&self.name)
    }

    /// Top-level slot by name
    pub fn slot(&self, name: &str) -> Option<&SlotDefinition> {
        self.slots.iter().find(|s| s.name == name)
    }

    pub fn matches_search(&self, term: &str) -> bool {
        matches_name(&self.name, self.short_name.as_deref(), term)
    }
}

/// A weapon modification (attachment), possibly hosting further slots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModificationRecord {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    /// Additive ergonomics change, 0 when the provider omits it
    #[serde(default)]
    pub ergonomics: i32,
    /// Recoil multiplier in (0, 2]
    #[serde(default)]
    pub recoil_multiplier: Option<f64>,
    #[serde(default)]
    pub slots: Vec<SlotDefinition>,
}

impl ModificationRecord {
    pub fn display_name(&self) -> &str {
        self.short_name.as_deref().unwrap_or(&self.name)
    }

    /// Nested slot by name
    pub fn slot(&self, name: &str) -> Option<&SlotDefinition> {
        self.slots.iter().find(|s| s.name == name)
    }

    pub fn has_slots(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Recoil reduction as a whole percentage, e.g. 0.9 -> 10
    pub fn recoil_reduction_percent(&self) -> Option<i32> {
        self.recoil_multiplier
            .map(|m| ((1.0 - m) * 100.0).round() as i32)
    }

    pub fn matches_search(&self, term: &str) -> bool {
        matches_name(&self.name, self.short_name.as_deref(), term)
    }
}

/// Case-insensitive substring match on name or short name
pub(crate) fn matches_name(name: &str, short_name: Option<&str>, term: &str) -> bool {
    let term = term.to_lowercase();
    name.to_lowercase().contains(&term)
        || short_name.is_some_and(|s| s.to_lowercase().contains(&term))
}

/// Format fire modes for display: "SINGLE FIRE / FULL AUTO", or "Semi" when unknown
pub fn format_fire_modes(modes: &[String]) -> String {
    if modes.is_empty() {
        return "Semi".to_string();
    }
    modes.join(" / ").to_uppercase()
}
