use serde::{Deserialize, Serialize};

/// Standard GraphQL response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// One entry of a GraphQL `errors` array
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// Request body for the GraphQL endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlRequest {
    pub query: String,
}

/// `data` payload of the items query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsData {
    #[serde(default)]
    pub items: Vec<ProviderItem>,
}

/// An item record as returned by the game-data API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    /// Item kinds, e.g. `gun`, `mods`
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub properties: Option<ProviderItemProperties>,
}

impl ProviderItem {
    pub fn has_type(&self, kind: &str) -> bool {
        self.types.iter().any(|t| t == kind)
    }
}

/// Union of the weapon and weapon-mod property fragments.
///
/// Every field is optional here; the builder validates the shape when it
/// converts a record into a typed weapon or modification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderItemProperties {
    #[serde(default)]
    pub caliber: Option<String>,
    #[serde(default)]
    pub ergonomics: Option<f64>,
    #[serde(default)]
    pub recoil_vertical: Option<f64>,
    #[serde(default)]
    pub recoil_horizontal: Option<f64>,
    #[serde(default)]
    pub recoil_modifier: Option<f64>,
    #[serde(default)]
    pub fire_rate: Option<f64>,
    #[serde(default)]
    pub fire_modes: Option<Vec<String>>,
    #[serde(default)]
    pub effective_distance: Option<f64>,
    #[serde(default)]
    pub default_ammo: Option<ProviderItemRef>,
    #[serde(default)]
    pub slots: Option<Vec<ProviderSlot>>,
}

/// Slot definition on a weapon or modification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSlot {
    pub name: String,
    #[serde(default)]
    pub name_id: Option<String>,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub filters: Option<ProviderSlotFilters>,
}

/// Allow/exclude filters of a slot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSlotFilters {
    #[serde(default)]
    pub allowed_items: Option<Vec<ProviderItemRef>>,
    #[serde(default)]
    pub excluded_items: Option<Vec<ProviderItemRef>>,
}

/// Reference to another item by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderItemRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}
