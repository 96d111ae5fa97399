//! Gunsmith Builder - weapon attachment build calculator
//!
//! Provides the catalog of weapons and modifications, slot compatibility
//! resolution, the recursive equipment tree, stat aggregation, the build
//! session, and saved-build persistence.

pub mod build;
pub mod catalog;
pub mod compat;
pub mod conversion;
pub mod equipment;
pub mod error;
pub mod record;
pub mod session;
pub mod stats;
pub mod store;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use build::{Build, BuildRepository, LoadedBuild};
pub use catalog::{CatalogIndex, ALL_CALIBERS};
pub use compat::{compatible_modifications, filter_by_search_term};
pub use equipment::{EquipError, EquipmentTree};
pub use error::BuilderError;
pub use record::{format_fire_modes, ModificationRecord, SlotDefinition, WeaponRecord};
pub use session::{BuildSession, ExpansionState, SlotPicker, SlotRow};
pub use stats::{compute_stats, AggregatedStats, RawStats, StatDelta};
pub use store::{BuildStore, JsonFileStore, MemoryStore, BUILDS_STORAGE_KEY};

pub use gunsmith_core::{BuildId, ItemId, SlotPath};
