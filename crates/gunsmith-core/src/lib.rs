//! Gunsmith Core - Core types shared by the Gunsmith crates
//!
//! This crate provides the foundational types used throughout the workspace:
//! - Identifiers for provider items and saved builds
//! - Slot paths addressing positions in a weapon's attachment tree

pub mod slot_path;
pub mod types;

pub use slot_path::{SlotPath, SlotPathError};
pub use types::{BuildId, ItemId};
