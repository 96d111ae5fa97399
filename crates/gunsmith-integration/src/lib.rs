//! Gunsmith Integration - game-data provider client
//!
//! Fetches weapon and weapon-modification records from the public GraphQL
//! game-data API and hands them to the builder as raw provider records.

pub mod client;
pub mod error;
pub mod items;
pub mod types;

pub use client::{ClientConfig, IntegrationClient, PendingRequest};
pub use error::IntegrationError;
pub use items::DEFAULT_ENDPOINT;
pub use types::*;
