use gunsmith_core::BuildId;
use gunsmith_integration::IntegrationError;
use thiserror::Error;

use crate::equipment::EquipError;

#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("Game data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Invalid build: {0}")]
    Validation(String),

    #[error("Build {0} not found")]
    NotFound(BuildId),

    #[error(transparent)]
    Equip(#[from] EquipError),

    #[error("Build storage error: {0}")]
    Storage(String),
}

impl From<IntegrationError> for BuilderError {
    fn from(err: IntegrationError) -> Self {
        BuilderError::DataUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for BuilderError {
    fn from(err: serde_json::Error) -> Self {
        BuilderError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for BuilderError {
    fn from(err: std::io::Error) -> Self {
        BuilderError::Storage(err.to_string())
    }
}
