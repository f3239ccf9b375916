use thiserror::Error;

use crate::core::types::ChunkCoord;

#[derive(Error, Debug)]
pub enum ExploreError {
    #[error("No scouts available to dispatch")]
    NoScoutsAvailable,

    #[error("Scout index {0} out of range")]
    ScoutNotFound(usize),

    #[error("Chunk not loaded: {0}")]
    ChunkNotLoaded(ChunkCoord),

    #[error("Save version mismatch: found {found}, expected {expected}")]
    SaveVersionMismatch { found: u32, expected: u32 },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid save data: {0}")]
    InvalidSave(String),

    #[error("Scout ids exhausted")]
    ScoutIdsExhausted,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ExploreError>;
