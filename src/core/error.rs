use thiserror::Error;

use crate::core::types::DataStream;

#[derive(Error, Debug)]
pub enum CfoError {
    #[error("Unknown simulation config field: {0}")]
    UnknownConfigField(String),

    #[error("Unknown time range: {0} (expected 7d, 30d, 90d or 1y)")]
    UnknownTimeRange(String),

    #[error("Unknown KPI: {0}")]
    UnknownKpi(String),

    #[error("{stream} request #{epoch} superseded by a newer request")]
    Superseded { stream: DataStream, epoch: u64 },

    #[error("Failed to load {} data", .stream.label())]
    FetchFailed { stream: DataStream },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, CfoError>;
