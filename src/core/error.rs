use thiserror::Error;

use crate::core::types::AgentId;

#[derive(Error, Debug)]
pub enum PossessionError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Agent not found: {0}")]
    UnknownAgent(AgentId),

    #[error("Host rejected operation: {0}")]
    Host(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, PossessionError>;
