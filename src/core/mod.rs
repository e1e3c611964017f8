pub mod config;
pub mod error;
pub mod types;

pub use config::{LoadedConfig, PossessionConfig, OPTIONS_FILE_NAME};
pub use error::{PossessionError, Result};
pub use types::{AgentId, AgentSnapshot, Rgb, TeamId, TeamRelation};
