use thiserror::Error;

/// Errors raised at the edges of the engine (config, roster decoding, game log).
///
/// The rules themselves never fail; missing data surfaces as `None`.
#[derive(Error, Debug)]
pub enum AttackError {
    #[error("Invalid roster record: {0}")]
    InvalidRecord(String),

    #[error("Weapon not found: {0}")]
    WeaponNotFound(String),

    #[error("Game log rejected update: {0}")]
    LogRejected(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    ConfigError(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AttackError>;
