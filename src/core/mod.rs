pub mod config;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use error::{AttackError, Result};
pub use types::{Phase, Section, TargetNumber, CHECK_DIE};
