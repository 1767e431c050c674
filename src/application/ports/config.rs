//! Configuration storage port

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Port for persisting the recorder configuration: the segment output
/// directory, the encoding bit rate, and the auto-save interval.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load the stored configuration.
    ///
    /// A missing backing file is not an error; it loads as a config
    /// with every field unset.
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Persist the configuration, replacing the stored one.
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    /// Location of the backing file.
    fn path(&self) -> PathBuf;

    /// Create the backing file with default values.
    /// Fails with `AlreadyExists` if one is already present.
    async fn init(&self) -> Result<(), ConfigError>;
}
