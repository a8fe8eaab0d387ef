//! Application configuration
//!
//! Re-exports the shared types from fusebox-types and adds `confy`-backed
//! persistence for `FuseboxConfig`.

use std::path::PathBuf;

pub use fusebox_types::{ContainerConfig, DriverConfig, FuseboxConfig};

use crate::error::ConfigError;

const APP_NAME: &str = "fusebox";
const CONFIG_NAME: &str = "config";

/// Extension trait for FuseboxConfig persistence
pub trait FuseboxConfigExt: Sized {
    /// Load the stored configuration, falling back to defaults
    fn load() -> Self;
    fn try_load() -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn path() -> Result<PathBuf, ConfigError>;
}

impl FuseboxConfigExt for FuseboxConfig {
    fn load() -> Self {
        Self::try_load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "using default configuration");
            Self::default()
        })
    }

    fn try_load() -> Result<Self, ConfigError> {
        confy::load(APP_NAME, CONFIG_NAME).map_err(ConfigError::Load)
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn path() -> Result<PathBuf, ConfigError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).map_err(ConfigError::Locate)
    }
}
