use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

/// File name shared by every config section
pub const DEFAULT_CONFIG_NAME: &str = "arbor.config.json";

/// Load a JSON config file named `file_name` from `dir`.
///
/// A missing file is not an error: the type's default is returned instead, so
/// callers only need a config file when they want to override something.
pub fn load_json_config<T>(dir: impl AsRef<Path>, file_name: &str) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default,
{
    let config_path = dir.as_ref().join(file_name);

    if config_path.exists() {
        debug!(path = %config_path.display(), "Loading config");
        let content = std::fs::read_to_string(&config_path)?;
        let config: T = serde_json::from_str(&content)?;
        Ok(config)
    } else {
        debug!(path = %config_path.display(), "No config file, using defaults");
        Ok(T::default())
    }
}
