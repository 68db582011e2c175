use arbor_common::{load_json_config, ReconcileResult, DEFAULT_CONFIG_NAME};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reconciler configuration
///
/// Unknown keys are ignored, so the same file can carry other sections
/// (the DOM backend reads its own keys from it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReconcilerConfig {
    /// Property written on a container when it becomes a root, holding the
    /// root id. `null` disables the marker.
    pub root_attribute: Option<String>,

    /// First id handed out by the root registry
    pub first_root_id: u64,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            root_attribute: Some("data-arbor-root".to_string()),
            first_root_id: 1,
        }
    }
}

impl ReconcilerConfig {
    /// Load config from a directory, falling back to defaults
    pub fn load(dir: impl AsRef<Path>) -> ReconcileResult<Self> {
        Ok(load_json_config(dir, DEFAULT_CONFIG_NAME)?)
    }
}
