use arbor_common::{load_json_config, ConfigError, DEFAULT_CONFIG_NAME};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How `MemoryDom` interprets property names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DomConfig {
    /// Properties starting with this prefix register event handlers;
    /// `onClick` listens for `click`
    pub event_prefix: String,

    /// Property mapped to the node's class
    pub class_property: String,

    /// Property whose style map is merged onto the node's style
    pub style_property: String,

    /// Reject tags that are not known HTML tags
    pub strict_tags: bool,
}

impl Default for DomConfig {
    fn default() -> Self {
        Self {
            event_prefix: "on".to_string(),
            class_property: "className".to_string(),
            style_property: "style".to_string(),
            strict_tags: true,
        }
    }
}

impl DomConfig {
    /// Load config from a directory, falling back to defaults
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_json_config(dir, DEFAULT_CONFIG_NAME)
    }

    /// Event type for an event property name, e.g. `onClick` → `click`.
    /// After an alphanumeric prefix the event name must start uppercase, so
    /// `one` stays a plain attribute.
    pub fn event_type(&self, name: &str) -> Option<String> {
        let rest = name.strip_prefix(self.event_prefix.as_str())?;
        let first = rest.chars().next()?;

        let prefix_is_word = self
            .event_prefix
            .chars()
            .last()
            .map_or(false, char::is_alphanumeric);
        if prefix_is_word && !first.is_uppercase() {
            return None;
        }

        Some(rest.to_lowercase())
    }
}
