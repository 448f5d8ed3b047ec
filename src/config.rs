use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Settings for a [`PostStore`](crate::PostStore).
///
/// ```
/// use post_store::StoreConfig;
///
/// let config = StoreConfig::from_json(r#"{ "skip_unchanged": true }"#).unwrap();
/// assert_eq!(config.name, "posts");
/// assert!(config.skip_unchanged);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Label attached to the store's log events.
    pub name: String,
    /// Skip the notification when `set` receives a collection equal to
    /// the current one.
    pub skip_unchanged: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "posts".to_string(),
            skip_unchanged: false,
        }
    }
}

impl StoreConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(input: &str) -> Result<Self> {
        let config: StoreConfig =
            serde_json::from_str(input).map_err(|e| StoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(StoreError::Config("name must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = StoreConfig::from_json("{}").unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn rejects_blank_name() {
        let err = StoreConfig::from_json(r#"{ "name": "  " }"#).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = StoreConfig::from_json("{ name").unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }
}
