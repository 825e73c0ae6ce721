//! Toolbox configuration

use std::path::Path;

use jester_assets::{AssetLocatorSettings, LookupPolicy};
use jester_core::Tag;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolboxError};

/// Top-level toolbox settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolboxSettings {
    /// Asset locator contents. `None` leaves the asset subsystem empty.
    pub assets: Option<AssetLocatorSettings>,
    /// How configuration errors are reported
    pub lookup_policy: LookupPolicy,
    /// Ordered game-state initialization stages. Empty disables the sequencer.
    pub initialization_steps: Vec<Tag>,
}

impl ToolboxSettings {
    /// Parse settings from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ToolboxError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&text)?;
        log::info!("Loaded toolbox settings from {}", path.display());
        Ok(settings)
    }

    /// Set the asset locator contents
    pub fn with_assets(mut self, assets: AssetLocatorSettings) -> Self {
        self.assets = Some(assets);
        self
    }

    /// Set the lookup policy
    pub fn with_lookup_policy(mut self, policy: LookupPolicy) -> Self {
        self.lookup_policy = policy;
        self
    }

    /// Set the initialization stages
    pub fn with_initialization_steps(mut self, steps: impl IntoIterator<Item = Tag>) -> Self {
        self.initialization_steps = steps.into_iter().collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_fields_missing() {
        let settings = ToolboxSettings::from_json_str("{}").unwrap();
        assert!(settings.assets.is_none());
        assert!(settings.initialization_steps.is_empty());
        assert_eq!(settings.lookup_policy, LookupPolicy::default());
    }

    #[test]
    fn test_parse_full() {
        let settings = ToolboxSettings::from_json_str(
            r#"{
                "assets": { "levels": { "Level.Hub": "/Game/Maps/Hub" } },
                "lookup_policy": "lenient",
                "initialization_steps": ["Init.Boot", "Init.World"]
            }"#,
        )
        .unwrap();

        assert_eq!(settings.lookup_policy, LookupPolicy::Lenient);
        assert_eq!(settings.initialization_steps.len(), 2);
        assert_eq!(settings.initialization_steps[1].as_str(), "Init.World");
        assert_eq!(settings.assets.unwrap().levels.len(), 1);
    }

    #[test]
    fn test_invalid_tag_is_rejected() {
        let err = ToolboxSettings::from_json_str(r#"{ "initialization_steps": ["Init..Boot"] }"#)
            .unwrap_err();
        assert!(matches!(err, ToolboxError::Json(_)));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "initialization_steps": ["A", "B", "C"] }}"#).unwrap();

        let settings = ToolboxSettings::load(file.path()).unwrap();
        assert_eq!(settings.initialization_steps.len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ToolboxSettings::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ToolboxError::Io { .. }));
    }
}
