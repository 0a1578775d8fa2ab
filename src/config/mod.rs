use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

use crate::schedule::AliasMap;

/// User preferences: the dark-mode flag and the alias group definitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default = "AliasMap::default")]
    pub aliases: AliasMap,
}

impl Preferences {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read preferences file")?;
            serde_json::from_str(&contents).context("Failed to parse preferences file")
        } else {
            Ok(Self::default())
        }
    }

    /// Startup never fails on a bad preferences file; it degrades to the
    /// defaults and reports.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            warn!(error = %e, "using default preferences");
            Self::default()
        })
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "weekplan", "weekplan")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_alias_map_falls_back_to_defaults() {
        let prefs: Preferences = serde_json::from_str(r#"{ "dark_mode": true }"#).unwrap();
        assert!(prefs.dark_mode);
        assert_eq!(prefs.aliases.resolve("Monday"), "MW");
    }

    #[test]
    fn explicit_alias_map_is_respected() {
        let prefs: Preferences = serde_json::from_str(
            r#"{ "dark_mode": false, "aliases": { "WE": ["Saturday", "Sunday"] } }"#,
        )
        .unwrap();
        assert_eq!(prefs.aliases.resolve("Saturday"), "WE");
        assert_eq!(prefs.aliases.resolve("Monday"), "Monday");
    }
}
