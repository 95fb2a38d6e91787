use crate::statics;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Remembered between runs: the last config file that was opened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_path: Option<PathBuf>,
}

impl Settings {
    pub fn default_location() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(statics::SETTINGS_FILE_NAME))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {path:?}"))
    }

    /// Missing or unreadable settings fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path.filter(|p| p.exists()) else {
            return Self::default();
        };
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "ignoring unreadable settings file");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing settings")?;
        fs::write(path, json).with_context(|| format!("writing {path:?}"))
    }

    /// The path to open at startup.
    pub fn last_known_path(&self) -> PathBuf {
        self.config_path
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(statics::DEFAULT_CONFIG_PATH))
    }
}

#[cfg(test)]
mod tests {
    use super::Settings;
    use crate::statics;
    use std::path::PathBuf;

    #[test]
    fn roundtrip_and_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        assert_eq!(Settings::load_or_default(Some(path.as_path())), Settings::default());
        assert_eq!(
            Settings::default().last_known_path(),
            PathBuf::from(statics::DEFAULT_CONFIG_PATH)
        );

        let settings = Settings {
            config_path: Some(dir.path().join("serverconfig.xml")),
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_or_default(Some(path.as_path())), settings);

        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_or_default(Some(path.as_path())), Settings::default());
    }

    #[test]
    fn reads_original_settings_shape() {
        let settings: Settings =
            serde_json::from_str(r#"{ "config_path": "/srv/7d2d/serverconfig.xml" }"#).unwrap();
        assert_eq!(
            settings.last_known_path(),
            PathBuf::from("/srv/7d2d/serverconfig.xml")
        );
    }
}
