//! User settings.
//!
//! Stored as TOML in the platform config directory. Missing or malformed
//! files fall back to defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use srs_persistence::{AutoSaveConfig, DEFAULT_SLOT_KEY, FileStorage, SnapshotStore};

// =============================================================================
// ROOT SETTINGS
// =============================================================================

/// Application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where progress is stored and how long it stays valid.
    pub storage: StorageSettings,

    /// Debounced auto-save.
    pub autosave: AutoSaveConfig,

    /// Bundle loading.
    pub ingest: IngestSettings,
}

impl Settings {
    /// Load settings from `path`, or from the default location.
    pub fn load(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load_from(&Self::config_path()),
        }
    }

    /// Load settings from a specific path.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        toml::from_str(&content).unwrap_or_else(|error| {
            tracing::warn!(path = %path.display(), %error, "Ignoring malformed settings");
            Self::default()
        })
    }

    /// Get the default config file path.
    pub fn config_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }

    /// Open the progress store these settings describe.
    pub fn open_store(&self) -> SnapshotStore<FileStorage> {
        SnapshotStore::new(FileStorage::new(self.storage.resolved_dir()))
            .with_key(self.storage.key.clone())
            .with_expiry(self.storage.expiry())
    }
}

// =============================================================================
// STORAGE
// =============================================================================

/// Progress storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding the progress file. Defaults to the platform data
    /// directory.
    pub dir: Option<PathBuf>,

    /// Name of the progress slot.
    pub key: String,

    /// Days before stored progress expires.
    pub expiry_days: u64,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            dir: None,
            key: DEFAULT_SLOT_KEY.to_string(),
            expiry_days: 7,
        }
    }
}

impl StorageSettings {
    /// The configured directory, or the platform default.
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from(".star-rating-studio"))
    }

    pub fn expiry(&self) -> Duration {
        Duration::from_secs(self.expiry_days.saturating_mul(24 * 60 * 60))
    }
}

// =============================================================================
// INGEST
// =============================================================================

/// Bundle loading settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    /// Shuffle images on a fresh load instead of sorting them by path.
    pub shuffle: bool,
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "StarRatingStudio", "StarRatingStudio")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.storage.key, DEFAULT_SLOT_KEY);
        assert_eq!(settings.storage.expiry(), Duration::from_secs(7 * 24 * 60 * 60));
        assert!(settings.autosave.enabled);
        assert_eq!(settings.autosave.debounce_ms, 2000);
        assert!(!settings.ingest.shuffle);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [autosave]
            debounce_ms = 500

            [ingest]
            shuffle = true
            "#,
        )
        .unwrap();
        assert_eq!(settings.autosave.debounce_ms, 500);
        assert!(settings.autosave.enabled);
        assert!(settings.ingest.shuffle);
        assert_eq!(settings.storage, StorageSettings::default());
    }

    #[test]
    fn test_configured_dir_wins() {
        let storage = StorageSettings {
            dir: Some(PathBuf::from("/tmp/progress")),
            ..StorageSettings::default()
        };
        assert_eq!(storage.resolved_dir(), PathBuf::from("/tmp/progress"));
    }
}
