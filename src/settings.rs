use std::{fs, path::PathBuf, sync::RwLock, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::FrameSize;
use crate::tracking::{camera_name, DEFAULT_SAMPLE_RATE_HZ};

/// Overrides `api_base_url` when set.
pub const API_URL_ENV: &str = "LEMUR_REVIEW_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewSettings {
    pub api_base_url: String,
    pub fetch_timeout_secs: u64,
    /// Used when the coordinate feed does not report its own rate.
    pub sample_rate_hz: u32,
    /// Used when the coordinate feed does not report its own frame size.
    pub reference_frame: FrameSize,
    pub cameras: Vec<String>,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5055".into(),
            fetch_timeout_secs: 30,
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            reference_frame: FrameSize::REFERENCE,
            cameras: (0..3).map(camera_name).collect(),
        }
    }
}

impl ReviewSettings {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }

    /// The configured rate, or the default when it is zero.
    pub fn sample_rate_hz(&self) -> u32 {
        if self.sample_rate_hz == 0 {
            DEFAULT_SAMPLE_RATE_HZ
        } else {
            self.sample_rate_hz
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<ReviewSettings>,
}

impl SettingsStore {
    /// Load from `path`; a missing or unreadable-as-JSON file falls back to defaults.
    pub fn new(path: PathBuf) -> Result<Self> {
        let mut data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!(
                    "Ignoring malformed settings at {}: {err}",
                    path.display()
                );
                ReviewSettings::default()
            })
        } else {
            ReviewSettings::default()
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                data.api_base_url = url.trim().to_string();
            }
        }

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn get(&self) -> ReviewSettings {
        self.data.read().unwrap().clone()
    }

    pub fn update(&self, settings: ReviewSettings) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        *guard = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &ReviewSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        let settings = store.get();

        assert_eq!(settings.sample_rate_hz, 15);
        assert_eq!(settings.reference_frame, FrameSize::new(640.0, 480.0));
        assert_eq!(settings.cameras, vec!["Camera1", "Camera2", "Camera3"]);
        assert_eq!(settings.fetch_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_update_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = SettingsStore::new(path.clone()).unwrap();

        let mut settings = store.get();
        settings.fetch_timeout_secs = 5;
        settings.cameras = vec!["Camera1".into()];
        store.update(settings.clone()).unwrap();

        let reloaded = SettingsStore::new(path).unwrap().get();
        assert_eq!(reloaded.fetch_timeout_secs, 5);
        assert_eq!(reloaded.cameras, vec!["Camera1"]);
    }

    #[test]
    fn test_partial_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();

        let partial = dir.path().join("partial.json");
        fs::write(&partial, r#"{"sample_rate_hz": 30}"#).unwrap();
        let settings = SettingsStore::new(partial).unwrap().get();
        assert_eq!(settings.sample_rate_hz, 30);
        assert_eq!(settings.fetch_timeout_secs, 30);

        let zero_rate = dir.path().join("zero_rate.json");
        fs::write(&zero_rate, r#"{"sample_rate_hz": 0}"#).unwrap();
        let settings = SettingsStore::new(zero_rate).unwrap().get();
        assert_eq!(settings.sample_rate_hz, 0);
        assert_eq!(settings.sample_rate_hz(), DEFAULT_SAMPLE_RATE_HZ);

        let corrupt = dir.path().join("corrupt.json");
        fs::write(&corrupt, "{ not json").unwrap();
        assert_eq!(
            SettingsStore::new(corrupt).unwrap().get().sample_rate_hz,
            DEFAULT_SAMPLE_RATE_HZ
        );
    }
}
