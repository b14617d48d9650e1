use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where position fixes come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    /// `termux-location` from Termux:API
    Termux,
    /// Deterministic drifting fix, for machines without a location provider
    Simulated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionSettings {
    pub location: bool,
    pub media_library: bool,
}

impl Default for PermissionSettings {
    fn default() -> Self {
        Self {
            location: true,
            media_library: true,
        }
    }
}

/// Runtime settings, read from an optional JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub port: u16,
    pub documents_dir: PathBuf,
    pub media_root: PathBuf,
    pub sensor: SensorKind,
    pub permissions: PermissionSettings,
    /// Give up on a fix after this many seconds; unset waits indefinitely
    pub fix_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 8081,
            documents_dir: PathBuf::from("location_logger_documents"),
            media_root: PathBuf::from("location_logger_media"),
            sensor: SensorKind::Termux,
            permissions: PermissionSettings::default(),
            fix_timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid settings in {}", path.display()))
    }

    pub fn fix_timeout(&self) -> Option<Duration> {
        self.fix_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}
