//! Settings loaded from the user's config directory, then overridden by
//! environment variables:
//! - `COURSEPACK_MIN_CONFIDENCE` - confidence gate for recommended templates
//! - `COURSEPACK_DB` - SQLite database path (switches the store to `sqlite`)
//! - `COURSEPACK_SAMPLE_BYTES` - how much of each text file is sampled for rules

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

use coursepack_core::rules::FamilyRules;

const APP_NAME: &str = "coursepack";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Recommendations below this confidence fall back to `contentreveal`.
    pub min_confidence: u8,
    /// Bytes sampled from each text file for content rules.
    pub sample_bytes: usize,
    /// Extensions (without dot) whose content is sampled.
    pub text_extensions: Vec<String>,
    pub store: StoreKind,
    /// SQLite database location. Defaults to the platform data directory.
    pub database_path: Option<PathBuf>,
    /// Extra rule sets merged over the built-in table at start-up.
    pub rules: Vec<FamilyRules>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_confidence: 60,
            sample_bytes: 4096,
            text_extensions: ["html", "htm", "xml", "json", "js", "txt"]
                .into_iter()
                .map(String::from)
                .collect(),
            store: StoreKind::Memory,
            database_path: None,
            rules: Vec::new(),
        }
    }
}

impl Settings {
    /// Load from the config directory and apply environment overrides.
    /// Falls back to defaults when the file is missing or unreadable.
    pub fn load() -> Self {
        let settings = match get_config_path().and_then(|p| Self::load_from(&p)) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to load settings, using defaults: {:#}", e);
                Self::default()
            }
        };
        settings.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Read a settings file. A missing file yields defaults.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).context("Failed to read settings file")?;
        let settings = serde_json::from_str(&content).context("Failed to parse settings file")?;
        Ok(settings)
    }

    /// Apply overrides from `lookup` (the process environment in production).
    /// Unparsable values are ignored with a warning.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup("COURSEPACK_MIN_CONFIDENCE") {
            match raw.trim().parse::<u8>() {
                Ok(v) if v <= 100 => self.min_confidence = v,
                _ => tracing::warn!("Ignoring COURSEPACK_MIN_CONFIDENCE={:?}", raw),
            }
        }
        if let Some(raw) = lookup("COURSEPACK_SAMPLE_BYTES") {
            match raw.trim().parse::<usize>() {
                Ok(v) => self.sample_bytes = v,
                Err(_) => tracing::warn!("Ignoring COURSEPACK_SAMPLE_BYTES={:?}", raw),
            }
        }
        if let Some(path) = lookup("COURSEPACK_DB").filter(|p| !p.trim().is_empty()) {
            self.database_path = Some(PathBuf::from(path));
            self.store = StoreKind::Sqlite;
        }
        self
    }
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
