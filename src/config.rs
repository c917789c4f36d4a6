use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, path::PathBuf};

use crate::inference::ClassifierConfig;
use crate::insights::InsightsConfig;
use crate::recorder::DwellConfig;

const DEFAULT_DB_PATH: &str = "homesense.sqlite3";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Service-wide settings. Built once at startup and handed to each component
/// by value; nothing reads configuration from ambient state after that.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub db_path: PathBuf,
    pub bind_addr: String,
    pub classifier: ClassifierConfig,
    pub insights: InsightsConfig,
    pub dwell: DwellConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            bind_addr: DEFAULT_BIND_ADDR.into(),
            classifier: ClassifierConfig::default(),
            insights: InsightsConfig::default(),
            dwell: DwellConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from an optional JSON file, then apply `HOMESENSE_*`
    /// environment overrides. A missing file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            _ => Self::default(),
        };
        settings.apply_overrides(|key| env::var(key).ok())?;
        Ok(settings)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db_path) = lookup("HOMESENSE_DB_PATH") {
            self.db_path = PathBuf::from(db_path);
        }
        if let Some(addr) = lookup("HOMESENSE_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(raw) = lookup("HOMESENSE_DWELL_SECS") {
            self.dwell.dwell_secs = raw
                .trim()
                .parse()
                .with_context(|| format!("HOMESENSE_DWELL_SECS is not a number: '{raw}'"))?;
        }
        if let Some(raw) = lookup("HOMESENSE_UTC_OFFSET_SECS") {
            self.insights.utc_offset_secs = raw
                .trim()
                .parse()
                .with_context(|| format!("HOMESENSE_UTC_OFFSET_SECS is not a number: '{raw}'"))?;
        }
        Ok(())
    }
}
