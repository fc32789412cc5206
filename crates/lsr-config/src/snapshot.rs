//! Settings snapshots for report provenance.
//!
//! A snapshot records which reporter.json produced a report, so an
//! exported report can be traced back to its ancillary wording.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::resolve::{ConfigPaths, ConfigSource};
use crate::settings::ReporterSettings;

/// A frozen snapshot of settings state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Schema version of the settings.
    pub schema_version: String,

    /// SHA-256 of the settings file content, if one was loaded.
    #[serde(default)]
    pub settings_hash: Option<String>,

    #[serde(default)]
    pub settings_path: Option<String>,

    /// Source of the settings.
    pub settings_source: String,

    /// Hash over the effective settings (for quick comparison).
    pub effective_hash: String,

    /// Key values for quick reference.
    pub summary: SettingsSummary,
}

/// Summary of the effective settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsSummary {
    pub pending_placeholder: String,

    /// Report families with an overridden ancillary paragraph.
    pub ancillary_overrides: Vec<String>,

    pub export_file_name: String,
}

impl ConfigSnapshot {
    /// Create a new snapshot from loaded settings.
    pub fn new(settings: &ReporterSettings, paths: &ConfigPaths, settings_json: Option<&str>) -> Self {
        ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: settings.schema_version.clone(),
            settings_hash: settings_json.map(hash_content),
            settings_path: paths.settings.as_ref().map(|p| p.display().to_string()),
            settings_source: paths.settings_source.to_string(),
            effective_hash: effective_hash(settings),
            summary: SettingsSummary::from_settings(settings),
        }
    }

    /// Create a snapshot with only defaults (no settings file loaded).
    pub fn defaults_only() -> Self {
        let settings = ReporterSettings::default();
        ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            settings_hash: None,
            settings_path: None,
            settings_source: ConfigSource::BuiltinDefault.to_string(),
            effective_hash: effective_hash(&settings),
            summary: SettingsSummary::from_settings(&settings),
        }
    }

    /// Serialize snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check if this snapshot has the same effective settings as another.
    pub fn matches(&self, other: &ConfigSnapshot) -> bool {
        self.effective_hash == other.effective_hash
    }

    /// Get a short identifier for this snapshot (first 12 chars of hash).
    pub fn short_id(&self) -> &str {
        &self.effective_hash[..12.min(self.effective_hash.len())]
    }
}

impl SettingsSummary {
    fn from_settings(settings: &ReporterSettings) -> Self {
        SettingsSummary {
            pending_placeholder: settings.ancillary.pending_placeholder.clone(),
            ancillary_overrides: settings
                .ancillary
                .overrides()
                .into_iter()
                .map(|(name, _)| name.to_string())
                .collect(),
            export_file_name: settings.export.file_name.clone(),
        }
    }
}

/// Files with different whitespace but the same values hash the same.
fn effective_hash(settings: &ReporterSettings) -> String {
    match serde_json::to_string(settings) {
        Ok(json) => hash_content(&json),
        Err(_) => hash_content("unserializable"),
    }
}

/// Hash content with SHA-256 and return hex string.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
