//! Reporter settings (reporter.json).
//!
//! Every field has a built-in default, so an absent file and an empty
//! object `{"schema_version": "1.0.0"}` produce the same reports.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::validate::ValidationError;

/// Placeholder printed where concurrent flow cytometry results are pending.
pub const DEFAULT_PENDING_PLACEHOLDER: &str = "----------";

/// File name suggested for exported reports.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "lymphoid_biopsy_report.txt";

/// Top-level reporter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReporterSettings {
    pub schema_version: String,

    #[serde(default)]
    pub ancillary: AncillarySettings,

    #[serde(default)]
    pub export: ExportSettings,
}

/// Overrides for the concurrent ancillary testing paragraph.
///
/// `None` keeps the built-in sentence for that report family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AncillarySettings {
    /// Text standing in for pending flow cytometry results.
    #[serde(default = "default_pending_placeholder")]
    pub pending_placeholder: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reactive: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follicular: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dlbcl: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_cell: Option<String>,

    /// Shared by classical and nodular lymphocyte predominant reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hodgkin: Option<String>,
}

/// Report export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExportSettings {
    /// File name used when exporting into a directory.
    #[serde(default = "default_export_file_name")]
    pub file_name: String,
}

fn default_pending_placeholder() -> String {
    DEFAULT_PENDING_PLACEHOLDER.to_string()
}

fn default_export_file_name() -> String {
    DEFAULT_EXPORT_FILE_NAME.to_string()
}

impl Default for ReporterSettings {
    fn default() -> Self {
        ReporterSettings {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            ancillary: AncillarySettings::default(),
            export: ExportSettings::default(),
        }
    }
}

impl Default for AncillarySettings {
    fn default() -> Self {
        AncillarySettings {
            pending_placeholder: default_pending_placeholder(),
            reactive: None,
            follicular: None,
            dlbcl: None,
            t_cell: None,
            hodgkin: None,
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            file_name: default_export_file_name(),
        }
    }
}

impl AncillarySettings {
    /// Overrides that are set, as (name, text) pairs.
    pub fn overrides(&self) -> Vec<(&'static str, &str)> {
        [
            ("reactive", &self.reactive),
            ("follicular", &self.follicular),
            ("dlbcl", &self.dlbcl),
            ("t_cell", &self.t_cell),
            ("hodgkin", &self.hodgkin),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
        .collect()
    }
}

impl ReporterSettings {
    /// Load settings from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Parse settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_file_uses_defaults() {
        let settings = ReporterSettings::from_json(r#"{"schema_version": "1.0.0"}"#).unwrap();
        assert_eq!(settings, ReporterSettings::default());
        assert_eq!(settings.ancillary.pending_placeholder, "----------");
        assert_eq!(settings.export.file_name, "lymphoid_biopsy_report.txt");
    }

    #[test]
    fn test_partial_ancillary_overrides() {
        let settings = ReporterSettings::from_json(
            r#"{"schema_version": "1.0.0", "ancillary": {"dlbcl": "Flow pending."}}"#,
        )
        .unwrap();
        assert_eq!(settings.ancillary.dlbcl.as_deref(), Some("Flow pending."));
        assert_eq!(settings.ancillary.pending_placeholder, "----------");
        assert_eq!(settings.ancillary.overrides(), vec![("dlbcl", "Flow pending.")]);
    }

    #[test]
    fn test_missing_schema_version_is_parse_error() {
        let err = ReporterSettings::from_json("{}").unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
    }

    #[test]
    fn test_json_roundtrip_keeps_defaults() {
        let settings = ReporterSettings::default();
        let json = settings.to_json().unwrap();
        assert!(!json.contains("reactive"));
        assert_eq!(ReporterSettings::from_json(&json).unwrap(), settings);
    }
}
