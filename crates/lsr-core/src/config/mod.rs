//! Reporter settings loading for lsr-core.
//!
//! Resolution and validation live in lsr-config; this module ties them
//! together and keeps the provenance needed for JSON output.

pub use lsr_config::settings;
pub use lsr_config::{
    validate_settings, AncillarySettings, ConfigPaths, ConfigSnapshot, ConfigSource,
    ExportSettings, ReporterSettings, ValidationError, CONFIG_SCHEMA_VERSION,
};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during settings loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Semantic validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

/// Settings with provenance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub settings: ReporterSettings,
    pub paths: ConfigPaths,
    pub snapshot: ConfigSnapshot,
}

impl ResolvedConfig {
    /// Built-in settings, no file consulted.
    pub fn defaults() -> Self {
        ResolvedConfig {
            settings: ReporterSettings::default(),
            paths: ConfigPaths::default(),
            snapshot: ConfigSnapshot::defaults_only(),
        }
    }

    pub fn from_default(&self) -> bool {
        self.paths.settings.is_none()
    }
}

/// Settings resolution options.
#[derive(Debug, Default)]
pub struct ConfigOptions {
    /// Explicit reporter.json path (highest priority).
    pub settings_path: Option<PathBuf>,
}

/// Load settings with the standard resolution order.
///
/// An explicit path that does not exist is an error rather than a silent
/// fall back to defaults.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    if let Some(path) = &options.settings_path {
        if !path.exists() {
            return Err(ConfigError::NotFound { path: path.clone() });
        }
    }

    let paths = lsr_config::resolve_config(options.settings_path.as_deref());
    let Some(path) = paths.settings.clone() else {
        return Ok(ResolvedConfig::defaults());
    };

    let (settings, content) = load_settings_from_file(&path)?;
    let snapshot = ConfigSnapshot::new(&settings, &paths, Some(&content));
    Ok(ResolvedConfig {
        settings,
        paths,
        snapshot,
    })
}

/// Read, parse and validate a single settings file.
///
/// Returns the settings and the raw file content.
pub fn load_settings_from_file(path: &Path) -> Result<(ReporterSettings, String), ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let settings: ReporterSettings =
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

    if settings.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(ConfigError::VersionMismatch {
            expected: CONFIG_SCHEMA_VERSION.to_string(),
            actual: settings.schema_version.clone(),
        });
    }

    validate_settings(&settings)?;
    Ok((settings, content))
}

impl From<&ConfigError> for lsr_common::Error {
    fn from(err: &ConfigError) -> Self {
        lsr_common::Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_explicit_path_loads() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "reporter.json",
            r#"{"schema_version": "1.0.0", "export": {"file_name": "case.txt"}}"#,
        );
        let config = load_config(&ConfigOptions {
            settings_path: Some(path.clone()),
        })
        .unwrap();

        assert_eq!(config.settings.export.file_name, "case.txt");
        assert_eq!(config.paths.settings, Some(path));
        assert_eq!(config.paths.settings_source, ConfigSource::CliArgument);
        assert!(config.snapshot.settings_hash.is_some());
        assert!(!config.from_default());
    }

    #[test]
    fn test_explicit_missing_path_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_config(&ConfigOptions {
            settings_path: Some(dir.path().join("nope.json")),
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_version_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "old.json", r#"{"schema_version": "0.9.0"}"#);
        let err = load_settings_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::VersionMismatch { .. }));
    }

    #[test]
    fn test_semantic_error_surfaces() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "bad.json",
            r#"{"schema_version": "1.0.0", "export": {"file_name": "../escape.txt"}}"#,
        );
        let err = load_settings_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "broken.json", "{ not json");
        let err = load_settings_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        let common: lsr_common::Error = (&err).into();
        assert_eq!(common.code(), 20);
    }
}
