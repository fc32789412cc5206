//! Lymphoid synoptic reporter settings loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for reporter.json
//! - Config resolution (CLI → env → XDG → /etc → defaults)
//! - Semantic validation
//! - Config snapshots for JSON output provenance

pub mod resolve;
pub mod settings;
pub mod snapshot;
pub mod validate;

pub use resolve::{resolve_config, ConfigPaths, ConfigSource};
pub use settings::{AncillarySettings, ExportSettings, ReporterSettings};
pub use snapshot::ConfigSnapshot;
pub use validate::{validate_settings, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
