//! Settings validation errors and semantic validation.

use thiserror::Error;

use crate::settings::ReporterSettings;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Settings validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate reporter settings semantically.
pub fn validate_settings(settings: &ReporterSettings) -> ValidationResult<()> {
    if settings.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: settings.schema_version.clone(),
        });
    }

    if settings.ancillary.pending_placeholder.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "ancillary.pending_placeholder".to_string(),
            message: "must not be blank".to_string(),
        });
    }

    for (name, text) in settings.ancillary.overrides() {
        if text.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("ancillary.{}", name),
                message: "override must not be blank; omit it to keep the built-in text"
                    .to_string(),
            });
        }
    }

    validate_file_name(&settings.export.file_name)
}

/// Export file names are bare names; directories come from the caller.
fn validate_file_name(name: &str) -> ValidationResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "export.file_name".to_string(),
            message: "must not be blank".to_string(),
        });
    }

    if trimmed.contains('/') || trimmed.contains('\\') || trimmed == "." || trimmed == ".." {
        return Err(ValidationError::InvalidValue {
            field: "export.file_name".to_string(),
            message: format!("'{}' must be a file name, not a path", name),
        });
    }

    Ok(())
}
