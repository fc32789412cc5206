//! Reporter errors.
//!
//! Every [`Error`] has a stable numeric code (10s input, 20s config, 30s
//! export, 40s I/O) and a category. Humans get a headline plus a fix hint
//! via [`format_error_human`]:
//!
//! ```text
//! ✗ Missing Required Selection
//!   Reason: missing required selection: process-type
//!   Fix: Select a process type (reactive or lymphoproliferative) before generating.
//! ```
//!
//! Tools get a [`StructuredError`]:
//!
//! ```json
//! {
//!   "code": 10,
//!   "category": "input",
//!   "message": "missing required selection: process-type",
//!   "recoverable": true,
//!   "suggested_action": "select_field",
//!   "context": { "field": "process-type" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Result type alias for reporter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse grouping of error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Form input errors (missing selections, unknown fields).
    Input,
    /// Settings file errors.
    Config,
    /// Report export errors.
    Export,
    /// Reading files, parsing findings JSON.
    Io,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Input => "input",
            ErrorCategory::Config => "config",
            ErrorCategory::Export => "export",
            ErrorCategory::Io => "io",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suggested follow-up for callers driving the reporter programmatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Make the named selection on the form.
    SelectField,
    /// Correct the supplied input.
    FixInput,
    /// Run configuration validation.
    RunCheck,
    /// Generate a report before exporting.
    GenerateFirst,
    /// Retry the operation.
    Retry,
    /// The input has to be fixed at its source.
    ManualIntervention,
}

impl SuggestedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestedAction::SelectField => "select_field",
            SuggestedAction::FixInput => "fix_input",
            SuggestedAction::RunCheck => "run_check",
            SuggestedAction::GenerateFirst => "generate_first",
            SuggestedAction::Retry => "retry",
            SuggestedAction::ManualIntervention => "manual_intervention",
        }
    }
}

impl fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn found_suffix(found: &Option<String>) -> String {
    match found {
        Some(value) => format!(" (unrecognized value '{}')", value),
        None => String::new(),
    }
}

/// Unified error type for the reporter.
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (10-19)
    #[error("missing required selection: {field}{}", found_suffix(.found))]
    MissingRequiredSelection {
        field: &'static str,
        found: Option<String>,
    },

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("invalid field assignment '{0}': expected key=value")]
    InvalidAssignment(String),

    #[error("field {0} is derived and cannot be set directly")]
    DerivedField(String),

    // Configuration errors (20-29)
    #[error("configuration error: {0}")]
    Config(String),

    // Export errors (30-39)
    #[error("no report to export; generate a report first")]
    EmptyReport,

    // I/O errors (40-49)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Stable numeric code.
    pub fn code(&self) -> u32 {
        match self {
            Error::MissingRequiredSelection { .. } => 10,
            Error::UnknownField(_) => 11,
            Error::InvalidAssignment(_) => 12,
            Error::DerivedField(_) => 13,
            Error::Config(_) => 20,
            Error::EmptyReport => 30,
            Error::Io(_) => 40,
            Error::Json(_) => 41,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::MissingRequiredSelection { .. }
            | Error::UnknownField(_)
            | Error::InvalidAssignment(_)
            | Error::DerivedField(_) => ErrorCategory::Input,

            Error::Config(_) => ErrorCategory::Config,

            Error::EmptyReport => ErrorCategory::Export,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// A malformed findings document has to be fixed by whoever produced
    /// it; everything else can be corrected from the command line.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Json(_))
    }

    pub fn suggested_action(&self) -> SuggestedAction {
        match self {
            Error::MissingRequiredSelection { .. } => SuggestedAction::SelectField,
            Error::UnknownField(_) => SuggestedAction::FixInput,
            Error::InvalidAssignment(_) => SuggestedAction::FixInput,
            Error::DerivedField(_) => SuggestedAction::FixInput,
            Error::Config(_) => SuggestedAction::RunCheck,
            Error::EmptyReport => SuggestedAction::GenerateFirst,
            Error::Io(_) => SuggestedAction::Retry,
            Error::Json(_) => SuggestedAction::ManualIntervention,
        }
    }

    /// One-line fix hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::MissingRequiredSelection { .. } => {
                "Select a process type (reactive or lymphoproliferative) before generating."
            }
            Error::UnknownField(_) => {
                "Run 'lsr-core fields' to list the recognized form field keys."
            }
            Error::InvalidAssignment(_) => {
                "Use --set key=value, or key=value|display text to supply the option text."
            }
            Error::DerivedField(_) => {
                "Set the underlying marker fields; classification fields are recomputed."
            }
            Error::Config(_) => {
                "Run 'lsr-core config validate' to check reporter.json, or remove it to use defaults."
            }
            Error::EmptyReport => "Generate a report before exporting it.",
            Error::Io(_) => "Check the path, permissions, and free disk space, then retry.",
            Error::Json(_) => {
                "Invalid findings JSON. Check syntax and field keys against 'lsr-core schema FindingsDocument'."
            }
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Error::MissingRequiredSelection { .. } => "Missing Required Selection",
            Error::UnknownField(_) => "Unknown Field",
            Error::InvalidAssignment(_) => "Invalid Field Assignment",
            Error::DerivedField(_) => "Read-Only Field",
            Error::Config(_) => "Configuration Error",
            Error::EmptyReport => "Nothing To Export",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }
}

/// Error payload for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    pub code: u32,
    pub category: ErrorCategory,
    pub message: String,
    pub recoverable: bool,
    pub suggested_action: SuggestedAction,

    /// Extra keys such as the offending field.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = BTreeMap::new();
        match err {
            Error::MissingRequiredSelection { field, found } => {
                context.insert("field".to_string(), (*field).into());
                if let Some(value) = found {
                    context.insert("found".to_string(), value.as_str().into());
                }
            }
            Error::UnknownField(key) | Error::DerivedField(key) => {
                context.insert("field".to_string(), key.as_str().into());
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action(),
            context,
        }
    }
}

impl StructuredError {
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.context.insert(key.into(), value);
        }
        self
    }

    /// Compact JSON; falls back to a code-only object.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| format!(r#"{{"code":{}}}"#, self.code))
    }
}

/// Three-line stderr rendering: headline, reason, fix.
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let paint = |code: &str, text: &str| {
        if use_color {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    };

    format!(
        "{} {}\n  Reason: {}\n  {} {}",
        paint("31", "✗"),
        err.headline(),
        err,
        paint("36", "Fix:"),
        err.remediation()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing() -> Error {
        Error::MissingRequiredSelection {
            field: "process-type",
            found: None,
        }
    }

    #[test]
    fn test_error_code() {
        assert_eq!(missing().code(), 10);
        assert_eq!(Error::UnknownField("x".into()).code(), 11);
        assert_eq!(Error::EmptyReport.code(), 30);
    }

    #[test]
    fn test_categories() {
        assert_eq!(missing().category(), ErrorCategory::Input);
        assert_eq!(Error::Config("bad".into()).category(), ErrorCategory::Config);
        assert_eq!(Error::EmptyReport.category(), ErrorCategory::Export);
    }

    #[test]
    fn test_missing_selection_message() {
        assert_eq!(missing().to_string(), "missing required selection: process-type");

        let unrecognized = Error::MissingRequiredSelection {
            field: "process-type",
            found: Some("neoplastic".into()),
        };
        assert_eq!(
            unrecognized.to_string(),
            "missing required selection: process-type (unrecognized value 'neoplastic')"
        );
    }

    #[test]
    fn test_structured_missing_selection() {
        let structured = StructuredError::from(&missing());

        assert_eq!(structured.code, 10);
        assert_eq!(structured.category, ErrorCategory::Input);
        assert!(structured.recoverable);
        assert_eq!(structured.suggested_action, SuggestedAction::SelectField);
        assert_eq!(
            structured.context.get("field"),
            Some(&serde_json::json!("process-type"))
        );
    }

    #[test]
    fn test_structured_empty_report_json() {
        let structured = StructuredError::from(&Error::EmptyReport);
        let json = structured.to_json();

        assert!(json.contains(r#""code":30"#));
        assert!(json.contains(r#""category":"export""#));
        assert!(json.contains(r#""suggested_action":"generate_first""#));
    }

    #[test]
    fn test_human_rendering() {
        let formatted = format_error_human(&missing(), false);

        assert!(formatted.contains("Missing Required Selection"));
        assert!(formatted.contains("missing required selection: process-type"));
        assert!(formatted.contains("Select a process type"));
    }

    #[test]
    fn test_display_matches_serde() {
        for action in [SuggestedAction::SelectField, SuggestedAction::GenerateFirst] {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{action}\""));
        }
        let json = serde_json::to_string(&ErrorCategory::Export).unwrap();
        assert_eq!(json, format!("\"{}\"", ErrorCategory::Export));
    }

    #[test]
    fn test_only_malformed_json_is_unrecoverable() {
        assert!(Error::EmptyReport.is_recoverable());
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!Error::Json(bad).is_recoverable());
    }

    #[test]
    fn test_color_codes_only_when_requested() {
        assert!(format_error_human(&Error::EmptyReport, true).contains("\x1b[31m"));
        assert!(!format_error_human(&Error::EmptyReport, false).contains('\x1b'));
    }
}
