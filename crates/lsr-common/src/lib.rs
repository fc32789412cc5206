//! Lymphoid synoptic reporter common types and errors.
//!
//! This crate provides foundational types shared across lsr-core modules:
//! - Form field identifiers and their kinds
//! - The findings set and the field-source seam used by composers
//! - Diagnosis path and branch selection
//! - Common error types
//! - Output formats

pub mod diagnosis;
pub mod error;
pub mod field;
pub mod findings;
pub mod output;

pub use diagnosis::{
    BCellSubtype, DiagnosisBranch, DiagnosisPath, HodgkinSubtype, LymphomaFamily, ProcessType,
};
pub use error::{format_error_human, Error, ErrorCategory, Result, StructuredError, SuggestedAction};
pub use field::{FieldGroup, FieldId, FieldKind, FieldValue};
pub use findings::{parse_assignment, FieldEntry, FindingsDocument, FindingsSet, FormFieldSource};
pub use output::OutputFormat;

/// Schema version for findings documents and JSON output envelopes.
pub const SCHEMA_VERSION: &str = "1.0.0";
