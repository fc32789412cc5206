//! JSON Schema generation for documents the reporter reads and writes.
//!
//! ```bash
//! lsr-core schema                   # FindingsDocument
//! lsr-core schema Report
//! lsr-core schema --list
//! ```

use schemars::schema_for;
use serde_json::Value;
use std::collections::BTreeMap;

pub use crate::classify::ClassificationResult;
pub use crate::compose::Report;
pub use lsr_common::FindingsDocument;
pub use lsr_config::ReporterSettings;

/// Schema printed when no name is given.
pub const DEFAULT_SCHEMA: &str = "FindingsDocument";

/// Available schema types with their descriptions.
pub fn available_schemas() -> Vec<(&'static str, &'static str)> {
    vec![
        ("FindingsDocument", "Form findings input (field key to value)"),
        ("Report", "Generated report with diagnosis path and classification"),
        ("ClassificationResult", "Hans, co-expression and hit status"),
        ("ReporterSettings", "reporter.json settings file"),
    ]
}

/// Generate JSON Schema for a type by name.
///
/// Returns None if the type is unknown.
pub fn generate_schema(type_name: &str) -> Option<Value> {
    let schema = match type_name {
        "FindingsDocument" => schema_for!(FindingsDocument),
        "Report" => schema_for!(Report),
        "ClassificationResult" => schema_for!(ClassificationResult),
        "ReporterSettings" => schema_for!(ReporterSettings),
        _ => return None,
    };

    serde_json::to_value(schema).ok()
}

/// Generate all schemas as a map from type name to schema.
pub fn generate_all_schemas() -> BTreeMap<String, Value> {
    available_schemas()
        .into_iter()
        .filter_map(|(name, _)| generate_schema(name).map(|s| (name.to_string(), s)))
        .collect()
}

/// Pretty-printed schema text.
pub fn format_schema(schema: &Value) -> String {
    serde_json::to_string_pretty(schema).unwrap_or_else(|_| schema.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_schemas_generate() {
        for (name, _desc) in available_schemas() {
            assert!(generate_schema(name).is_some(), "Schema for '{}' should generate", name);
        }
    }

    #[test]
    fn test_unknown_schema_returns_none() {
        assert!(generate_schema("Plan").is_none());
        assert!(generate_schema("").is_none());
    }

    #[test]
    fn test_findings_schema_has_fields() {
        let schema = format_schema(&generate_schema(DEFAULT_SCHEMA).unwrap());
        assert!(schema.contains("\"fields\""));
        assert!(schema.contains('\n'));
    }

    #[test]
    fn test_generate_all_schemas() {
        let all = generate_all_schemas();
        assert_eq!(all.len(), available_schemas().len());
        assert!(all.contains_key("Report"));
    }
}
