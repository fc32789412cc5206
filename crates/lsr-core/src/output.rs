//! Rendering of command payloads for each [`OutputFormat`].
//!
//! Renderers return the text destined for stdout; `None` means print
//! nothing (`exitcode`).

use chrono::{DateTime, Utc};
use lsr_common::{FieldId, OutputFormat, SCHEMA_VERSION};
use lsr_config::snapshot::hash_content;
use lsr_config::ConfigSnapshot;
use serde::Serialize;

use crate::classify::ClassificationResult;
use crate::compose::Report;

/// Per-invocation data stamped on JSON output.
#[derive(Debug, Clone)]
pub struct OutputContext {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub config: ConfigSnapshot,
}

impl OutputContext {
    pub fn new(run_id: impl Into<String>, config: ConfigSnapshot) -> Self {
        OutputContext {
            run_id: run_id.into(),
            generated_at: Utc::now(),
            config,
        }
    }
}

/// JSON envelope for `generate`.
#[derive(Debug, Serialize)]
pub struct ReportEnvelope<'a> {
    pub schema_version: &'static str,
    pub generated_at: String,
    pub run_id: &'a str,
    pub report: &'a Report,
    /// SHA-256 of the report text; absent for an empty body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported_to: Option<String>,
    pub config: &'a ConfigSnapshot,
}

fn to_pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|_| r#"{"error":"serialization_failed"}"#.to_string())
}

/// Render a generated report.
pub fn render_report(
    report: &Report,
    exported_to: Option<&std::path::Path>,
    format: OutputFormat,
    ctx: &OutputContext,
) -> Option<String> {
    match format {
        OutputFormat::Text => Some(report.text.clone()),
        OutputFormat::Json => {
            let envelope = ReportEnvelope {
                schema_version: SCHEMA_VERSION,
                generated_at: ctx.generated_at.to_rfc3339(),
                run_id: &ctx.run_id,
                report,
                report_sha256: (!report.is_empty()).then(|| hash_content(&report.text)),
                exported_to: exported_to.map(|p| p.display().to_string()),
                config: &ctx.config,
            };
            Some(to_pretty(&envelope))
        }
        OutputFormat::Md => Some(report_markdown(report)),
        OutputFormat::Summary => Some(report_summary(report, exported_to, &ctx.run_id)),
        OutputFormat::Exitcode => None,
    }
}

fn report_markdown(report: &Report) -> String {
    let mut out = String::from("# Lymphoid Biopsy Report\n\n");
    match report.branch {
        Some(branch) => out.push_str(&format!("**Diagnosis:** {}\n\n", branch.name())),
        None => {
            out.push_str(&format!(
                "_Report incomplete: select {}._\n",
                pending_label(report.pending_field)
            ));
            return out;
        }
    }

    if let Some(classification) = &report.classification {
        out.push_str(&classification_markdown(classification));
        out.push('\n');
    }

    out.push_str("```text\n");
    out.push_str(&report.text);
    out.push_str("\n```\n");
    out
}

fn report_summary(report: &Report, exported_to: Option<&std::path::Path>, run_id: &str) -> String {
    let Some(branch) = report.branch else {
        return format!(
            "[{run_id}] incomplete: select {}",
            pending_label(report.pending_field)
        );
    };

    let mut line = format!("[{run_id}] {branch}: {} chars", report.text.chars().count());
    if let Some(c) = &report.classification {
        line.push_str(&format!(
            ", hans={}, hit={}",
            c.hans_conclusion().map(|h| h.token()).unwrap_or("n/a"),
            c.hit_status.token()
        ));
    }
    if let Some(path) = exported_to {
        line.push_str(&format!(", exported to {}", path.display()));
    }
    line
}

fn pending_label(field: Option<FieldId>) -> &'static str {
    field.map(|f| f.as_str()).unwrap_or("a diagnosis")
}

/// JSON envelope for `classify`.
#[derive(Debug, Serialize)]
struct ClassificationEnvelope<'a> {
    schema_version: &'static str,
    generated_at: String,
    run_id: &'a str,
    classification: &'a ClassificationResult,
    /// Labels as they appear in the form's derived fields.
    derived: serde_json::Map<String, serde_json::Value>,
}

/// Render a marker classification.
pub fn render_classification(
    result: &ClassificationResult,
    format: OutputFormat,
    ctx: &OutputContext,
) -> Option<String> {
    match format {
        OutputFormat::Json => {
            let derived = result
                .derived_fields()
                .iter()
                .map(|(field, value)| {
                    let label = value
                        .map(|(_, label)| serde_json::Value::String(label.to_string()))
                        .unwrap_or(serde_json::Value::Null);
                    (field.as_str().to_string(), label)
                })
                .collect();
            Some(to_pretty(&ClassificationEnvelope {
                schema_version: SCHEMA_VERSION,
                generated_at: ctx.generated_at.to_rfc3339(),
                run_id: &ctx.run_id,
                classification: result,
                derived,
            }))
        }
        OutputFormat::Md => Some(classification_markdown(result)),
        OutputFormat::Summary => Some(format!(
            "hans={} coexpression={} hit={}",
            result.hans_conclusion().map(|h| h.token()).unwrap_or("n/a"),
            result.coexpression.token(),
            result.hit_status.token()
        )),
        OutputFormat::Text => Some(
            result
                .derived_fields()
                .iter()
                .map(|(field, value)| {
                    format!(
                        "{:<24} {}",
                        field.as_str(),
                        value.map(|(_, label)| label).unwrap_or("-")
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        OutputFormat::Exitcode => None,
    }
}

fn classification_markdown(result: &ClassificationResult) -> String {
    let mut out = String::from("| Classification | Result |\n|---|---|\n");
    for (field, value) in result.derived_fields() {
        out.push_str(&format!(
            "| {} | {} |\n",
            field.as_str(),
            value.map(|(_, label)| label).unwrap_or("-")
        ));
    }
    out
}

/// Render the field catalog for `fields`.
pub fn render_fields(format: OutputFormat) -> Option<String> {
    match format {
        OutputFormat::Json => {
            let fields: Vec<_> = FieldId::all()
                .iter()
                .map(|f| {
                    serde_json::json!({
                        "key": f.as_str(),
                        "kind": f.kind(),
                        "group": f.group(),
                    })
                })
                .collect();
            Some(to_pretty(&serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "fields": fields,
            })))
        }
        OutputFormat::Summary => Some(format!("{} fields", FieldId::all().len())),
        OutputFormat::Exitcode => None,
        OutputFormat::Text | OutputFormat::Md => Some(
            FieldId::all()
                .iter()
                .map(|f| format!("{:<24} {:<10} {}", f.as_str(), f.kind().to_string(), f.group()))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
    }
}
