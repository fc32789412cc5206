//! Report composition.
//!
//! [`DiagnosisPath::branch`] picks the composer; each composer reads its own
//! subset of fields through [`FormFieldSource`] and returns the finished
//! text. Composers hold no state, so generating twice from the same findings
//! yields the same report.

mod dlbcl;
mod follicular;
mod hodgkin;
mod narrative;
mod reactive;
mod tcell;

use lsr_common::{
    DiagnosisBranch, DiagnosisPath, FieldId, FormFieldSource, HodgkinSubtype, LymphomaFamily,
    ProcessType, Result,
};
use lsr_config::{AncillarySettings, ReporterSettings};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::classify::{classify, ClassificationResult};
use crate::logging::event_names;

/// A generated report and what produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Report {
    pub path: DiagnosisPath,

    /// `None` when a lower-level diagnosis selection is still missing.
    pub branch: Option<DiagnosisBranch>,

    /// The selection needed to complete the path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_field: Option<FieldId>,

    /// Marker classification; present for DLBCL reports only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<ClassificationResult>,

    pub text: String,
}

impl Report {
    /// True when the body is empty (branch undetermined).
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Opening of every lymphoma closing sentence except Hodgkin's.
pub(crate) fn support_sentence(diagnosis: &str) -> String {
    format!("The histologic and immunophenotypic features together support a diagnosis of {diagnosis}")
}

/// Built-in concurrent ancillary testing statement for a branch.
pub fn default_ancillary_statement(branch: DiagnosisBranch, pending_placeholder: &str) -> String {
    match branch {
        DiagnosisBranch::Reactive => {
            "Concurrent flow cytometry (see below) shows no clonal B-cell or atypical T-cell population."
                .to_string()
        }
        DiagnosisBranch::FollicularLymphoma
        | DiagnosisBranch::Dlbcl
        | DiagnosisBranch::TCellLymphoma => {
            format!("Concurrent flow cytometry (see below) demonstrates {pending_placeholder}")
        }
        DiagnosisBranch::ClassicalHodgkin | DiagnosisBranch::NodularLpHodgkin => {
            "Concurrent flow cytometry (see below) shows no abnormal B or T-cell population."
                .to_string()
        }
    }
}

/// Composes reports using the configured ancillary wording.
#[derive(Debug, Clone, Default)]
pub struct ReportComposer {
    ancillary: AncillarySettings,
}

impl ReportComposer {
    pub fn new(settings: &ReporterSettings) -> Self {
        ReportComposer {
            ancillary: settings.ancillary.clone(),
        }
    }

    /// Ancillary statement for a branch, honoring overrides.
    pub fn ancillary_statement(&self, branch: DiagnosisBranch) -> Cow<'_, str> {
        let configured = match branch {
            DiagnosisBranch::Reactive => &self.ancillary.reactive,
            DiagnosisBranch::FollicularLymphoma => &self.ancillary.follicular,
            DiagnosisBranch::Dlbcl => &self.ancillary.dlbcl,
            DiagnosisBranch::TCellLymphoma => &self.ancillary.t_cell,
            DiagnosisBranch::ClassicalHodgkin | DiagnosisBranch::NodularLpHodgkin => {
                &self.ancillary.hodgkin
            }
        };
        match configured {
            Some(text) => Cow::Borrowed(text.as_str()),
            None => Cow::Owned(default_ancillary_statement(
                branch,
                &self.ancillary.pending_placeholder,
            )),
        }
    }

    /// Compose the report for an already resolved branch.
    pub fn compose<S: FormFieldSource + ?Sized>(&self, branch: DiagnosisBranch, source: &S) -> String {
        let ancillary = self.ancillary_statement(branch);
        match branch {
            DiagnosisBranch::Reactive => reactive::compose(source, &ancillary),
            DiagnosisBranch::FollicularLymphoma => follicular::compose(source, &ancillary),
            DiagnosisBranch::Dlbcl => dlbcl::compose(source, &classify(source), &ancillary),
            DiagnosisBranch::TCellLymphoma => tcell::compose(source, &ancillary),
            DiagnosisBranch::ClassicalHodgkin => {
                hodgkin::compose(source, HodgkinSubtype::Classical, &ancillary)
            }
            DiagnosisBranch::NodularLpHodgkin => {
                hodgkin::compose(source, HodgkinSubtype::NodularLp, &ancillary)
            }
        }
    }

    /// Resolve the diagnosis path and compose in one call.
    ///
    /// Fails only when the process type is missing or unrecognized. A
    /// missing lower-level selection yields a report with an empty body.
    pub fn generate<S: FormFieldSource + ?Sized>(&self, source: &S) -> Result<Report> {
        let path = DiagnosisPath::from_source(source)?;
        warn_unrecognized(&path, source);

        let Some(branch) = path.branch() else {
            let pending_field = path.pending_field();
            tracing::warn!(
                target: event_names::BRANCH_INCOMPLETE,
                pending_field = ?pending_field.map(|f| f.as_str()),
                "diagnosis path incomplete; report body is empty"
            );
            return Ok(Report {
                path,
                branch: None,
                pending_field,
                classification: None,
                text: String::new(),
            });
        };

        let classification = (branch == DiagnosisBranch::Dlbcl).then(|| classify(source));
        let text = self.compose(branch, source);

        tracing::info!(
            target: event_names::REPORT_GENERATED,
            branch = %branch,
            chars = text.len() as u64,
            "report generated"
        );

        Ok(Report {
            path,
            branch: Some(branch),
            pending_field: None,
            classification,
            text,
        })
    }
}

/// Compose with built-in settings.
pub fn generate_report<S: FormFieldSource + ?Sized>(branch: DiagnosisBranch, source: &S) -> String {
    ReportComposer::default().compose(branch, source)
}

/// Log lower-level selections on the chosen path whose token was not
/// recognized. Such selections behave as if missing.
fn warn_unrecognized<S: FormFieldSource + ?Sized>(path: &DiagnosisPath, source: &S) {
    if path.process_type != ProcessType::Lymphoproliferative {
        return;
    }

    let unrecognized = match path.lymphoma_family {
        None => Some(FieldId::LymphomaType),
        Some(LymphomaFamily::BCell) if path.b_cell_subtype.is_none() => Some(FieldId::BCellSubtype),
        Some(LymphomaFamily::Hodgkin) if path.hodgkin_subtype.is_none() => {
            Some(FieldId::HodgkinSubtype)
        }
        _ => None,
    }
    .filter(|field| source.has_selection(*field));

    if let Some(field) = unrecognized {
        tracing::warn!(
            target: event_names::SELECTION_UNRECOGNIZED,
            field = field.as_str(),
            "unrecognized diagnosis selection treated as missing"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsr_common::{Error, FieldEntry, FindingsSet};

    fn findings_for(branch: DiagnosisBranch) -> FindingsSet {
        branch
            .selections()
            .iter()
            .map(|(field, token)| (*field, FieldEntry::from(*token)))
            .collect()
    }

    #[test]
    fn test_every_branch_has_header_and_closing() {
        let composer = ReportComposer::default();
        for branch in DiagnosisBranch::all() {
            let report = composer.generate(&findings_for(*branch)).unwrap();
            assert_eq!(report.branch, Some(*branch));
            match branch.code() {
                Some(code) => assert!(report.text.starts_with(code), "{branch}"),
                None => assert!(report.text.starts_with("T-Cell Lymphoma Report")),
            }
            assert!(report.text.ends_with('.'), "{branch}");
            assert!(report.text.contains(branch.name()), "{branch}");
        }
    }

    #[test]
    fn test_missing_process_type() {
        let findings = FindingsSet::new().with(FieldId::LymphomaType, "t-cell");
        let err = ReportComposer::default().generate(&findings).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingRequiredSelection { found: None, .. }
        ));
    }

    #[test]
    fn test_unrecognized_process_type() {
        let findings = FindingsSet::new().with(FieldId::ProcessType, "neoplastic");
        let err = ReportComposer::default().generate(&findings).unwrap_err();
        assert!(err.to_string().contains("neoplastic"));
    }

    #[test]
    fn test_missing_subtype_yields_empty_body() {
        let findings = FindingsSet::new()
            .with(FieldId::ProcessType, "lymphoproliferative")
            .with(FieldId::LymphomaType, "b-cell");
        let report = ReportComposer::default().generate(&findings).unwrap();

        assert!(report.is_empty());
        assert_eq!(report.branch, None);
        assert_eq!(report.pending_field, Some(FieldId::BCellSubtype));
    }

    #[test]
    fn test_unrecognized_subtype_yields_empty_body() {
        let findings = FindingsSet::new()
            .with(FieldId::ProcessType, "lymphoproliferative")
            .with(FieldId::LymphomaType, "hodgkin")
            .with(FieldId::HodgkinSubtype, "lymphocyte-rich");
        let report = ReportComposer::default().generate(&findings).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_classification_only_for_dlbcl() {
        let composer = ReportComposer::default();
        let mut findings = findings_for(DiagnosisBranch::FollicularLymphoma);
        findings.insert(FieldId::HansCd10, "positive");
        assert_eq!(composer.generate(&findings).unwrap().classification, None);

        let mut findings = findings_for(DiagnosisBranch::Dlbcl);
        findings.insert(FieldId::HansCd10, "positive");
        assert!(composer.generate(&findings).unwrap().classification.is_some());
    }

    #[test]
    fn test_ancillary_override_and_placeholder() {
        let mut settings = ReporterSettings::default();
        settings.ancillary.pending_placeholder = "[pending]".to_string();
        settings.ancillary.hodgkin = Some("Flow cytometry was not submitted.".to_string());
        let composer = ReportComposer::new(&settings);

        assert_eq!(
            composer.ancillary_statement(DiagnosisBranch::Dlbcl),
            "Concurrent flow cytometry (see below) demonstrates [pending]"
        );
        let text = composer.compose(
            DiagnosisBranch::NodularLpHodgkin,
            &findings_for(DiagnosisBranch::NodularLpHodgkin),
        );
        assert!(text.contains("\n\nFlow cytometry was not submitted.\n\n"));
    }

    #[test]
    fn test_generate_report_is_idempotent() {
        let findings = findings_for(DiagnosisBranch::Dlbcl)
            .with(FieldId::HansCd10, "negative")
            .with(FieldId::HansBcl6, "negative");
        let first = generate_report(DiagnosisBranch::Dlbcl, &findings);
        let second = generate_report(DiagnosisBranch::Dlbcl, &findings);
        assert_eq!(first, second);
    }
}
