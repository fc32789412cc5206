//! In-memory form session.
//!
//! Mirrors what the hosting form does between user actions: derived
//! classification fields follow the markers, a changed diagnosis choice
//! clears the choices beneath it, and the last generated report is kept
//! until reset. Nothing is persisted.

use std::path::{Path, PathBuf};

use lsr_common::{parse_assignment, Error, FieldEntry, FieldId, FindingsSet, FormFieldSource, Result};

use crate::classify::{classify, ClassificationResult};
use crate::compose::{Report, ReportComposer};
use crate::export::export_report;
use crate::logging::event_names;

#[derive(Debug, Clone, Default)]
pub struct FormSession {
    findings: FindingsSet,
    composer: ReportComposer,
    export_file_name: Option<String>,
    last_report: Option<Report>,
}

impl FormSession {
    pub fn new(composer: ReportComposer) -> Self {
        FormSession {
            composer,
            ..Default::default()
        }
    }

    /// Start from a loaded findings set.
    ///
    /// Derived fields in the input are recomputed from its markers.
    pub fn from_findings(findings: FindingsSet, composer: ReportComposer) -> Self {
        let mut session = FormSession {
            findings,
            composer,
            ..Default::default()
        };
        for field in FieldId::all().iter().filter(|f| f.is_derived()) {
            session.findings.remove(*field);
        }
        if FieldId::all()
            .iter()
            .any(|f| f.is_marker() && session.findings.has_selection(*f))
        {
            session.refresh_derived();
        }
        session
    }

    /// Start from a loaded findings set with `key=value` overrides applied.
    ///
    /// The overrides are folded into the snapshot as a whole, so their order
    /// does not matter and no lower-level selection is cleared. Derived
    /// fields are rejected as in [`FormSession::set_field`].
    pub fn with_overrides<I, A>(
        mut findings: FindingsSet,
        assignments: I,
        composer: ReportComposer,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
    {
        for assignment in assignments {
            let (field, entry) = parse_assignment(assignment.as_ref())?;
            if field.is_derived() {
                return Err(Error::DerivedField(field.as_str().to_string()));
            }
            match entry {
                Some(entry) => findings.insert(field, entry),
                None => findings.remove(field),
            };
        }
        Ok(Self::from_findings(findings, composer))
    }

    /// File name used when exporting into a directory.
    pub fn with_export_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.export_file_name = Some(file_name.into());
        self
    }

    pub fn findings(&self) -> &FindingsSet {
        &self.findings
    }

    /// Set a field. Derived fields are read-only.
    pub fn set_field(&mut self, field: FieldId, entry: impl Into<FieldEntry>) -> Result<()> {
        self.update(field, Some(entry.into()))
    }

    pub fn clear_field(&mut self, field: FieldId) -> Result<()> {
        self.update(field, None)
    }

    /// Apply a `key=value` assignment (see [`parse_assignment`]).
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<FieldId> {
        let (field, entry) = parse_assignment(assignment)?;
        self.update(field, entry)?;
        Ok(field)
    }

    fn update(&mut self, field: FieldId, entry: Option<FieldEntry>) -> Result<()> {
        if field.is_derived() {
            return Err(Error::DerivedField(field.as_str().to_string()));
        }

        let before = self.findings.raw_value(field).map(str::to_string);
        match entry.filter(|e| e.value().is_some()) {
            Some(entry) => self.findings.insert(field, entry),
            None => self.findings.remove(field),
        };
        let changed = before.as_deref() != self.findings.raw_value(field);

        tracing::debug!(
            target: event_names::FIELD_ASSIGNED,
            field = field.as_str(),
            changed,
            "field updated"
        );

        if changed {
            let dependents = field.dependent_selections();
            let cleared = dependents
                .iter()
                .filter(|dep| self.findings.remove(**dep).is_some())
                .count();
            if cleared > 0 {
                tracing::debug!(
                    target: event_names::SELECTIONS_CLEARED,
                    field = field.as_str(),
                    cleared = cleared as u64,
                    "lower-level diagnosis selections cleared"
                );
            }
            if field.is_marker() {
                self.refresh_derived();
            }
        }
        Ok(())
    }

    /// Rewrite the derived classification fields from the current markers.
    fn refresh_derived(&mut self) {
        let result = classify(&self.findings);
        for (field, value) in result.derived_fields() {
            match value {
                Some((token, label)) => self.findings.insert(field, FieldEntry::labeled(token, label)),
                None => self.findings.remove(field),
            };
        }
        tracing::debug!(
            target: event_names::CLASSIFICATION_REFRESHED,
            hans = result.hans.token(),
            coexpression = result.coexpression.token(),
            hit_status = result.hit_status.token(),
            "derived classification refreshed"
        );
    }

    /// Current marker classification.
    pub fn classification(&self) -> ClassificationResult {
        classify(&self.findings)
    }

    /// Generate a report from the current findings and keep it.
    ///
    /// On error the previous report is left in place.
    pub fn generate(&mut self) -> Result<&Report> {
        let report = self.composer.generate(&self.findings)?;
        let kept: &Report = self.last_report.insert(report);
        Ok(kept)
    }

    pub fn last_report(&self) -> Option<&Report> {
        self.last_report.as_ref()
    }

    /// Export the last generated report.
    ///
    /// Never touches the findings or the kept report, whatever the outcome.
    pub fn export(&self, target: &Path) -> Result<PathBuf> {
        let text = self.last_report.as_ref().map(|r| r.text.as_str()).unwrap_or("");
        let file_name = self
            .export_file_name
            .as_deref()
            .unwrap_or(lsr_config::settings::DEFAULT_EXPORT_FILE_NAME);

        match export_report(text, target, file_name) {
            Ok(path) => {
                tracing::info!(
                    target: event_names::REPORT_EXPORTED,
                    path = %path.display(),
                    "report exported"
                );
                Ok(path)
            }
            Err(e) => {
                tracing::warn!(
                    target: event_names::EXPORT_FAILED,
                    code = e.code() as u64,
                    "report export failed"
                );
                Err(e)
            }
        }
    }

    /// Clear all findings and discard the last report.
    pub fn reset(&mut self) {
        self.findings.clear();
        self.last_report = None;
    }
}
