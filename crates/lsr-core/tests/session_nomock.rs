//! Form session behavior through the public API, with real files.

use lsr_common::{Error, FieldEntry, FieldId, FormFieldSource};
use lsr_config::ReporterSettings;
use lsr_core::{FormSession, ReportComposer};
use tempfile::TempDir;

fn session_with(assignments: &[&str]) -> FormSession {
    let mut session = FormSession::default();
    for assignment in assignments {
        session.apply_assignment(assignment).unwrap();
    }
    session
}

#[test]
fn hodgkin_to_b_cell_switch_drops_subtype() {
    let mut session = session_with(&[
        "process-type=lymphoproliferative",
        "lymphoma-type=hodgkin",
        "hodgkin-subtype=nodular-lp",
    ]);
    session.apply_assignment("lymphoma-type=b-cell").unwrap();

    assert!(!session.findings().has_selection(FieldId::HodgkinSubtype));
    let report = session.generate().unwrap();
    assert!(report.is_empty());
    assert_eq!(report.pending_field, Some(FieldId::BCellSubtype));
}

#[test]
fn marker_assignments_fill_derived_fields() {
    let session = session_with(&[
        "hans-cd10=negative",
        "hans-bcl6=positive",
        "hans-mum1=positive",
        "bcl2-status=positive|Positive",
        "myc-status=positive|Positive",
    ]);
    let findings = session.findings();

    assert_eq!(
        findings.field_text(FieldId::GcbVsAbc),
        Some("Non-Germinal Center B-cell (Non-GCB)")
    );
    assert_eq!(findings.raw_value(FieldId::DoubleHitLymphoma), Some("triple-hit"));
    assert_eq!(findings.raw_value(FieldId::Bcl2MycCoexpression), Some("double-hit"));
}

#[test]
fn clearing_markers_resets_derived_fields() {
    let mut session = session_with(&["bcl2-status=positive", "myc-status=positive"]);
    session.apply_assignment("myc-status=").unwrap();

    assert_eq!(
        session.findings().field_text(FieldId::Bcl2MycCoexpression),
        Some("BCL2 positive only")
    );
    assert_eq!(
        session.findings().field_text(FieldId::DoubleHitLymphoma),
        Some("No double hit features")
    );
}

#[test]
fn configured_wording_and_file_name_flow_through_export() {
    let dir = TempDir::new().unwrap();
    let mut settings = ReporterSettings::default();
    settings.ancillary.dlbcl = Some("Flow cytometry is pending.".to_string());
    settings.export.file_name = "dlbcl_case.txt".to_string();

    let mut session = FormSession::new(ReportComposer::new(&settings))
        .with_export_file_name(settings.export.file_name.clone());
    for assignment in [
        "process-type=lymphoproliferative",
        "lymphoma-type=b-cell",
        "b-cell-subtype=diffuse-large",
    ] {
        session.apply_assignment(assignment).unwrap();
    }
    session.generate().unwrap();

    let path = session.export(dir.path()).unwrap();
    assert_eq!(path, dir.path().join("dlbcl_case.txt"));
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("\n\nFlow cytometry is pending.\n\n"));
    assert_eq!(Some(written.as_str()), session.last_report().map(|r| r.text.as_str()));
}

#[test]
fn export_into_missing_directory_keeps_session() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with(&["process-type=reactive"]);
    session.generate().unwrap();

    let err = session
        .export(&dir.path().join("no-such-dir").join("out.txt"))
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(session.last_report().is_some());
    assert_eq!(session.findings().raw_value(FieldId::ProcessType), Some("reactive"));
}

#[test]
fn reset_then_generate_requires_process_type() {
    let mut session = session_with(&["process-type=reactive", "capsule=thickened"]);
    session.generate().unwrap();
    session.reset();

    assert!(matches!(
        session.generate(),
        Err(Error::MissingRequiredSelection { .. })
    ));
    assert!(session.last_report().is_none());
}

#[test]
fn labeled_set_uses_display_text() {
    let mut session = FormSession::default();
    session
        .set_field(FieldId::ProcessType, FieldEntry::labeled("reactive", "Reactive"))
        .unwrap();
    session
        .set_field(FieldId::Capsule, FieldEntry::labeled("thick", "focally thickened"))
        .unwrap();
    let report = session.generate().unwrap();
    assert!(report.text.contains("The capsule is focally thickened. "));
}
