//! Fuzz target for `key=value` assignments applied to a form session.
//!
//! Arbitrary assignment sequences must never panic, and the derived
//! classification fields must always agree with the markers afterwards.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lsr_common::{FieldId, FormFieldSource};
use lsr_core::FormSession;

#[derive(Debug, Arbitrary)]
struct Input {
    assignments: Vec<String>,
}

fuzz_target!(|input: Input| {
    let mut session = FormSession::default();
    for assignment in &input.assignments {
        let _ = session.apply_assignment(assignment);
    }

    let any_marker = FieldId::all()
        .iter()
        .any(|f| f.is_marker() && session.findings().has_selection(*f));
    if any_marker {
        for (field, value) in session.classification().derived_fields() {
            assert_eq!(
                session.findings().raw_value(field),
                value.map(|(token, _)| token)
            );
        }
    }

    let _ = session.generate();
});
