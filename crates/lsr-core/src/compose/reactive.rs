//! Reactive lymphoid hyperplasia (RLHSYN).
//!
//! Reads histology fields only; marker and classification fields are never
//! consulted, even when stale values remain from an earlier selection.

use lsr_common::{FieldId, FormFieldSource};

use super::narrative::{or_default, Narrative};

pub(crate) fn compose<S: FormFieldSource + ?Sized>(source: &S, ancillary: &str) -> String {
    let mut n = Narrative::new();
    n.heading(
        "RLHSYN (Reactive lymphoid hyperplasia Synoptic Report)",
        "Reactive lymphoid hyperplasia.",
    );

    n.sentence(format!(
        "Note: The specimen is a {} lymph node with architecture that is {}",
        or_default(source.field_text(FieldId::LymphNodeSize), "enlarged"),
        or_default(source.field_text(FieldId::Architecture), "intact"),
    ));

    n.sentence_if(source.field_text(FieldId::FollicularPattern), |pattern| {
        format!(
            "The lymph node shows {}, with {} with active germinal centers",
            pattern,
            or_default(source.field_text(FieldId::FollicleSize), "multiple follicles"),
        )
    });

    n.sentence_if(source.field_text(FieldId::MantleZones), |mz| {
        format!("Mantle zones are {mz}")
    });

    n.sentence_if(source.field_text(FieldId::Paracortex), |paracortex| {
        let mut clause = format!(
            "The paracortex is {paracortex}, and is occupied by small lymphocytes, scattered histiocytic/dendritic cells"
        );
        if let Some(eos) = source.text_unless(FieldId::Eosinophils, "none") {
            clause.push_str(&format!(", {eos} eosinophils"));
        }
        if let Some(pc) = source.text_unless(FieldId::PlasmaCells, "none") {
            clause.push_str(&format!(", {pc} plasma cells"));
        }
        clause
    });

    n.sentence_if(source.text_unless(FieldId::Granulomas, "none"), |g| {
        format!("Also present are {g}")
    });
    n.sentence_if(source.text_unless(FieldId::Necrosis, "none"), |necrosis| {
        format!("{necrosis} are identified")
    });
    n.sentence_if(source.field_text(FieldId::Capsule), |c| {
        format!("The capsule is {c}")
    });

    n.paragraph(ancillary);
    n.closing(
        "In summary, the findings are consistent with reactive lymphoid hyperplasia, with no specific evidence of lymphoma or of any other neoplasm.",
    )
}
