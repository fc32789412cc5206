//! Follicular lymphoma, grade 1 to 2 (FLSYN).

use lsr_common::{FieldId, FormFieldSource};

use super::narrative::{or_default, Narrative};
use super::support_sentence;

pub(crate) fn compose<S: FormFieldSource + ?Sized>(source: &S, ancillary: &str) -> String {
    let mut n = Narrative::new();
    n.heading(
        "FLSYN (Follicular lymphoma Synoptic Report)",
        "Follicular lymphoma, follicular pattern, grade 1 to 2 of 3.",
    );

    n.sentence(format!(
        "Note: The specimen is a {} lymph node that is almost entirely replaced by a proliferation of crowded, poorly-delineated follicles composed of centrocytes and occasional centroblasts, with fewer than 15 centroblasts per hpf in a background of centrocytes",
        or_default(source.field_text(FieldId::LymphNodeSize), "enlarged"),
    ));
    n.sentence_if(source.field_text(FieldId::MantleZones), |mz| {
        format!("Mantles are {mz}")
    });
    n.sentence_if(source.text_unless(FieldId::MitoticActivity, "none"), str::to_string);
    n.sentence_if(source.text_unless(FieldId::Necrosis, "none"), str::to_string);

    n.paragraph_break();
    n.sentence(format!(
        "Immunostains show numerous B cells ({}) in a follicular pattern",
        or_default(source.field_text(FieldId::Cd20), "CD20+"),
    ));
    n.sentence_if(source.field_text(FieldId::Cd3), |cd3| {
        format!("Scattered non-neoplastic T cells ({cd3}) are present")
    });
    n.sentence_if(source.field_text(FieldId::Ki67), |ki67| {
        format!("Ki67 shows a proliferation index of {ki67}")
    });

    n.paragraph(ancillary);
    n.closing(&format!("{}.", support_sentence("follicular lymphoma")))
}
