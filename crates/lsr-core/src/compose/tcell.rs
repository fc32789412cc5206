//! T-cell lymphoma. No synoptic code; the header is a plain title.

use lsr_common::{FieldId, FormFieldSource};

use super::narrative::{or_default, Narrative};
use super::support_sentence;

pub(crate) fn compose<S: FormFieldSource + ?Sized>(source: &S, ancillary: &str) -> String {
    let mut n = Narrative::new();
    n.heading("T-Cell Lymphoma Report", "T-cell lymphoma.");

    n.sentence(format!(
        "Note: The specimen is a {} lymph node with {} by a diffuse infiltrate of {} T cells with {} nuclei, {} chromatin, and {} nucleoli",
        or_default(source.field_text(FieldId::LymphNodeSize), "enlarged"),
        or_default(source.field_text(FieldId::Architecture), "architectural effacement"),
        or_default(source.field_text(FieldId::CellSize), "atypical"),
        or_default(source.field_text(FieldId::NuclearContours), "irregular"),
        or_default(source.field_text(FieldId::ChromatinQuality), "coarse"),
        or_default(source.field_text(FieldId::Nucleoli), "inconspicuous"),
    ));

    n.paragraph_break();
    n.sentence(format!(
        "Immunostains show numerous T cells ({}) in a diffuse pattern",
        or_default(source.field_text(FieldId::Cd3), "CD3+"),
    ));
    n.sentence_if(source.field_text(FieldId::Cd20), |cd20| {
        format!("B cells ({cd20}) are present")
    });
    n.sentence_if(source.field_text(FieldId::Ki67), |ki67| {
        format!("Ki67 shows a proliferation index of {ki67}")
    });

    n.paragraph(ancillary);
    n.closing(&format!("{}.", support_sentence("T-cell lymphoma")))
}
