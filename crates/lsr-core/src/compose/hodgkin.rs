//! Hodgkin lymphoma: classic (CHLSYN) and nodular lymphocyte predominant
//! (NLPSYN). The two share everything after the opening note sentence
//! except the large-cell identity.

use lsr_common::{FieldId, FormFieldSource, HodgkinSubtype};

use super::narrative::{or_default, Narrative};

pub(crate) fn compose<S: FormFieldSource + ?Sized>(
    source: &S,
    subtype: HodgkinSubtype,
    ancillary: &str,
) -> String {
    let size = or_default(source.field_text(FieldId::LymphNodeSize), "markedly enlarged");
    let mut n = Narrative::new();

    match subtype {
        HodgkinSubtype::Classical => {
            n.heading(
                "CHLSYN (Classical Hodgkin lymphoma Synoptic Report)",
                "Classic Hodgkin lymphoma, mixed cellularity sub-type.",
            );
            n.sentence(format!(
                "Note: The specimen is a {} lymph node with {} by a mixed inflammatory cell infiltrate consisting of small lymphocytes, histiocytes, granulocytes including eosinophils, plasma cells and large atypical cells",
                size,
                or_default(source.field_text(FieldId::Architecture), "architectural effacement"),
            ));
        }
        HodgkinSubtype::NodularLp => {
            n.heading(
                "NLPSYN (Nodular lymphocyte predominant Hodgkin lymphoma Synoptic Report)",
                "Nodular lymphocyte predominant Hodgkin lymphoma.",
            );
            n.sentence(format!(
                "Note: The specimen is a {size} lymph node that is almost entirely replaced by large, crowded, expansile nodules of cells"
            ));
        }
    }

    n.sentence(format!(
        "The latter have large {} nuclei, {} nucleoli, and scant to moderate quantity of pale cytoplasm",
        or_default(source.field_text(FieldId::NuclearContours), "oval"),
        or_default(source.field_text(FieldId::Nucleoli), "prominent"),
    ));
    n.sentence(match subtype {
        HodgkinSubtype::Classical => {
            "The appearance of the large cells is consistent with Reed-Sternberg cells and variants"
        }
        HodgkinSubtype::NodularLp => {
            "The appearance of the large cells is consistent with lymphocyte predominant (LP) cells"
        }
    });

    n.paragraph_break();
    n.sentence(format!(
        "Immunostains show that the large atypical cells are positive for {}, {}",
        or_default(source.field_text(FieldId::Cd30), "CD30"),
        or_default(source.field_text(FieldId::Cd15), "CD15"),
    ));
    n.sentence_if(source.field_text(FieldId::Cd20), |cd20| {
        format!("Large cells are {cd20} for CD20")
    });
    n.sentence_if(source.field_text(FieldId::Cd3), |cd3| {
        format!("The small lymphocytes are a mixture of T cells ({cd3}) and fewer small B cells")
    });

    n.paragraph(ancillary);
    let diagnosis = match subtype {
        HodgkinSubtype::Classical => "classic Hodgkin lymphoma",
        HodgkinSubtype::NodularLp => "nodular lymphocyte predominant Hodgkin lymphoma",
    };
    n.closing(&format!(
        "The histologic and immunophenotypic findings together support a diagnosis of {diagnosis}."
    ))
}
