//! Diffuse large B-cell lymphoma (DLBSYN).
//!
//! The only composer that consumes the marker classification. Clauses after
//! the CD20 sentence appear in a fixed order:
//! immunophenotype, BCL2/MYC status, co-expression, percentages, Hans
//! conclusion, hit conclusion, EBER, then T cells and Ki67.

use lsr_common::{FieldId, FormFieldSource};

use super::narrative::{or_default, Narrative};
use super::support_sentence;
use crate::classify::{ClassificationResult, CoexpressionCategory};

pub(crate) fn compose<S: FormFieldSource + ?Sized>(
    source: &S,
    classification: &ClassificationResult,
    ancillary: &str,
) -> String {
    let mut n = Narrative::new();
    n.heading(
        "DLBSYN (Diffuse large B-cell lymphoma Synoptic Report)",
        "Diffuse large B-cell lymphoma.",
    );

    n.sentence(format!(
        "Note: The specimen is a {} lymph node that is almost entirely replaced by a diffuse infiltrate of large atypical lymphoid cells with {} nuclei, {} nucleoli, and scant to moderate quantity of pale cytoplasm",
        or_default(source.field_text(FieldId::LymphNodeSize), "enlarged"),
        or_default(source.field_text(FieldId::NuclearContours), "oval"),
        or_default(source.field_text(FieldId::Nucleoli), "prominent"),
    ));
    n.sentence_if(source.text_unless(FieldId::MitoticActivity, "none"), str::to_string);
    n.sentence_if(source.text_unless(FieldId::Necrosis, "none"), str::to_string);

    n.paragraph_break();
    n.sentence(format!(
        "Immunostains show numerous B cells ({}) in a diffuse pattern",
        or_default(source.field_text(FieldId::Cd20), "CD20+"),
    ));

    let immunophenotype: Vec<String> = [
        ("CD10", FieldId::HansCd10),
        ("BCL6", FieldId::HansBcl6),
        ("MUM1", FieldId::HansMum1),
    ]
    .into_iter()
    .filter_map(|(name, field)| source.field_text(field).map(|t| format!("{name} {t}")))
    .collect();
    if !immunophenotype.is_empty() {
        n.sentence(format!(
            "B cells show the following immunophenotype: {}",
            immunophenotype.join(", ")
        ));
    }

    let bcl2 = source.field_text(FieldId::Bcl2Status);
    let myc = source.field_text(FieldId::MycStatus);
    if bcl2.is_some() || myc.is_some() {
        n.sentence(format!(
            "BCL2 is {} and MYC is {}",
            or_default(bcl2, "not performed"),
            or_default(myc, "not performed"),
        ));
    }

    if classification.coexpression != CoexpressionCategory::NeitherPositive {
        n.sentence(format!(
            "BCL2/MYC coexpression analysis shows {}",
            classification.coexpression.label()
        ));
    }

    let myc_pct = source.field_text(FieldId::MycPercentage);
    let bcl2_pct = source.field_text(FieldId::Bcl2Percentage);
    if myc_pct.is_some() || bcl2_pct.is_some() {
        let parts: Vec<String> = [
            myc_pct.map(|p| format!("MYC staining in {p} of cells")),
            bcl2_pct.map(|p| format!("BCL2 staining in {p} of cells")),
        ]
        .into_iter()
        .flatten()
        .collect();
        n.sentence(format!("Quantitative analysis shows {}", parts.join(" and ")));
    }

    let hans = classification.hans_conclusion();
    n.sentence_if(hans, |h| {
        format!("Based on Hans criteria, this represents a {} type DLBCL", h.label())
    });
    n.sentence_if(classification.hit_status.closing_qualifier(), |_| {
        format!("This represents a {} lymphoma", classification.hit_status.label())
    });

    n.sentence_if(source.text_unless(FieldId::EberStatus, "negative"), |eber| {
        format!("In situ hybridization for Epstein-Barr virus (EBER) shows {eber}")
    });
    n.sentence_if(source.field_text(FieldId::Cd3), |cd3| {
        format!("Scattered non-neoplastic T cells ({cd3}) are present")
    });
    n.sentence_if(source.field_text(FieldId::Ki67), |ki67| {
        format!("Ki67 shows a proliferation index of {ki67}")
    });

    n.paragraph(ancillary);

    let mut closing = support_sentence("diffuse large B-cell lymphoma");
    if let Some(h) = hans {
        closing.push_str(h.closing_qualifier());
    }
    if let Some(q) = classification.hit_status.closing_qualifier() {
        closing.push_str(q);
    }
    closing.push('.');
    n.closing(&closing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use lsr_common::{FieldEntry, FindingsSet};

    const FLOW: &str = "Concurrent flow cytometry (see below) demonstrates ----------";

    fn render(findings: &FindingsSet) -> String {
        compose(findings, &classify(findings), FLOW)
    }

    #[test]
    fn test_gcb_closing() {
        let findings = FindingsSet::new()
            .with(FieldId::LymphNodeSize, "enlarged")
            .with(FieldId::Cd20, "CD20+")
            .with(FieldId::HansCd10, FieldEntry::labeled("positive", "positive"));
        let text = render(&findings);

        assert!(text.contains("B cells show the following immunophenotype: CD10 positive. "));
        assert!(text.contains(
            "Based on Hans criteria, this represents a Germinal Center B-cell (GCB) type DLBCL. "
        ));
        assert!(text.ends_with(
            "support a diagnosis of diffuse large B-cell lymphoma of germinal center B-cell origin."
        ));
        assert!(!text.contains("coexpression"));
    }

    #[test]
    fn test_double_hit_clauses_in_order() {
        let findings = FindingsSet::new()
            .with(FieldId::HansBcl6, FieldEntry::labeled("negative", "Negative"))
            .with(FieldId::Bcl2Status, FieldEntry::labeled("positive", "Positive"))
            .with(FieldId::MycStatus, FieldEntry::labeled("positive", "Positive"))
            .with(FieldId::MycPercentage, "60%")
            .with(FieldId::Bcl2Percentage, "80%");
        let text = render(&findings);

        let order = [
            "B cells show the following immunophenotype: BCL6 Negative. ",
            "BCL2 is Positive and MYC is Positive. ",
            "BCL2/MYC coexpression analysis shows Double hit (both positive). ",
            "Quantitative analysis shows MYC staining in 60% of cells and BCL2 staining in 80% of cells. ",
            "Based on Hans criteria, this represents a Unclassifiable type DLBCL. ",
            "This represents a Double hit (BCL2 and MYC positive) lymphoma. ",
        ];
        let mut last = 0;
        for clause in order {
            let pos = text.find(clause).unwrap_or_else(|| panic!("missing clause: {clause}"));
            assert!(pos >= last, "clause out of order: {clause}");
            last = pos;
        }
        assert!(text.ends_with(
            "diffuse large B-cell lymphoma (unclassifiable by Hans criteria) with double hit features (BCL2 and MYC positive)."
        ));
    }

    #[test]
    fn test_no_markers_no_qualifier() {
        let text = render(&FindingsSet::new());
        assert!(!text.contains("Hans criteria"));
        assert!(!text.contains("BCL2"));
        assert!(text.ends_with("support a diagnosis of diffuse large B-cell lymphoma."));
    }

    #[test]
    fn test_single_status_defaults_other_to_not_performed() {
        let findings = FindingsSet::new().with(FieldId::MycStatus, "positive");
        let text = render(&findings);
        assert!(text.contains("BCL2 is not performed and MYC is positive. "));
        assert!(text.contains("BCL2/MYC coexpression analysis shows MYC positive only. "));
        assert!(!text.contains("This represents a"));
    }

    #[test]
    fn test_eber_negative_omitted() {
        let negative = FindingsSet::new().with(FieldId::EberStatus, FieldEntry::labeled("negative", "Negative"));
        assert!(!render(&negative).contains("EBER"));

        let positive = FindingsSet::new().with(
            FieldId::EberStatus,
            FieldEntry::labeled("positive", "positive in scattered cells"),
        );
        assert!(render(&positive).contains(
            "In situ hybridization for Epstein-Barr virus (EBER) shows positive in scattered cells. "
        ));
    }

    #[test]
    fn test_triple_hit() {
        let findings = FindingsSet::new()
            .with(FieldId::HansCd10, "negative")
            .with(FieldId::HansBcl6, "positive")
            .with(FieldId::HansMum1, "positive")
            .with(FieldId::Bcl2Status, "positive")
            .with(FieldId::MycStatus, "positive");
        let text = render(&findings);

        assert!(text.contains("CD10 negative, BCL6 positive, MUM1 positive. "));
        assert!(text.ends_with(
            "of non-germinal center B-cell origin with triple hit features (BCL2, MYC, and BCL6 positive)."
        ));
    }
}
