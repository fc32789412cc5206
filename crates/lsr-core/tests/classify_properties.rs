//! Property-based tests for the marker classification rules.

use lsr_common::{DiagnosisBranch, FieldEntry, FieldId, FindingsSet};
use lsr_core::classify::{
    classify, compute_coexpression, compute_hans_category, compute_hit_status,
    CoexpressionCategory, HansCategory, HitStatus, MarkerStatus,
};
use lsr_core::generate_report;
use proptest::prelude::*;

fn marker_token() -> impl Strategy<Value = Option<&'static str>> {
    prop_oneof![
        Just(None),
        Just(Some("positive")),
        Just(Some("negative")),
        Just(Some("equivocal")),
        Just(Some("  ")),
    ]
}

fn marker_status() -> impl Strategy<Value = MarkerStatus> {
    marker_token().prop_map(MarkerStatus::from_raw)
}

fn panel_findings(tokens: [Option<&'static str>; 5]) -> FindingsSet {
    let fields = [
        FieldId::HansCd10,
        FieldId::HansBcl6,
        FieldId::HansMum1,
        FieldId::Bcl2Status,
        FieldId::MycStatus,
    ];
    fields
        .into_iter()
        .zip(tokens)
        .filter_map(|(field, token)| token.map(|t| (field, FieldEntry::from(t))))
        .collect()
}

proptest! {
    #[test]
    fn hans_cd10_positive_always_gcb(bcl6 in marker_status(), mum1 in marker_status()) {
        prop_assert_eq!(
            compute_hans_category(MarkerStatus::Positive, bcl6, mum1),
            HansCategory::Gcb
        );
    }

    #[test]
    fn hans_non_gcb_requires_cd10_negative(
        cd10 in marker_status(),
        bcl6 in marker_status(),
        mum1 in marker_status(),
    ) {
        if compute_hans_category(cd10, bcl6, mum1) == HansCategory::NonGcb {
            prop_assert_eq!(cd10, MarkerStatus::Negative);
            prop_assert!(
                bcl6 == MarkerStatus::Negative
                    || (bcl6 == MarkerStatus::Positive && mum1 == MarkerStatus::Positive)
            );
        }
    }

    #[test]
    fn hans_missing_cd10_is_unclassifiable(bcl6 in marker_status(), mum1 in marker_status()) {
        prop_assert_eq!(
            compute_hans_category(MarkerStatus::Absent, bcl6, mum1),
            HansCategory::Unclassifiable
        );
    }

    #[test]
    fn coexpression_tracks_positivity(bcl2 in marker_status(), myc in marker_status()) {
        let expected = match (bcl2.is_positive(), myc.is_positive()) {
            (true, true) => CoexpressionCategory::DoubleHit,
            (true, false) => CoexpressionCategory::Bcl2OnlyPositive,
            (false, true) => CoexpressionCategory::MycOnlyPositive,
            (false, false) => CoexpressionCategory::NeitherPositive,
        };
        prop_assert_eq!(compute_coexpression(bcl2, myc), expected);
    }

    #[test]
    fn hit_status_needs_bcl2_and_myc(
        bcl2 in marker_status(),
        myc in marker_status(),
        bcl6 in marker_status(),
    ) {
        let status = compute_hit_status(bcl2, myc, bcl6);
        let both = bcl2.is_positive() && myc.is_positive();
        prop_assert_eq!(status != HitStatus::NoDoubleHitFeatures, both);
        prop_assert_eq!(status == HitStatus::TripleHit, both && bcl6.is_positive());
    }

    #[test]
    fn double_hit_rules_agree_on_bcl2_myc(bcl2 in marker_status(), myc in marker_status()) {
        let coexpression = compute_coexpression(bcl2, myc);
        let hit = compute_hit_status(bcl2, myc, MarkerStatus::Negative);
        prop_assert_eq!(
            coexpression == CoexpressionCategory::DoubleHit,
            hit == HitStatus::DoubleHit
        );
    }

    #[test]
    fn classify_hans_reported_only_when_assessed(
        tokens in proptest::array::uniform5(marker_token()),
    ) {
        let findings = panel_findings(tokens);
        let result = classify(&findings);
        let assessed = tokens[..3]
            .iter()
            .any(|t| t.map(|s| !s.trim().is_empty()).unwrap_or(false));
        prop_assert_eq!(result.hans_conclusion().is_some(), assessed);
    }

    #[test]
    fn reactive_report_ignores_markers(tokens in proptest::array::uniform5(marker_token())) {
        let with_markers = panel_findings(tokens).with(FieldId::ProcessType, "reactive");
        let without = FindingsSet::new().with(FieldId::ProcessType, "reactive");
        prop_assert_eq!(
            generate_report(DiagnosisBranch::Reactive, &with_markers),
            generate_report(DiagnosisBranch::Reactive, &without)
        );
    }

    #[test]
    fn dlbcl_generation_is_deterministic(tokens in proptest::array::uniform5(marker_token())) {
        let findings = panel_findings(tokens);
        prop_assert_eq!(
            generate_report(DiagnosisBranch::Dlbcl, &findings),
            generate_report(DiagnosisBranch::Dlbcl, &findings)
        );
    }
}
