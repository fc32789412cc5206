//! Derived classification of DLBCL immunostain markers.
//!
//! Three independent rules, each a pure function of raw marker tokens:
//! - [`compute_hans_category`]: GCB vs non-GCB by the Hans algorithm
//! - [`compute_coexpression`]: BCL2/MYC protein co-expression
//! - [`compute_hit_status`]: double/triple hit status
//!
//! Comparisons use the raw option token (`positive` / `negative`), never the
//! displayed text.

pub mod double_hit;
pub mod hans;

pub use double_hit::{compute_coexpression, compute_hit_status, CoexpressionCategory, HitStatus};
pub use hans::{compute_hans_category, HansCategory};

use lsr_common::{FieldId, FieldValue, FormFieldSource};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Interpretation of a single marker selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStatus {
    Positive,
    Negative,
    /// Any other token (e.g. `equivocal`).
    Other,
    Absent,
}

impl MarkerStatus {
    pub fn from_raw(raw: FieldValue<'_>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => MarkerStatus::Absent,
            Some("positive") => MarkerStatus::Positive,
            Some("negative") => MarkerStatus::Negative,
            Some(_) => MarkerStatus::Other,
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, MarkerStatus::Positive)
    }
}

/// Marker tokens the rules read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MarkerPanel {
    pub cd10: MarkerStatus,
    pub bcl6: MarkerStatus,
    pub mum1: MarkerStatus,
    pub bcl2: MarkerStatus,
    pub myc: MarkerStatus,
}

impl MarkerPanel {
    pub fn from_source<S: FormFieldSource + ?Sized>(source: &S) -> Self {
        MarkerPanel {
            cd10: MarkerStatus::from_raw(source.raw_value(FieldId::HansCd10)),
            bcl6: MarkerStatus::from_raw(source.raw_value(FieldId::HansBcl6)),
            mum1: MarkerStatus::from_raw(source.raw_value(FieldId::HansMum1)),
            bcl2: MarkerStatus::from_raw(source.raw_value(FieldId::Bcl2Status)),
            myc: MarkerStatus::from_raw(source.raw_value(FieldId::MycStatus)),
        }
    }

    /// Whether any Hans marker has a selection.
    pub fn hans_assessed(&self) -> bool {
        [self.cd10, self.bcl6, self.mum1]
            .iter()
            .any(|m| *m != MarkerStatus::Absent)
    }
}

/// All three derived categories for one set of markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClassificationResult {
    pub hans: HansCategory,
    pub coexpression: CoexpressionCategory,
    pub hit_status: HitStatus,
    /// False when no Hans marker was selected; `hans` is then
    /// `Unclassifiable` by default and is not reported.
    pub hans_assessed: bool,
}

impl ClassificationResult {
    pub fn from_panel(panel: &MarkerPanel) -> Self {
        ClassificationResult {
            hans: compute_hans_category(panel.cd10, panel.bcl6, panel.mum1),
            coexpression: compute_coexpression(panel.bcl2, panel.myc),
            hit_status: compute_hit_status(panel.bcl2, panel.myc, panel.bcl6),
            hans_assessed: panel.hans_assessed(),
        }
    }

    /// Hans category worth reporting, if any marker was assessed.
    pub fn hans_conclusion(&self) -> Option<HansCategory> {
        self.hans_assessed.then_some(self.hans)
    }

    /// Derived form fields and their (token, label) values.
    ///
    /// `gcb-vs-abc` maps to `None` when no Hans marker is selected.
    pub fn derived_fields(&self) -> [(FieldId, Option<(&'static str, &'static str)>); 3] {
        [
            (
                FieldId::GcbVsAbc,
                self.hans_conclusion().map(|h| (h.token(), h.label())),
            ),
            (
                FieldId::Bcl2MycCoexpression,
                Some((self.coexpression.token(), self.coexpression.label())),
            ),
            (
                FieldId::DoubleHitLymphoma,
                Some((self.hit_status.token(), self.hit_status.label())),
            ),
        ]
    }
}

/// Classify the markers currently held by `source`.
///
/// Never mutates the source; derived fields are refreshed by the caller.
pub fn classify<S: FormFieldSource + ?Sized>(source: &S) -> ClassificationResult {
    ClassificationResult::from_panel(&MarkerPanel::from_source(source))
}
