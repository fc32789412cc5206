//! Hans algorithm for cell-of-origin subtyping.
//!
//! GCB:     CD10+, or CD10- / BCL6+ / MUM1-
//! Non-GCB: CD10- / BCL6+ / MUM1+, or CD10- / BCL6-
//! Anything else is unclassifiable.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::MarkerStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum HansCategory {
    /// Germinal center B-cell.
    Gcb,
    /// Non-germinal center (activated B-cell like).
    NonGcb,
    Unclassifiable,
}

impl HansCategory {
    pub fn label(&self) -> &'static str {
        match self {
            HansCategory::Gcb => "Germinal Center B-cell (GCB)",
            HansCategory::NonGcb => "Non-Germinal Center B-cell (Non-GCB)",
            HansCategory::Unclassifiable => "Unclassifiable",
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            HansCategory::Gcb => "gcb",
            HansCategory::NonGcb => "non-gcb",
            HansCategory::Unclassifiable => "unclassifiable",
        }
    }

    /// Qualifier appended to the DLBCL closing sentence.
    pub fn closing_qualifier(&self) -> &'static str {
        match self {
            HansCategory::Gcb => " of germinal center B-cell origin",
            HansCategory::NonGcb => " of non-germinal center B-cell origin",
            HansCategory::Unclassifiable => " (unclassifiable by Hans criteria)",
        }
    }
}

impl fmt::Display for HansCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decision table over CD10, BCL6 and MUM1. Total.
pub fn compute_hans_category(
    cd10: MarkerStatus,
    bcl6: MarkerStatus,
    mum1: MarkerStatus,
) -> HansCategory {
    use MarkerStatus::{Negative, Positive};

    match (cd10, bcl6, mum1) {
        (Positive, _, _) => HansCategory::Gcb,
        (Negative, Positive, Negative) => HansCategory::Gcb,
        (Negative, Positive, Positive) => HansCategory::NonGcb,
        (Negative, Negative, _) => HansCategory::NonGcb,
        _ => HansCategory::Unclassifiable,
    }
}
