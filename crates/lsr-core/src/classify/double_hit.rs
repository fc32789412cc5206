//! BCL2/MYC co-expression and double/triple hit status.
//!
//! The two rules read overlapping markers but are evaluated separately;
//! hit status also looks at BCL6.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::MarkerStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CoexpressionCategory {
    DoubleHit,
    Bcl2OnlyPositive,
    MycOnlyPositive,
    NeitherPositive,
}

impl CoexpressionCategory {
    pub fn label(&self) -> &'static str {
        match self {
            CoexpressionCategory::DoubleHit => "Double hit (both positive)",
            CoexpressionCategory::Bcl2OnlyPositive => "BCL2 positive only",
            CoexpressionCategory::MycOnlyPositive => "MYC positive only",
            CoexpressionCategory::NeitherPositive => "Neither positive",
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            CoexpressionCategory::DoubleHit => "double-hit",
            CoexpressionCategory::Bcl2OnlyPositive => "bcl2-only",
            CoexpressionCategory::MycOnlyPositive => "myc-only",
            CoexpressionCategory::NeitherPositive => "neither",
        }
    }
}

impl fmt::Display for CoexpressionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum HitStatus {
    TripleHit,
    DoubleHit,
    NoDoubleHitFeatures,
}

impl HitStatus {
    pub fn label(&self) -> &'static str {
        match self {
            HitStatus::TripleHit => "Triple hit (BCL2, MYC, and BCL6 positive)",
            HitStatus::DoubleHit => "Double hit (BCL2 and MYC positive)",
            HitStatus::NoDoubleHitFeatures => "No double hit features",
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            HitStatus::TripleHit => "triple-hit",
            HitStatus::DoubleHit => "double-hit",
            HitStatus::NoDoubleHitFeatures => "none",
        }
    }

    /// Qualifier appended to the DLBCL closing sentence.
    pub fn closing_qualifier(&self) -> Option<&'static str> {
        match self {
            HitStatus::TripleHit => Some(" with triple hit features (BCL2, MYC, and BCL6 positive)"),
            HitStatus::DoubleHit => Some(" with double hit features (BCL2 and MYC positive)"),
            HitStatus::NoDoubleHitFeatures => None,
        }
    }
}

impl fmt::Display for HitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Absent and negative markers are treated alike.
pub fn compute_coexpression(bcl2: MarkerStatus, myc: MarkerStatus) -> CoexpressionCategory {
    match (bcl2.is_positive(), myc.is_positive()) {
        (true, true) => CoexpressionCategory::DoubleHit,
        (true, false) => CoexpressionCategory::Bcl2OnlyPositive,
        (false, true) => CoexpressionCategory::MycOnlyPositive,
        (false, false) => CoexpressionCategory::NeitherPositive,
    }
}

pub fn compute_hit_status(bcl2: MarkerStatus, myc: MarkerStatus, bcl6: MarkerStatus) -> HitStatus {
    match (bcl2.is_positive(), myc.is_positive(), bcl6.is_positive()) {
        (true, true, true) => HitStatus::TripleHit,
        (true, true, false) => HitStatus::DoubleHit,
        _ => HitStatus::NoDoubleHitFeatures,
    }
}
