//! Diagnosis path selection.
//!
//! The form selects a report branch through chained choices: process type,
//! then lymphoma family, then a family-specific subtype. [`DiagnosisPath`]
//! captures the current choices and [`DiagnosisPath::branch`] maps them to a
//! [`DiagnosisBranch`] in a single decision-tree lookup. Nothing here keeps
//! history: a path is rebuilt from the current selections every time.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::field::FieldId;
use crate::findings::FormFieldSource;

/// Top-level choice: reactive process or lymphoproliferative disorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessType {
    Reactive,
    Lymphoproliferative,
}

/// Lymphoma family, asked only for lymphoproliferative processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum LymphomaFamily {
    BCell,
    TCell,
    Hodgkin,
}

/// B-cell lymphoma subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum BCellSubtype {
    Follicular,
    DiffuseLarge,
}

/// Hodgkin lymphoma subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum HodgkinSubtype {
    Classical,
    NodularLp,
}

impl ProcessType {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "reactive" => Some(ProcessType::Reactive),
            "lymphoproliferative" => Some(ProcessType::Lymphoproliferative),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            ProcessType::Reactive => "reactive",
            ProcessType::Lymphoproliferative => "lymphoproliferative",
        }
    }
}

impl LymphomaFamily {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "b-cell" => Some(LymphomaFamily::BCell),
            "t-cell" => Some(LymphomaFamily::TCell),
            "hodgkin" => Some(LymphomaFamily::Hodgkin),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            LymphomaFamily::BCell => "b-cell",
            LymphomaFamily::TCell => "t-cell",
            LymphomaFamily::Hodgkin => "hodgkin",
        }
    }
}

impl BCellSubtype {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "follicular" => Some(BCellSubtype::Follicular),
            "diffuse-large" => Some(BCellSubtype::DiffuseLarge),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            BCellSubtype::Follicular => "follicular",
            BCellSubtype::DiffuseLarge => "diffuse-large",
        }
    }
}

impl HodgkinSubtype {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "classical" => Some(HodgkinSubtype::Classical),
            "nodular-lp" => Some(HodgkinSubtype::NodularLp),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            HodgkinSubtype::Classical => "classical",
            HodgkinSubtype::NodularLp => "nodular-lp",
        }
    }
}

/// Report branch, one per composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisBranch {
    /// Reactive lymphoid hyperplasia.
    Reactive,
    /// Follicular lymphoma, grade 1 to 2.
    FollicularLymphoma,
    /// Diffuse large B-cell lymphoma.
    Dlbcl,
    /// T-cell lymphoma.
    TCellLymphoma,
    /// Classic Hodgkin lymphoma.
    ClassicalHodgkin,
    /// Nodular lymphocyte predominant Hodgkin lymphoma.
    NodularLpHodgkin,
}

impl DiagnosisBranch {
    pub fn all() -> &'static [DiagnosisBranch] {
        &[
            DiagnosisBranch::Reactive,
            DiagnosisBranch::FollicularLymphoma,
            DiagnosisBranch::Dlbcl,
            DiagnosisBranch::TCellLymphoma,
            DiagnosisBranch::ClassicalHodgkin,
            DiagnosisBranch::NodularLpHodgkin,
        ]
    }

    /// Report-type code printed on the header line.
    ///
    /// The T-cell report has no synoptic code.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            DiagnosisBranch::Reactive => Some("RLHSYN"),
            DiagnosisBranch::FollicularLymphoma => Some("FLSYN"),
            DiagnosisBranch::Dlbcl => Some("DLBSYN"),
            DiagnosisBranch::TCellLymphoma => None,
            DiagnosisBranch::ClassicalHodgkin => Some("CHLSYN"),
            DiagnosisBranch::NodularLpHodgkin => Some("NLPSYN"),
        }
    }

    /// Diagnosis name as used in the closing sentence.
    pub fn name(&self) -> &'static str {
        match self {
            DiagnosisBranch::Reactive => "reactive lymphoid hyperplasia",
            DiagnosisBranch::FollicularLymphoma => "follicular lymphoma",
            DiagnosisBranch::Dlbcl => "diffuse large B-cell lymphoma",
            DiagnosisBranch::TCellLymphoma => "T-cell lymphoma",
            DiagnosisBranch::ClassicalHodgkin => "classic Hodgkin lymphoma",
            DiagnosisBranch::NodularLpHodgkin => {
                "nodular lymphocyte predominant Hodgkin lymphoma"
            }
        }
    }

    /// Form selections that lead to this branch.
    pub fn selections(&self) -> &'static [(FieldId, &'static str)] {
        match self {
            DiagnosisBranch::Reactive => &[(FieldId::ProcessType, "reactive")],
            DiagnosisBranch::FollicularLymphoma => &[
                (FieldId::ProcessType, "lymphoproliferative"),
                (FieldId::LymphomaType, "b-cell"),
                (FieldId::BCellSubtype, "follicular"),
            ],
            DiagnosisBranch::Dlbcl => &[
                (FieldId::ProcessType, "lymphoproliferative"),
                (FieldId::LymphomaType, "b-cell"),
                (FieldId::BCellSubtype, "diffuse-large"),
            ],
            DiagnosisBranch::TCellLymphoma => &[
                (FieldId::ProcessType, "lymphoproliferative"),
                (FieldId::LymphomaType, "t-cell"),
            ],
            DiagnosisBranch::ClassicalHodgkin => &[
                (FieldId::ProcessType, "lymphoproliferative"),
                (FieldId::LymphomaType, "hodgkin"),
                (FieldId::HodgkinSubtype, "classical"),
            ],
            DiagnosisBranch::NodularLpHodgkin => &[
                (FieldId::ProcessType, "lymphoproliferative"),
                (FieldId::LymphomaType, "hodgkin"),
                (FieldId::HodgkinSubtype, "nodular-lp"),
            ],
        }
    }
}

impl fmt::Display for DiagnosisBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagnosisBranch::Reactive => "reactive",
            DiagnosisBranch::FollicularLymphoma => "follicular_lymphoma",
            DiagnosisBranch::Dlbcl => "dlbcl",
            DiagnosisBranch::TCellLymphoma => "t_cell_lymphoma",
            DiagnosisBranch::ClassicalHodgkin => "classical_hodgkin",
            DiagnosisBranch::NodularLpHodgkin => "nodular_lp_hodgkin",
        };
        f.write_str(s)
    }
}

/// Current diagnosis selections.
///
/// Lower levels are `None` when unselected or when the token is not one of
/// the known options; both cases leave the branch undetermined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DiagnosisPath {
    pub process_type: ProcessType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lymphoma_family: Option<LymphomaFamily>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b_cell_subtype: Option<BCellSubtype>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hodgkin_subtype: Option<HodgkinSubtype>,
}

impl DiagnosisPath {
    /// Read the path from the form.
    ///
    /// Fails with [`Error::MissingRequiredSelection`] when the process type
    /// is absent or not a known option.
    pub fn from_source<S: FormFieldSource + ?Sized>(source: &S) -> Result<Self> {
        let raw = source.raw_value(FieldId::ProcessType);
        let process_type = raw.and_then(ProcessType::from_token).ok_or_else(|| {
            Error::MissingRequiredSelection {
                field: FieldId::ProcessType.as_str(),
                found: raw.map(str::to_string),
            }
        })?;

        Ok(DiagnosisPath {
            process_type,
            lymphoma_family: source
                .raw_value(FieldId::LymphomaType)
                .and_then(LymphomaFamily::from_token),
            b_cell_subtype: source
                .raw_value(FieldId::BCellSubtype)
                .and_then(BCellSubtype::from_token),
            hodgkin_subtype: source
                .raw_value(FieldId::HodgkinSubtype)
                .and_then(HodgkinSubtype::from_token),
        })
    }

    /// Branch selected by this path, or `None` when a lower level is
    /// still open.
    ///
    /// Subtype selections are only consulted under their own family, so a
    /// stale Hodgkin subtype never affects a B-cell path.
    pub fn branch(&self) -> Option<DiagnosisBranch> {
        match self.process_type {
            ProcessType::Reactive => Some(DiagnosisBranch::Reactive),
            ProcessType::Lymphoproliferative => match self.lymphoma_family? {
                LymphomaFamily::TCell => Some(DiagnosisBranch::TCellLymphoma),
                LymphomaFamily::BCell => match self.b_cell_subtype? {
                    BCellSubtype::Follicular => Some(DiagnosisBranch::FollicularLymphoma),
                    BCellSubtype::DiffuseLarge => Some(DiagnosisBranch::Dlbcl),
                },
                LymphomaFamily::Hodgkin => match self.hodgkin_subtype? {
                    HodgkinSubtype::Classical => Some(DiagnosisBranch::ClassicalHodgkin),
                    HodgkinSubtype::NodularLp => Some(DiagnosisBranch::NodularLpHodgkin),
                },
            },
        }
    }

    /// The first selection still needed to reach a branch, if any.
    pub fn pending_field(&self) -> Option<FieldId> {
        match self.process_type {
            ProcessType::Reactive => None,
            ProcessType::Lymphoproliferative => match self.lymphoma_family {
                None => Some(FieldId::LymphomaType),
                Some(LymphomaFamily::TCell) => None,
                Some(LymphomaFamily::BCell) => {
                    self.b_cell_subtype.is_none().then_some(FieldId::BCellSubtype)
                }
                Some(LymphomaFamily::Hodgkin) => self
                    .hodgkin_subtype
                    .is_none()
                    .then_some(FieldId::HodgkinSubtype),
            },
        }
    }
}
