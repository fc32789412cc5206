//! Form field identifiers.
//!
//! Every control on the lymphoid biopsy form has a fixed key known in
//! advance. Keys use the kebab-case ids of the form controls, so a findings
//! document written by the hosting front end can be read without mapping.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Value of a single field as seen by classification and composition.
///
/// `None` means the control has no selection (or holds only whitespace).
pub type FieldValue<'a> = Option<&'a str>;

/// How a field is filled in on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Drives which report branch is composed.
    Dispatch,
    /// Dropdown with descriptive option text.
    Selection,
    /// Immunostain marker scored `positive` / `negative`.
    Marker,
    /// Free-text input (percentages, proliferation index).
    FreeText,
    /// Read-only, refreshed from marker fields.
    Derived,
}

/// Section of the form a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldGroup {
    Diagnosis,
    Histology,
    Cytology,
    Immunostains,
    Classification,
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldGroup::Diagnosis => write!(f, "diagnosis"),
            FieldGroup::Histology => write!(f, "histology"),
            FieldGroup::Cytology => write!(f, "cytology"),
            FieldGroup::Immunostains => write!(f, "immunostains"),
            FieldGroup::Classification => write!(f, "classification"),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Dispatch => write!(f, "dispatch"),
            FieldKind::Selection => write!(f, "selection"),
            FieldKind::Marker => write!(f, "marker"),
            FieldKind::FreeText => write!(f, "free_text"),
            FieldKind::Derived => write!(f, "derived"),
        }
    }
}

/// Identifier of a form control.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum FieldId {
    // Diagnosis path
    ProcessType,
    LymphomaType,
    BCellSubtype,
    HodgkinSubtype,

    // Histology
    Architecture,
    LymphNodeSize,
    FollicularPattern,
    FollicleSize,
    MantleZones,
    Paracortex,
    Eosinophils,
    PlasmaCells,
    Necrosis,
    Granulomas,
    Capsule,

    // Cytology
    CellSize,
    NuclearContours,
    ChromatinQuality,
    Nucleoli,
    MitoticActivity,

    // Immunostains
    Cd20,
    Cd3,
    Cd30,
    Cd15,
    Ki67,

    // DLBCL classification markers
    HansCd10,
    HansBcl6,
    HansMum1,
    Bcl2Status,
    MycStatus,
    EberStatus,
    MycPercentage,
    Bcl2Percentage,

    // Derived, read-only
    GcbVsAbc,
    Bcl2MycCoexpression,
    DoubleHitLymphoma,
}

impl FieldId {
    /// All fields in form order.
    pub fn all() -> &'static [FieldId] {
        &[
            FieldId::ProcessType,
            FieldId::LymphomaType,
            FieldId::BCellSubtype,
            FieldId::HodgkinSubtype,
            FieldId::Architecture,
            FieldId::LymphNodeSize,
            FieldId::FollicularPattern,
            FieldId::FollicleSize,
            FieldId::MantleZones,
            FieldId::Paracortex,
            FieldId::Eosinophils,
            FieldId::PlasmaCells,
            FieldId::Necrosis,
            FieldId::Granulomas,
            FieldId::Capsule,
            FieldId::CellSize,
            FieldId::NuclearContours,
            FieldId::ChromatinQuality,
            FieldId::Nucleoli,
            FieldId::MitoticActivity,
            FieldId::Cd20,
            FieldId::Cd3,
            FieldId::Cd30,
            FieldId::Cd15,
            FieldId::Ki67,
            FieldId::HansCd10,
            FieldId::HansBcl6,
            FieldId::HansMum1,
            FieldId::Bcl2Status,
            FieldId::MycStatus,
            FieldId::EberStatus,
            FieldId::MycPercentage,
            FieldId::Bcl2Percentage,
            FieldId::GcbVsAbc,
            FieldId::Bcl2MycCoexpression,
            FieldId::DoubleHitLymphoma,
        ]
    }

    /// The form control id.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::ProcessType => "process-type",
            FieldId::LymphomaType => "lymphoma-type",
            FieldId::BCellSubtype => "b-cell-subtype",
            FieldId::HodgkinSubtype => "hodgkin-subtype",
            FieldId::Architecture => "architecture",
            FieldId::LymphNodeSize => "lymph-node-size",
            FieldId::FollicularPattern => "follicular-pattern",
            FieldId::FollicleSize => "follicle-size",
            FieldId::MantleZones => "mantle-zones",
            FieldId::Paracortex => "paracortex",
            FieldId::Eosinophils => "eosinophils",
            FieldId::PlasmaCells => "plasma-cells",
            FieldId::Necrosis => "necrosis",
            FieldId::Granulomas => "granulomas",
            FieldId::Capsule => "capsule",
            FieldId::CellSize => "cell-size",
            FieldId::NuclearContours => "nuclear-contours",
            FieldId::ChromatinQuality => "chromatin-quality",
            FieldId::Nucleoli => "nucleoli",
            FieldId::MitoticActivity => "mitotic-activity",
            FieldId::Cd20 => "cd20",
            FieldId::Cd3 => "cd3",
            FieldId::Cd30 => "cd30",
            FieldId::Cd15 => "cd15",
            FieldId::Ki67 => "ki67",
            FieldId::HansCd10 => "hans-cd10",
            FieldId::HansBcl6 => "hans-bcl6",
            FieldId::HansMum1 => "hans-mum1",
            FieldId::Bcl2Status => "bcl2-status",
            FieldId::MycStatus => "myc-status",
            FieldId::EberStatus => "eber-status",
            FieldId::MycPercentage => "myc-percentage",
            FieldId::Bcl2Percentage => "bcl2-percentage",
            FieldId::GcbVsAbc => "gcb-vs-abc",
            FieldId::Bcl2MycCoexpression => "bcl2-myc-coexpression",
            FieldId::DoubleHitLymphoma => "double-hit-lymphoma",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldId::ProcessType
            | FieldId::LymphomaType
            | FieldId::BCellSubtype
            | FieldId::HodgkinSubtype => FieldKind::Dispatch,

            FieldId::HansCd10
            | FieldId::HansBcl6
            | FieldId::HansMum1
            | FieldId::Bcl2Status
            | FieldId::MycStatus => FieldKind::Marker,

            FieldId::Ki67 | FieldId::MycPercentage | FieldId::Bcl2Percentage => {
                FieldKind::FreeText
            }

            FieldId::GcbVsAbc | FieldId::Bcl2MycCoexpression | FieldId::DoubleHitLymphoma => {
                FieldKind::Derived
            }

            _ => FieldKind::Selection,
        }
    }

    pub fn group(&self) -> FieldGroup {
        match self {
            FieldId::ProcessType
            | FieldId::LymphomaType
            | FieldId::BCellSubtype
            | FieldId::HodgkinSubtype => FieldGroup::Diagnosis,

            FieldId::Architecture
            | FieldId::LymphNodeSize
            | FieldId::FollicularPattern
            | FieldId::FollicleSize
            | FieldId::MantleZones
            | FieldId::Paracortex
            | FieldId::Eosinophils
            | FieldId::PlasmaCells
            | FieldId::Necrosis
            | FieldId::Granulomas
            | FieldId::Capsule => FieldGroup::Histology,

            FieldId::CellSize
            | FieldId::NuclearContours
            | FieldId::ChromatinQuality
            | FieldId::Nucleoli
            | FieldId::MitoticActivity => FieldGroup::Cytology,

            FieldId::Cd20 | FieldId::Cd3 | FieldId::Cd30 | FieldId::Cd15 | FieldId::Ki67 => {
                FieldGroup::Immunostains
            }

            _ => FieldGroup::Classification,
        }
    }

    /// Whether the field is read-only (recomputed, never entered).
    pub fn is_derived(&self) -> bool {
        self.kind() == FieldKind::Derived
    }

    /// Whether a change to this field invalidates the derived classification.
    pub fn is_marker(&self) -> bool {
        self.kind() == FieldKind::Marker
    }

    /// Lower-level diagnosis selections that no longer apply once this
    /// field changes.
    pub fn dependent_selections(&self) -> &'static [FieldId] {
        match self {
            FieldId::ProcessType => &[
                FieldId::LymphomaType,
                FieldId::BCellSubtype,
                FieldId::HodgkinSubtype,
            ],
            FieldId::LymphomaType => &[FieldId::BCellSubtype, FieldId::HodgkinSubtype],
            _ => &[],
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        FieldId::all()
            .iter()
            .copied()
            .find(|f| f.as_str() == key)
            .ok_or_else(|| Error::UnknownField(key.to_string()))
    }
}
