//! Findings set and the field-source seam.
//!
//! A [`FindingsSet`] is a snapshot of the form: one entry per control that
//! currently has a value. Each entry keeps the raw option token used for
//! comparisons (`positive`, `none`, `diffuse-large`) and, optionally, the
//! option text shown to the pathologist, which is what reports quote.
//!
//! Composers never see the set directly; they read through
//! [`FormFieldSource`], so a hosting front end can supply values from its
//! own widget state.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::field::{FieldId, FieldValue};

/// Read access to the current form values.
pub trait FormFieldSource {
    /// Human-readable text of the selected option, or `None` if unselected.
    fn field_text(&self, field: FieldId) -> FieldValue<'_>;

    /// Underlying value token of the selection, or `None` if unselected.
    fn raw_value(&self, field: FieldId) -> FieldValue<'_>;

    /// Whether the field has any selection.
    fn has_selection(&self, field: FieldId) -> bool {
        self.raw_value(field).is_some()
    }

    /// Option text, unless the raw token equals `excluded`.
    ///
    /// Several clauses are dropped when the pathologist picked `none`.
    fn text_unless(&self, field: FieldId, excluded: &str) -> FieldValue<'_> {
        match self.raw_value(field) {
            Some(raw) if raw == excluded => None,
            Some(_) => self.field_text(field),
            None => None,
        }
    }
}

/// A single field entry in a findings document.
///
/// Either a bare value token (displayed as-is) or a token plus its option
/// text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged, deny_unknown_fields)]
pub enum FieldEntry {
    /// Raw value that is also the displayed text (free-text inputs).
    Plain(String),
    /// Raw value token with the displayed option text.
    Labeled {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
}

impl FieldEntry {
    /// Entry whose displayed text differs from its token.
    pub fn labeled(value: impl Into<String>, text: impl Into<String>) -> Self {
        FieldEntry::Labeled {
            value: value.into(),
            text: Some(text.into()),
        }
    }

    /// Raw value token, `None` when blank.
    pub fn value(&self) -> FieldValue<'_> {
        let raw = match self {
            FieldEntry::Plain(v) => v.as_str(),
            FieldEntry::Labeled { value, .. } => value.as_str(),
        };
        non_blank(raw)
    }

    /// Displayed text, falling back to the raw token.
    pub fn text(&self) -> FieldValue<'_> {
        self.value()?;
        match self {
            FieldEntry::Labeled {
                text: Some(text), ..
            } => non_blank(text).or_else(|| self.value()),
            _ => self.value(),
        }
    }
}

impl From<&str> for FieldEntry {
    fn from(value: &str) -> Self {
        FieldEntry::Plain(value.to_string())
    }
}

impl From<String> for FieldEntry {
    fn from(value: String) -> Self {
        FieldEntry::Plain(value)
    }
}

fn non_blank(s: &str) -> FieldValue<'_> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Snapshot of the form keyed by control id.
///
/// On input a `null` entry is an unselected control and is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct FindingsSet {
    entries: BTreeMap<FieldId, FieldEntry>,
}

impl<'de> Deserialize<'de> for FindingsSet {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<FieldId, Option<FieldEntry>>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(field, entry)| entry.map(|e| (field, e)))
            .collect())
    }
}

impl FindingsSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: FieldId, entry: impl Into<FieldEntry>) -> Self {
        self.insert(field, entry);
        self
    }

    /// Set a field, replacing any previous entry. Returns the previous entry.
    pub fn insert(&mut self, field: FieldId, entry: impl Into<FieldEntry>) -> Option<FieldEntry> {
        self.entries.insert(field, entry.into())
    }

    /// Clear a field. Returns the previous entry.
    pub fn remove(&mut self, field: FieldId) -> Option<FieldEntry> {
        self.entries.remove(&field)
    }

    pub fn get(&self, field: FieldId) -> Option<&FieldEntry> {
        self.entries.get(&field)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of fields with a non-blank value.
    pub fn selected_count(&self) -> usize {
        self.entries.values().filter(|e| e.value().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.selected_count() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &FieldEntry)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    /// Apply a `key=value` assignment as typed on a command line.
    ///
    /// `key=value|text` sets both the token and its displayed text; an empty
    /// value clears the field.
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<FieldId> {
        let (field, entry) = parse_assignment(assignment)?;
        match entry {
            Some(entry) => self.insert(field, entry),
            None => self.remove(field),
        };
        Ok(field)
    }
}

/// Parse `key=value` or `key=value|text`.
///
/// Returns `None` for the entry when the value is blank (a clear).
pub fn parse_assignment(assignment: &str) -> Result<(FieldId, Option<FieldEntry>)> {
    let (key, rest) = assignment
        .split_once('=')
        .ok_or_else(|| Error::InvalidAssignment(assignment.to_string()))?;
    let field: FieldId = key.trim().parse()?;

    let entry = match rest.split_once('|') {
        Some((value, text)) => FieldEntry::labeled(value, text),
        None => FieldEntry::from(rest),
    };

    Ok((field, entry.value().is_some().then_some(entry)))
}

impl FormFieldSource for FindingsSet {
    fn field_text(&self, field: FieldId) -> FieldValue<'_> {
        self.entries.get(&field).and_then(FieldEntry::text)
    }

    fn raw_value(&self, field: FieldId) -> FieldValue<'_> {
        self.entries.get(&field).and_then(FieldEntry::value)
    }
}

impl FromIterator<(FieldId, FieldEntry)> for FindingsSet {
    fn from_iter<I: IntoIterator<Item = (FieldId, FieldEntry)>>(iter: I) -> Self {
        FindingsSet {
            entries: iter.into_iter().collect(),
        }
    }
}

/// On-disk / on-wire form of a findings set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FindingsDocument {
    /// Document schema version (optional on input).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,

    /// Field values keyed by form control id.
    #[serde(default)]
    pub fields: FindingsSet,
}

impl FindingsDocument {
    /// Parse a findings document from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let doc: FindingsDocument = serde_json::from_str(text)?;
        Ok(doc)
    }

    pub fn into_findings(self) -> FindingsSet {
        self.fields
    }
}
