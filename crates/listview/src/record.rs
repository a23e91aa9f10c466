//! Item shape abstraction for the list engine

use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

/// Named field of a record type
///
/// Implemented by a small field-less enum per resource. The name is the one
/// the backend uses for the JSON field, so it doubles as the wire name of a
/// sort key.
pub trait FieldKey: Copy + Eq + fmt::Debug + Serialize + DeserializeOwned + 'static {
    /// Field name as exposed to users and serialized state
    fn name(self) -> &'static str;

    /// Every field of the record type
    fn all() -> &'static [Self];

    /// Look a field up by name (ASCII case-insensitive)
    fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::all()
            .iter()
            .copied()
            .find(|field| field.name().eq_ignore_ascii_case(name))
    }
}

/// Value of one record field, borrowed from the record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Plain string
    Text(&'a str),

    /// String array; matches when any element matches
    List(&'a [String]),

    /// ISO-8601 timestamp kept in its string form
    Timestamp(&'a str),

    /// Absent optional field, treated as the empty string
    Missing,
}

impl<'a> FieldValue<'a> {
    /// Case-insensitive substring match against an already case-folded needle
    pub fn contains_folded(&self, needle: &str) -> bool {
        match self {
            FieldValue::Text(s) | FieldValue::Timestamp(s) => s.to_lowercase().contains(needle),
            FieldValue::List(items) => items
                .iter()
                .any(|item| item.to_lowercase().contains(needle)),
            FieldValue::Missing => "".contains(needle),
        }
    }

    /// Case-folded string form used for ordering
    pub fn sort_key(&self) -> String {
        match self {
            FieldValue::Text(s) | FieldValue::Timestamp(s) => s.to_lowercase(),
            FieldValue::List(items) => items.join(",").to_lowercase(),
            FieldValue::Missing => String::new(),
        }
    }

    /// Individual string values, used for facet listings
    pub fn values(&self) -> Vec<&'a str> {
        match *self {
            FieldValue::Text(s) | FieldValue::Timestamp(s) => vec![s],
            FieldValue::List(items) => items.iter().map(String::as_str).collect(),
            FieldValue::Missing => Vec::new(),
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        FieldValue::Text(value)
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(value: &'a String) -> Self {
        FieldValue::Text(value.as_str())
    }
}

impl<'a> From<&'a [String]> for FieldValue<'a> {
    fn from(value: &'a [String]) -> Self {
        FieldValue::List(value)
    }
}

impl<'a> From<&'a Vec<String>> for FieldValue<'a> {
    fn from(value: &'a Vec<String>) -> Self {
        FieldValue::List(value.as_slice())
    }
}

impl<'a> From<Option<&'a String>> for FieldValue<'a> {
    fn from(value: Option<&'a String>) -> Self {
        match value {
            Some(s) => FieldValue::Text(s.as_str()),
            None => FieldValue::Missing,
        }
    }
}

/// An item the engine can list
///
/// Identity is the `id`; two records with the same id are the same item.
pub trait Record {
    /// Field enumeration of this record type
    type Field: FieldKey;

    /// Unique identifier
    fn id(&self) -> &str;

    /// Borrow one field
    fn field(&self, field: Self::Field) -> FieldValue<'_>;
}
