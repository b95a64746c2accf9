//! Select options and their normalization.
//!
//! The backend is inconsistent about how it describes a choice: some endpoints
//! return plain strings, others `{label, value}`, `{value}` or `{name, id}`
//! records. [`RawOption`] recognizes each shape once at the boundary and
//! [`SelectOption`] is what the rest of the code works with.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A scalar that may appear as an option label, value or id.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => f.write_str(s),
            Scalar::Int(n) => write!(f, "{n}"),
            Scalar::Float(n) => write!(f, "{n}"),
            Scalar::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// The option shapes accepted from callers and from the backend.
///
/// Variant order matters: serde tries them top to bottom, so the most
/// specific record shapes come first.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawOption {
    /// `{ "label": .., "value": .. }`
    LabelValue { label: Scalar, value: Scalar },
    /// `{ "name": .., "id": .. }`
    NameId { name: Scalar, id: Scalar },
    /// `{ "value": .. }`
    ValueOnly { value: Scalar },
    /// A bare string (or number), used as both label and value.
    Text(Scalar),
}

impl RawOption {
    /// Try to recognize a JSON value as one of the supported shapes.
    pub fn from_json(value: &Value) -> Option<Self> {
        RawOption::deserialize(value).ok()
    }
}

impl From<&str> for RawOption {
    fn from(s: &str) -> Self {
        RawOption::Text(Scalar::Str(s.to_string()))
    }
}

impl From<String> for RawOption {
    fn from(s: String) -> Self {
        RawOption::Text(Scalar::Str(s))
    }
}

/// A normalized choice: what the user sees and what gets submitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Normalize a JSON value, returning `None` for unrecognized shapes.
    pub fn from_json(value: &Value) -> Option<Self> {
        RawOption::from_json(value).map(Self::from)
    }
}

impl From<RawOption> for SelectOption {
    fn from(raw: RawOption) -> Self {
        match raw {
            RawOption::LabelValue { label, value } => {
                let value = value.to_string();
                let label = label.to_string();
                // An empty label would render as a blank row.
                let label = if label.is_empty() { value.clone() } else { label };
                SelectOption { label, value }
            }
            RawOption::NameId { name, id } => SelectOption {
                label: name.to_string(),
                value: id.to_string(),
            },
            RawOption::ValueOnly { value } => {
                let value = value.to_string();
                SelectOption {
                    label: value.clone(),
                    value,
                }
            }
            RawOption::Text(text) => {
                let text = text.to_string();
                SelectOption {
                    label: text.clone(),
                    value: text,
                }
            }
        }
    }
}

/// Normalize a list of JSON values into options.
///
/// Unrecognized entries are skipped, and later duplicates of an
/// already-seen `value` are dropped. Order is preserved.
pub fn normalize_options<'a>(values: impl IntoIterator<Item = &'a Value>) -> Vec<SelectOption> {
    let mut seen = HashSet::new();
    let mut options = Vec::new();
    for value in values {
        match SelectOption::from_json(value) {
            Some(option) => {
                if seen.insert(option.value.clone()) {
                    options.push(option);
                }
            }
            None => log::warn!("Skipping unrecognized option shape: {}", value),
        }
    }
    options
}

/// Same as [`normalize_options`] for options supplied in code.
pub fn dedup_options(options: impl IntoIterator<Item = SelectOption>) -> Vec<SelectOption> {
    let mut seen = HashSet::new();
    options
        .into_iter()
        .filter(|o| seen.insert(o.value.clone()))
        .collect()
}
