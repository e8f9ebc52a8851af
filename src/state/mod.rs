//! Session state
//!
//! Everything learned about the user so far. Created at session start,
//! only grows, and is dropped with the process.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Field holding the user's monthly income, the base for relative amounts
pub const MONTHLY_INCOME: &str = "monthly_income";

/// Field holding the target saving period in months
pub const SAVINGS_PERIOD: &str = "savings_period";

/// A single fact about the user.
///
/// Parsed answers are always `Amount` (won or months). `Text` only arrives
/// through a seeded starting state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Amount(i64),
    Text(String),
}

impl FieldValue {
    pub fn as_amount(&self) -> Option<i64> {
        match self {
            FieldValue::Amount(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Amount(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Amount(i64::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Amount(v) => write!(f, "{}", v),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Mapping from field name to value.
///
/// Keys are never removed; `set` overwrites a re-supplied field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserState {
    fields: BTreeMap<String, FieldValue>,
}

impl UserState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Numeric value of a field, `None` when absent or free text
    pub fn amount(&self, field: &str) -> Option<i64> {
        self.fields.get(field).and_then(FieldValue::as_amount)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// JSON object embedded into agent prompts
    pub fn to_prompt_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
