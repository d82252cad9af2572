use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Typed value for a candidate attribute or a rule operand.
///
/// Comparisons never coerce between variants: `Number(0.0)`, `Text("0")` and
/// `Boolean(false)` are three distinct values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Boolean(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl AttributeValue {
    pub const fn kind(&self) -> &'static str {
        match self {
            AttributeValue::Boolean(_) => "boolean",
            AttributeValue::Number(_) => "number",
            AttributeValue::Text(_) => "text",
            AttributeValue::List(_) => "list",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Boolean(value) => write!(f, "{value}"),
            AttributeValue::Number(value) => write!(f, "{value}"),
            AttributeValue::Text(value) => f.write_str(value),
            AttributeValue::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Boolean(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<u32> for AttributeValue {
    fn from(value: u32) -> Self {
        AttributeValue::Number(f64::from(value))
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Number(f64::from(value))
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(items: Vec<String>) -> Self {
        AttributeValue::List(items)
    }
}

impl From<Vec<&str>> for AttributeValue {
    fn from(items: Vec<&str>) -> Self {
        AttributeValue::List(items.into_iter().map(str::to_string).collect())
    }
}

/// Renders an optional value the way explanations show it; absent values read `undefined`.
pub(crate) fn describe(value: Option<&AttributeValue>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "undefined".to_string(),
    }
}

/// Open attribute mapping describing the candidate under evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateRecord {
    attributes: BTreeMap<String, AttributeValue>,
}

impl CandidateRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert used by fixtures and adapters.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.attributes.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, AttributeValue> {
        self.attributes.iter()
    }
}

impl From<BTreeMap<String, AttributeValue>> for CandidateRecord {
    fn from(attributes: BTreeMap<String, AttributeValue>) -> Self {
        Self { attributes }
    }
}

impl<K> FromIterator<(K, AttributeValue)> for CandidateRecord
where
    K: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, AttributeValue)>>(iter: I) -> Self {
        Self {
            attributes: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}
