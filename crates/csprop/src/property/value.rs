//! Opaque property values and caller-supplied equality.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cluster property value.
///
/// Cluster properties range from booleans (`stonith-enabled`) to integers
/// (`batch-limit`) to free-form strings (`no-quorum-policy`), so the value is
/// kept as whatever scalar the caller declared. Nothing here coerces one
/// variant into another.
///
/// Equality is exact: floats compare bit for bit, so `NaN` equals itself
/// and `0.0` differs from `-0.0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropertyValue::Bool(a), PropertyValue::Bool(b)) => a == b,
            (PropertyValue::Integer(a), PropertyValue::Integer(b)) => a == b,
            (PropertyValue::Float(a), PropertyValue::Float(b)) => a.to_bits() == b.to_bits(),
            (PropertyValue::String(a), PropertyValue::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for PropertyValue {}

impl PropertyValue {
    /// Returns the value as the string the cluster would store.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::Float(x) => write!(f, "{}", x),
            PropertyValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<i32> for PropertyValue {
    fn from(i: i32) -> Self {
        PropertyValue::Integer(i64::from(i))
    }
}

impl From<f64> for PropertyValue {
    fn from(x: f64) -> Self {
        PropertyValue::Float(x)
    }
}

/// Decides whether an observed value already satisfies the desired one.
pub trait ValueComparator: Send + Sync {
    fn matches(&self, observed: &PropertyValue, desired: &PropertyValue) -> bool;
}

impl<F> ValueComparator for F
where
    F: Fn(&PropertyValue, &PropertyValue) -> bool + Send + Sync,
{
    fn matches(&self, observed: &PropertyValue, desired: &PropertyValue) -> bool {
        self(observed, desired)
    }
}

/// Built-in comparison strategies selectable from manifest settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueComparison {
    /// Same variant and same content. `"10"` and `10` differ.
    #[default]
    Exact,
    /// Compare the rendered strings, matching how the CIB stores values.
    Rendered,
}

impl ValueComparator for ValueComparison {
    fn matches(&self, observed: &PropertyValue, desired: &PropertyValue) -> bool {
        match self {
            ValueComparison::Exact => observed == desired,
            ValueComparison::Rendered => observed.render() == desired.render(),
        }
    }
}

impl std::str::FromStr for ValueComparison {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(ValueComparison::Exact),
            "rendered" => Ok(ValueComparison::Rendered),
            _ => Err(format!("Unknown value comparison: {}", s)),
        }
    }
}
