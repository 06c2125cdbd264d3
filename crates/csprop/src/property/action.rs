use serde::{Deserialize, Serialize};
use std::fmt;

use super::value::PropertyValue;

/// What has to happen to bring a property in line with its descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "camelCase")]
pub enum Action {
    NoOp,
    SetValue(PropertyValue),
    /// Delete the property, reverting it to the cluster-defined default.
    RemoveToDefault,
}

impl Action {
    /// Returns true if executing this action would change the CIB.
    pub fn is_change(&self) -> bool {
        !matches!(self, Action::NoOp)
    }

    /// Short verb used in logs and error messages.
    pub fn verb(&self) -> &'static str {
        match self {
            Action::NoOp => "no-op",
            Action::SetValue(_) => "set",
            Action::RemoveToDefault => "remove",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::NoOp => write!(f, "no-op"),
            Action::SetValue(v) => write!(f, "set to '{}'", v),
            Action::RemoveToDefault => write!(f, "remove (revert to default)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_action() {
        let json = serde_json::to_string(&Action::SetValue(PropertyValue::from("false"))).unwrap();
        assert_eq!(json, r#"{"action":"setValue","value":"false"}"#);

        let json = serde_json::to_string(&Action::RemoveToDefault).unwrap();
        assert_eq!(json, r#"{"action":"removeToDefault"}"#);
    }

    #[test]
    fn test_is_change() {
        assert!(!Action::NoOp.is_change());
        assert!(Action::RemoveToDefault.is_change());
        assert!(Action::SetValue(PropertyValue::from(1)).is_change());
    }
}
