use serde::{Deserialize, Serialize};

use super::value::PropertyValue;

/// The current state of a property as reported by the cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservedProperty {
    pub name: String,
    /// `None` when the property is not set and the cluster default applies.
    pub value: Option<PropertyValue>,
}

impl ObservedProperty {
    pub fn new(name: impl Into<String>, value: Option<PropertyValue>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn present(name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self::new(name, Some(value.into()))
    }

    pub fn absent(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    pub fn is_absent(&self) -> bool {
        self.value.is_none()
    }
}
