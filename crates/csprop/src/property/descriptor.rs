//! Desired state of one cluster property.

use serde::{Deserialize, Serialize};

use super::value::PropertyValue;
use crate::error::{PropertyError, Result};

/// Whether the property should exist in the CIB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ensure {
    #[default]
    Present,
    /// Remove the property so the cluster falls back to its built-in default.
    Absent,
}

impl std::fmt::Display for Ensure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ensure::Present => write!(f, "present"),
            Ensure::Absent => write!(f, "absent"),
        }
    }
}

/// A validated, immutable description of the desired state of a property.
///
/// Built through [`PropertyDescriptor::present`], [`PropertyDescriptor::absent`]
/// or [`PropertyDescriptor::builder`]; fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    name: String,
    cib: Option<String>,
    replace: bool,
    ensure: Ensure,
    value: Option<PropertyValue>,
}

impl PropertyDescriptor {
    /// A property that must exist with `value`, overwriting divergent values.
    pub fn present(name: impl Into<String>, value: impl Into<PropertyValue>) -> Result<Self> {
        Self::builder(name).value(value).build()
    }

    /// A property that must be removed (reverted to the cluster default).
    pub fn absent(name: impl Into<String>) -> Result<Self> {
        Self::builder(name).ensure(Ensure::Absent).build()
    }

    /// Starts a builder with `ensure = present` and `replace = true`.
    pub fn builder(name: impl Into<String>) -> PropertyDescriptorBuilder {
        PropertyDescriptorBuilder {
            name: name.into(),
            cib: None,
            replace: true,
            ensure: Ensure::Present,
            value: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shadow CIB this property is written to, or `None` for the live CIB.
    pub fn cib(&self) -> Option<&str> {
        self.cib.as_deref()
    }

    pub fn replace(&self) -> bool {
        self.replace
    }

    pub fn ensure(&self) -> Ensure {
        self.ensure
    }

    /// The desired value. Always `Some` when `ensure` is present, always `None` when absent.
    pub fn value(&self) -> Option<&PropertyValue> {
        self.value.as_ref()
    }
}

/// Builder for [`PropertyDescriptor`].
#[derive(Debug, Clone)]
pub struct PropertyDescriptorBuilder {
    name: String,
    cib: Option<String>,
    replace: bool,
    ensure: Ensure,
    value: Option<PropertyValue>,
}

impl PropertyDescriptorBuilder {
    /// Sets the shadow CIB. An empty string means "apply directly".
    pub fn cib(mut self, cib: impl Into<String>) -> Self {
        let cib = cib.into();
        self.cib = if cib.is_empty() { None } else { Some(cib) };
        self
    }

    pub fn replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    pub fn ensure(mut self, ensure: Ensure) -> Self {
        self.ensure = ensure;
        self
    }

    pub fn value(mut self, value: impl Into<PropertyValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn maybe_value(mut self, value: Option<PropertyValue>) -> Self {
        self.value = value;
        self
    }

    /// Validates and freezes the descriptor.
    pub fn build(self) -> Result<PropertyDescriptor> {
        if self.name.is_empty() {
            return Err(PropertyError::InvalidDescriptor {
                name: self.name,
                reason: "name is required".to_string(),
            });
        }

        let value = match self.ensure {
            Ensure::Present => match self.value {
                Some(value) => Some(value),
                None => {
                    return Err(PropertyError::InvalidDescriptor {
                        name: self.name,
                        reason: "value is required when ensure is present".to_string(),
                    })
                }
            },
            Ensure::Absent => {
                if self.value.is_some() {
                    log::debug!(
                        "Ignoring value of property '{}' because ensure is absent",
                        self.name
                    );
                }
                None
            }
        };

        Ok(PropertyDescriptor {
            name: self.name,
            cib: self.cib,
            replace: self.replace,
            ensure: self.ensure,
            value,
        })
    }
}
