//! Builders for descriptors and seeded CIBs.

#![allow(dead_code)]

use std::path::PathBuf;

use csprop::{Action, InMemoryCib, MutationExecutor, PropertyDescriptor, PropertyValue};

/// Path to a manifest fixture directory.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/manifests")
        .join(name)
}

/// Builder for an `InMemoryCib` with pre-set properties.
#[derive(Default)]
pub struct CibBuilder {
    live: Vec<(String, PropertyValue)>,
    shadows: Vec<(String, Vec<(String, PropertyValue)>)>,
}

impl CibBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property in the live CIB.
    pub fn property(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.live.push((name.to_string(), value.into()));
        self
    }

    /// Add a shadow CIB (copied from the live properties set so far) with extra properties.
    pub fn shadow(mut self, name: &str, properties: &[(&str, PropertyValue)]) -> Self {
        self.shadows.push((
            name.to_string(),
            properties
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        ));
        self
    }

    pub fn build(self) -> InMemoryCib {
        let cib = InMemoryCib::new();
        for (name, value) in self.live {
            cib.apply_action(&name, None, &Action::SetValue(value))
                .expect("live write");
        }
        for (shadow, properties) in self.shadows {
            cib.create_shadow(&shadow);
            for (name, value) in properties {
                cib.apply_action(&name, Some(&shadow), &Action::SetValue(value))
                    .expect("shadow write");
            }
        }
        cib
    }
}

/// Shorthand for a `replace = false` descriptor.
pub fn seed_only(name: &str, value: impl Into<PropertyValue>) -> PropertyDescriptor {
    PropertyDescriptor::builder(name)
        .value(value)
        .replace(false)
        .build()
        .expect("valid descriptor")
}
