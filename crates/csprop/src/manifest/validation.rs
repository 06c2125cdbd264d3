//! Cross-resource validation for property manifests.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use super::loader::LoadedConfig;
use super::resource::{ClusterPropertyResource, ShadowResource};
use crate::dependency::ShadowCatalog;
use crate::error::ConfigError;
use crate::property::Ensure;

// Pacemaker property and shadow names: `no-quorum-policy`, `cluster-recheck-interval`, ...
static RE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.\-]*$").unwrap());

/// Validator for loaded manifests. Collects every problem instead of stopping at the first.
pub struct ConfigValidator {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ConfigValidator {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Validates the entire loaded configuration.
    pub fn validate(&mut self, config: &LoadedConfig) -> Result<(), ConfigError> {
        self.errors.clear();
        self.warnings.clear();

        for shadow in &config.shadows {
            self.validate_shadow(&shadow.resource);
        }

        for property in &config.properties {
            self.validate_property(&property.resource);
        }

        // Cross-resource validation
        self.validate_shadow_references(config);
        self.validate_unique_names(config);

        for warning in &self.warnings {
            log::warn!("{}", warning);
        }

        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(self.errors.join("; ")))
        }
    }

    fn validate_shadow(&mut self, shadow: &ShadowResource) {
        let name = &shadow.metadata.name;

        if name.is_empty() {
            self.errors.push("Shadow: name is required".to_string());
            return;
        }

        if !is_valid_name(name) {
            self.errors.push(format!(
                "Shadow '{}': name may only contain letters, digits, '.', '_' and '-'",
                name
            ));
        }
    }

    fn validate_property(&mut self, property: &ClusterPropertyResource) {
        let name = &property.metadata.name;

        if name.is_empty() {
            self.errors
                .push("ClusterProperty: name is required".to_string());
            return;
        }

        if !is_valid_name(name) {
            self.errors.push(format!(
                "ClusterProperty '{}': name may only contain letters, digits, '.', '_' and '-'",
                name
            ));
        }

        match property.spec.ensure {
            Ensure::Present => {
                if property.spec.value.is_none() {
                    self.errors.push(format!(
                        "ClusterProperty '{}': value is required when ensure is present",
                        name
                    ));
                }
            }
            Ensure::Absent => {
                if property.spec.value.is_some() {
                    self.warnings.push(format!(
                        "ClusterProperty '{}': value is ignored when ensure is absent",
                        name
                    ));
                }
                if !property.spec.replace {
                    self.warnings.push(format!(
                        "ClusterProperty '{}': replace has no effect on removal",
                        name
                    ));
                }
            }
        }
    }

    /// Every `cib` must name a declared Shadow resource.
    fn validate_shadow_references(&mut self, config: &LoadedConfig) {
        for property in &config.properties {
            let Some(cib) = property.resource.spec.cib.as_deref() else {
                continue;
            };
            if cib.is_empty() {
                continue;
            }
            if !config.shadow_exists(cib) {
                self.errors.push(format!(
                    "ClusterProperty '{}': cib '{}' does not match any Shadow resource",
                    property.resource.metadata.name, cib
                ));
            }
        }
    }

    fn validate_unique_names(&mut self, config: &LoadedConfig) {
        let mut seen = HashSet::new();
        for property in &config.properties {
            let name = property.resource.metadata.name.as_str();
            if !name.is_empty() && !seen.insert(name) {
                self.errors.push(format!(
                    "ClusterProperty '{}': declared more than once",
                    name
                ));
            }
        }

        let mut seen = HashSet::new();
        for shadow in &config.shadows {
            let name = shadow.resource.metadata.name.as_str();
            if !name.is_empty() && !seen.insert(name) {
                self.errors
                    .push(format!("Shadow '{}': declared more than once", name));
            }
        }
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn is_valid_name(s: &str) -> bool {
    RE_NAME.is_match(s)
}
