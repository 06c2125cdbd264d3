//! In-memory CIB with a YAML snapshot format.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{MutationExecutor, ObservedStateProvider};
use crate::dependency::ShadowCatalog;
use crate::error::{ConfigError, ProviderError};
use crate::property::{Action, ObservedProperty, PropertyValue};

/// Serializable cluster property state: the live section plus shadow copies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CibSnapshot {
    /// Properties of the live CIB.
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,

    /// Shadow CIBs by name, each with its own property section.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub shadows: BTreeMap<String, BTreeMap<String, PropertyValue>>,
}

/// A thread-safe CIB held in memory.
#[derive(Debug, Default)]
pub struct InMemoryCib {
    state: RwLock<CibSnapshot>,
}

impl InMemoryCib {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: CibSnapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
        }
    }

    /// Loads a snapshot file. A missing file yields an empty CIB.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("Snapshot {} not found, starting empty", path.display());
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let snapshot: CibSnapshot =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseYaml {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(Self::from_snapshot(snapshot))
    }

    /// Writes the current state to `path` as YAML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_yaml::to_string(&self.snapshot())
            .map_err(|e| ConfigError::SerializeYaml(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(path, content).map_err(|e| ConfigError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> CibSnapshot {
        self.read().clone()
    }

    /// Creates a shadow CIB as a copy of the live properties.
    /// Returns false if it already existed.
    pub fn create_shadow(&self, name: &str) -> bool {
        let mut state = self.write();
        if state.shadows.contains_key(name) {
            return false;
        }
        let copy = state.properties.clone();
        state.shadows.insert(name.to_string(), copy);
        true
    }

    /// Replaces the live properties with the shadow's and drops the shadow.
    pub fn commit_shadow(&self, name: &str) -> Result<(), ProviderError> {
        let mut state = self.write();
        let shadow = state
            .shadows
            .remove(name)
            .ok_or_else(|| ProviderError::ShadowNotFound(name.to_string()))?;
        state.properties = shadow;
        log::info!("Committed shadow CIB '{}'", name);
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, CibSnapshot> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CibSnapshot> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl ObservedStateProvider for InMemoryCib {
    fn fetch_property(
        &self,
        name: &str,
        cib: Option<&str>,
    ) -> Result<ObservedProperty, ProviderError> {
        let state = self.read();
        let section = match cib {
            None => &state.properties,
            Some(shadow) => state
                .shadows
                .get(shadow)
                .ok_or_else(|| ProviderError::ShadowNotFound(shadow.to_string()))?,
        };
        Ok(ObservedProperty::new(name, section.get(name).cloned()))
    }
}

impl MutationExecutor for InMemoryCib {
    fn apply_action(&self, name: &str, cib: Option<&str>, action: &Action) -> Result<(), ProviderError> {
        let mut state = self.write();
        let section = match cib {
            None => &mut state.properties,
            Some(shadow) => state
                .shadows
                .get_mut(shadow)
                .ok_or_else(|| ProviderError::ShadowNotFound(shadow.to_string()))?,
        };
        match action {
            Action::NoOp => {}
            Action::SetValue(value) => {
                section.insert(name.to_string(), value.clone());
            }
            Action::RemoveToDefault => {
                section.remove(name);
            }
        }
        Ok(())
    }
}

impl ShadowCatalog for InMemoryCib {
    fn shadow_exists(&self, name: &str) -> bool {
        self.read().shadows.contains_key(name)
    }
}
