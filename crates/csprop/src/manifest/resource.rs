//! K8s-style resource types for property manifests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;
use crate::property::{Ensure, PropertyDescriptor, PropertyValue, ValueComparison};

/// The API version for all csprop resources.
pub const API_VERSION: &str = "csprop.io/v1";

/// The kind of resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Settings,
    Shadow,
    ClusterProperty,
}

impl ResourceKind {
    /// Returns the directory name for storing resources of this kind.
    pub fn directory(&self) -> Option<&'static str> {
        match self {
            ResourceKind::Settings => None, // settings.yaml at root
            ResourceKind::Shadow => Some("shadows"),
            ResourceKind::ClusterProperty => Some("properties"),
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Settings => write!(f, "Settings"),
            ResourceKind::Shadow => write!(f, "Shadow"),
            ResourceKind::ClusterProperty => write!(f, "ClusterProperty"),
        }
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "settings" => Ok(ResourceKind::Settings),
            "shadow" => Ok(ResourceKind::Shadow),
            "clusterproperty" => Ok(ResourceKind::ClusterProperty),
            _ => Err(format!("Unknown resource kind: {}", s)),
        }
    }
}

/// Metadata for a resource, following K8s conventions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectMeta {
    /// The unique name of the resource within its kind.
    pub name: String,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub annotations: HashMap<String, String>,
}

impl ObjectMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: HashMap::new(),
            annotations: HashMap::new(),
        }
    }
}

/// A generic K8s-style resource wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource<T> {
    /// API version, should always be `csprop.io/v1`.
    pub api_version: String,

    pub kind: ResourceKind,

    pub metadata: ObjectMeta,

    #[serde(default)]
    pub spec: T,
}

impl<T> Resource<T> {
    /// Creates a new resource with the given kind and spec.
    pub fn new(kind: ResourceKind, name: impl Into<String>, spec: T) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind,
            metadata: ObjectMeta::new(name),
            spec,
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}

// ============================================================================
// Settings Resource
// ============================================================================

/// Settings specification - how a reconciliation pass behaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsSpec {
    /// How observed values are compared with desired ones.
    #[serde(default)]
    pub value_comparison: ValueComparison,

    /// Evaluate properties of different CIB scopes concurrently.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SettingsSpec {
    fn default() -> Self {
        Self {
            value_comparison: ValueComparison::default(),
            parallel: true,
        }
    }
}

/// Type alias for Settings resource.
pub type SettingsResource = Resource<SettingsSpec>;

// ============================================================================
// Shadow Resource
// ============================================================================

/// Shadow specification - declares a shadow CIB that properties can be staged in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShadowSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Type alias for Shadow resource.
pub type ShadowResource = Resource<ShadowSpec>;

// ============================================================================
// ClusterProperty Resource
// ============================================================================

/// ClusterProperty specification - desired state of one cluster property.
///
/// The property name is `metadata.name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterPropertySpec {
    #[serde(default)]
    pub ensure: Ensure,

    /// Desired value. Any scalar; required when `ensure` is present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<PropertyValue>,

    /// Shadow CIB to stage the change in. Must match a Shadow resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cib: Option<String>,

    /// Overwrite an existing value that differs from `value`.
    #[serde(default = "default_true")]
    pub replace: bool,
}

impl Default for ClusterPropertySpec {
    fn default() -> Self {
        Self {
            ensure: Ensure::Present,
            value: None,
            cib: None,
            replace: true,
        }
    }
}

/// Type alias for ClusterProperty resource.
pub type ClusterPropertyResource = Resource<ClusterPropertySpec>;

impl ClusterPropertyResource {
    /// Builds the validated descriptor for this resource.
    pub fn to_descriptor(&self) -> Result<PropertyDescriptor> {
        PropertyDescriptor::builder(self.metadata.name.clone())
            .cib(self.spec.cib.clone().unwrap_or_default())
            .replace(self.spec.replace)
            .ensure(self.spec.ensure)
            .maybe_value(self.spec.value.clone())
            .build()
    }
}

// ============================================================================
// Any Resource (for generic handling)
// ============================================================================

/// A resource that can be any of the supported types.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnyResource {
    Settings(SettingsResource),
    Shadow(ShadowResource),
    ClusterProperty(ClusterPropertyResource),
}

impl AnyResource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            AnyResource::Settings(_) => ResourceKind::Settings,
            AnyResource::Shadow(_) => ResourceKind::Shadow,
            AnyResource::ClusterProperty(_) => ResourceKind::ClusterProperty,
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata().name
    }

    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            AnyResource::Settings(r) => &r.metadata,
            AnyResource::Shadow(r) => &r.metadata,
            AnyResource::ClusterProperty(r) => &r.metadata,
        }
    }
}

/// Intermediate struct for parsing resources before determining their type.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceHeader {
    pub api_version: String,
    pub kind: ResourceKind,
    pub metadata: ObjectMeta,
}

/// A resource along with its file path.
#[derive(Debug, Clone)]
pub struct ResourceWithPath<T> {
    pub resource: T,
    /// The file path relative to the manifest directory.
    pub path: std::path::PathBuf,
}

impl<T> ResourceWithPath<T> {
    pub fn new(resource: T, path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            resource,
            path: path.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
