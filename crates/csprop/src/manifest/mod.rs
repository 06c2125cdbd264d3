//! Declarative property manifests.
//!
//! Desired state is described with K8s-style YAML resources:
//! - `ClusterProperty`: one key/value cluster property
//! - `Shadow`: a shadow CIB that properties can be staged in
//! - `Settings`: optional pass settings (value comparison, parallelism)

pub mod loader;
pub mod resource;
pub mod validation;

pub use loader::{ConfigLoader, LoadedConfig};
pub use resource::{
    AnyResource, ClusterPropertyResource, ClusterPropertySpec, ObjectMeta, Resource,
    ResourceKind, ResourceWithPath, SettingsResource, SettingsSpec, ShadowResource, ShadowSpec,
    API_VERSION,
};
pub use validation::ConfigValidator;
