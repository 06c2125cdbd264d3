pub mod dependency;
pub mod engine;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod property;
pub mod provider;
pub mod reconciler;

pub use dependency::{dependencies, resolve_against, DependencyRef, ShadowCatalog, REQUIRED_SERVICES};
pub use engine::{decide, ReconciliationEngine};
pub use error::{ConfigError, PropertyError, ProviderError, Result};
pub use manifest::{ConfigLoader, ConfigValidator, LoadedConfig};
pub use property::{
    Action, Ensure, ObservedProperty, PropertyDescriptor, PropertyValue, ValueComparator,
    ValueComparison,
};
pub use provider::{CibSnapshot, InMemoryCib, MutationExecutor, ObservedStateProvider};
pub use reconciler::{
    OutcomeStatus, PropertyOutcome, PropertyReconciler, ReconcileMode, ReconcileReport,
};
