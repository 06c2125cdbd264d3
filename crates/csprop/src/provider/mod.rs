//! Boundary contracts for the live cluster.
//!
//! The core never talks to the cluster directly. Hosts plug in implementations
//! of these traits; [`InMemoryCib`] is the one shipped with the crate.

pub mod memory;

use crate::error::ProviderError;
use crate::property::{Action, ObservedProperty};

pub use memory::{CibSnapshot, InMemoryCib};

/// Reads the current value of a property from the cluster.
pub trait ObservedStateProvider: Send + Sync {
    /// Fetches `name` from the live CIB (`cib = None`) or from a shadow CIB.
    fn fetch_property(
        &self,
        name: &str,
        cib: Option<&str>,
    ) -> std::result::Result<ObservedProperty, ProviderError>;
}

/// Writes a computed action to the cluster.
pub trait MutationExecutor: Send + Sync {
    fn apply_action(
        &self,
        name: &str,
        cib: Option<&str>,
        action: &Action,
    ) -> std::result::Result<(), ProviderError>;
}

impl<T: ObservedStateProvider + ?Sized> ObservedStateProvider for std::sync::Arc<T> {
    fn fetch_property(
        &self,
        name: &str,
        cib: Option<&str>,
    ) -> std::result::Result<ObservedProperty, ProviderError> {
        (**self).fetch_property(name, cib)
    }
}

impl<T: MutationExecutor + ?Sized> MutationExecutor for std::sync::Arc<T> {
    fn apply_action(
        &self,
        name: &str,
        cib: Option<&str>,
        action: &Action,
    ) -> std::result::Result<(), ProviderError> {
        (**self).apply_action(name, cib, action)
    }
}

impl<T: ObservedStateProvider + ?Sized> ObservedStateProvider for &T {
    fn fetch_property(
        &self,
        name: &str,
        cib: Option<&str>,
    ) -> std::result::Result<ObservedProperty, ProviderError> {
        (**self).fetch_property(name, cib)
    }
}

impl<T: MutationExecutor + ?Sized> MutationExecutor for &T {
    fn apply_action(
        &self,
        name: &str,
        cib: Option<&str>,
        action: &Action,
    ) -> std::result::Result<(), ProviderError> {
        (**self).apply_action(name, cib, action)
    }
}
