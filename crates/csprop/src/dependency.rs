//! Ordering edges a property write must wait for.
//!
//! The resolver only declares edges. Whether a scheduler honours them, and
//! whether the referenced services are actually running, is not checked here.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{PropertyError, Result};
use crate::property::PropertyDescriptor;

/// Services every property write depends on.
pub const REQUIRED_SERVICES: [&str; 2] = ["corosync", "pacemaker"];

/// A reference to an entity that must be satisfied before a property is applied.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "camelCase")]
pub enum DependencyRef {
    /// A shadow CIB that has to exist and be active.
    Shadow(String),
    /// A system service that has to be running.
    Service(String),
}

impl DependencyRef {
    pub fn name(&self) -> &str {
        match self {
            DependencyRef::Shadow(name) | DependencyRef::Service(name) => name,
        }
    }
}

impl fmt::Display for DependencyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyRef::Shadow(name) => write!(f, "Shadow[{}]", name),
            DependencyRef::Service(name) => write!(f, "Service[{}]", name),
        }
    }
}

/// Answers whether a shadow CIB is declared in the surrounding configuration.
pub trait ShadowCatalog {
    fn shadow_exists(&self, name: &str) -> bool;
}

impl<S: AsRef<str>> ShadowCatalog for [S] {
    fn shadow_exists(&self, name: &str) -> bool {
        self.iter().any(|s| s.as_ref() == name)
    }
}

impl<S: AsRef<str>> ShadowCatalog for Vec<S> {
    fn shadow_exists(&self, name: &str) -> bool {
        self.as_slice().shadow_exists(name)
    }
}

/// Returns the ordering edges for `desired`.
pub fn dependencies(desired: &PropertyDescriptor) -> BTreeSet<DependencyRef> {
    let mut deps: BTreeSet<DependencyRef> = REQUIRED_SERVICES
        .iter()
        .map(|s| DependencyRef::Service((*s).to_string()))
        .collect();
    if let Some(cib) = desired.cib() {
        deps.insert(DependencyRef::Shadow(cib.to_string()));
    }
    deps
}

/// Like [`dependencies`], but fails if the shadow CIB is not in `catalog`.
pub fn resolve_against<C>(
    desired: &PropertyDescriptor,
    catalog: &C,
) -> Result<BTreeSet<DependencyRef>>
where
    C: ShadowCatalog + ?Sized,
{
    if let Some(cib) = desired.cib() {
        if !catalog.shadow_exists(cib) {
            return Err(PropertyError::UnknownShadow {
                name: desired.name().to_string(),
                cib: cib.to_string(),
            });
        }
    }
    Ok(dependencies(desired))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(deps: &BTreeSet<DependencyRef>) -> BTreeSet<&str> {
        deps.iter().map(|d| d.name()).collect()
    }

    #[test]
    fn test_scoped_property_depends_on_shadow_and_services() {
        let desc = PropertyDescriptor::builder("stonith-enabled")
            .cib("shadow1")
            .value(false)
            .build()
            .unwrap();
        let deps = dependencies(&desc);
        assert_eq!(deps.len(), 3);
        assert_eq!(
            names(&deps),
            BTreeSet::from(["shadow1", "corosync", "pacemaker"])
        );
        assert!(deps.contains(&DependencyRef::Shadow("shadow1".to_string())));
    }

    #[test]
    fn test_unscoped_property_depends_on_services_only() {
        let desc = PropertyDescriptor::builder("stonith-enabled")
            .cib("")
            .value(false)
            .build()
            .unwrap();
        let deps = dependencies(&desc);
        assert_eq!(
            deps,
            BTreeSet::from([
                DependencyRef::Service("corosync".to_string()),
                DependencyRef::Service("pacemaker".to_string()),
            ])
        );
    }

    #[test]
    fn test_absent_property_still_has_dependencies() {
        let desc = PropertyDescriptor::absent("foo").unwrap();
        assert_eq!(dependencies(&desc).len(), 2);
    }

    #[test]
    fn test_resolve_against_unknown_shadow() {
        let desc = PropertyDescriptor::builder("foo")
            .cib("missing")
            .value(1)
            .build()
            .unwrap();
        let catalog = vec!["shadow1"];
        let err = resolve_against(&desc, &catalog).unwrap_err();
        assert!(matches!(err, PropertyError::UnknownShadow { ref cib, .. } if cib == "missing"));
    }

    #[test]
    fn test_resolve_against_known_shadow() {
        let desc = PropertyDescriptor::builder("foo")
            .cib("shadow1")
            .value(1)
            .build()
            .unwrap();
        let catalog = vec!["shadow1".to_string()];
        assert_eq!(resolve_against(&desc, &catalog).unwrap().len(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(DependencyRef::Shadow("s".to_string()).to_string(), "Shadow[s]");
        assert_eq!(
            DependencyRef::Service("pacemaker".to_string()).to_string(),
            "Service[pacemaker]"
        );
    }
}
