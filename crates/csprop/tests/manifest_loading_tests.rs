//! Integration tests for loading and validating property manifests.

mod common;

use common::*;
use csprop::manifest::ResourceKind;
use csprop::{
    resolve_against, ConfigError, ConfigLoader, ConfigValidator, DependencyRef, Ensure,
    PropertyError, PropertyValue, ValueComparison,
};

#[test]
fn test_load_valid_manifests() {
    let config = ConfigLoader::new(fixture("valid"))
        .load()
        .expect("Should load valid manifests");

    let settings = config.settings_spec();
    assert_eq!(settings.value_comparison, ValueComparison::Rendered);
    assert!(settings.parallel);

    assert_eq!(config.shadows.len(), 1);
    assert_eq!(config.shadows[0].resource.metadata.name, "staging");

    // Properties come back in file-name order
    let names: Vec<_> = config
        .properties
        .iter()
        .map(|p| p.resource.metadata.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["batch-limit", "foo", "no-quorum-policy", "stonith-enabled"]
    );

    let kinds: Vec<_> = config.all_resources().iter().map(|(k, _, _)| *k).collect();
    assert_eq!(kinds[0], ResourceKind::Settings);
    assert_eq!(kinds.len(), 6);
}

#[test]
fn test_validate_valid_manifests() {
    let config = ConfigLoader::new(fixture("valid")).load().unwrap();

    let mut validator = ConfigValidator::new();
    let result = validator.validate(&config);
    assert!(result.is_ok(), "Validation errors: {:?}", validator.errors());
    assert!(validator.warnings().is_empty());
}

#[test]
fn test_descriptors_from_manifests() {
    let config = ConfigLoader::new(fixture("valid")).load().unwrap();
    let descriptors = config.descriptors().unwrap();

    let batch = &descriptors[0];
    assert_eq!(batch.name(), "batch-limit");
    assert_eq!(batch.cib(), Some("staging"));
    assert!(!batch.replace());
    assert_eq!(batch.value(), Some(&PropertyValue::Integer(30)));

    let foo = &descriptors[1];
    assert_eq!(foo.ensure(), Ensure::Absent);
    assert_eq!(foo.value(), None);

    // Quoted YAML stays a string
    let stonith = &descriptors[3];
    assert_eq!(stonith.value(), Some(&PropertyValue::from("false")));
    assert!(stonith.replace());
}

#[test]
fn test_dependencies_resolve_against_loaded_shadows() {
    let config = ConfigLoader::new(fixture("valid")).load().unwrap();
    let descriptors = config.descriptors().unwrap();

    let deps = resolve_against(&descriptors[0], &config).unwrap();
    assert!(deps.contains(&DependencyRef::Shadow("staging".to_string())));
    assert!(deps.contains(&DependencyRef::Service("corosync".to_string())));
    assert!(deps.contains(&DependencyRef::Service("pacemaker".to_string())));

    let deps = resolve_against(&descriptors[3], &config).unwrap();
    assert_eq!(deps.len(), 2);
}

#[test]
fn test_orphan_shadow_reference_fails_validation() {
    let config = ConfigLoader::new(fixture("orphan-shadow")).load().unwrap();

    let mut validator = ConfigValidator::new();
    let err = validator.validate(&config).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
    assert!(err.to_string().contains("shadow1"));

    let descriptors = config.descriptors().unwrap();
    let err = resolve_against(&descriptors[0], &config).unwrap_err();
    assert!(matches!(err, PropertyError::UnknownShadow { .. }));
}

#[test]
fn test_missing_value_is_invalid_descriptor() {
    let config = ConfigLoader::new(fixture("missing-value")).load().unwrap();

    let mut validator = ConfigValidator::new();
    assert!(validator.validate(&config).is_err());

    let err = config.descriptors().unwrap_err();
    assert!(matches!(err, PropertyError::InvalidDescriptor { ref name, .. } if name == "symmetric-cluster"));
}
