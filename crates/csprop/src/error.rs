use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building, deciding or applying a single cluster property.
#[derive(Error, Debug)]
pub enum PropertyError {
    #[error("Invalid property descriptor '{name}': {reason}")]
    InvalidDescriptor { name: String, reason: String },

    #[error("Failed to fetch property '{name}'{}: {source}", scope_suffix(.cib))]
    FetchFailure {
        name: String,
        cib: Option<String>,
        #[source]
        source: ProviderError,
    },

    #[error("Failed to apply {action} to property '{name}'{}: {source}", scope_suffix(.cib))]
    ApplyFailure {
        name: String,
        cib: Option<String>,
        action: String,
        #[source]
        source: ProviderError,
    },

    #[error("Property '{name}' references unknown shadow CIB '{cib}'")]
    UnknownShadow { name: String, cib: String },
}

fn scope_suffix(cib: &Option<String>) -> String {
    match cib {
        Some(cib) => format!(" in shadow CIB '{}'", cib),
        None => String::new(),
    }
}

/// Errors reported by the external collaborators (state provider, mutation executor).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Cluster unreachable: {0}")]
    Unreachable(String),

    #[error("Operation timed out after {0}s")]
    Timeout(u64),

    #[error("Shadow CIB not found: {0}")]
    ShadowNotFound(String),

    #[error("Rejected by cluster: {0}")]
    Rejected(String),
}

impl ProviderError {
    /// Returns true if the error is likely transient and the host may retry the pass.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::Unreachable(_) | ProviderError::Timeout(_))
    }
}

/// Errors that can occur while loading or validating property manifests.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Manifest directory not found: {0}")]
    ManifestDirNotFound(PathBuf),

    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML in '{path}': {message}")]
    ParseYaml { path: PathBuf, message: String },

    #[error("Failed to serialize YAML: {0}")]
    SerializeYaml(String),

    #[error("Invalid API version '{version}', expected '{expected}'")]
    InvalidApiVersion { version: String, expected: String },

    #[error("Duplicate resource name '{name}' for kind '{kind}'")]
    DuplicateName { kind: String, name: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, PropertyError>;
