//! Loader for multi-file YAML property manifests.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::resource::{
    AnyResource, ClusterPropertyResource, ResourceHeader, ResourceKind, ResourceWithPath,
    SettingsResource, SettingsSpec, ShadowResource, API_VERSION,
};
use crate::dependency::ShadowCatalog;
use crate::error::{ConfigError, PropertyError};
use crate::property::PropertyDescriptor;

/// Manifests loaded from a directory.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// The optional settings resource.
    pub settings: Option<ResourceWithPath<SettingsResource>>,
    /// All shadow CIB declarations.
    pub shadows: Vec<ResourceWithPath<ShadowResource>>,
    /// All cluster properties, in file order.
    pub properties: Vec<ResourceWithPath<ClusterPropertyResource>>,
}

impl LoadedConfig {
    /// Returns all resources as a flat list.
    pub fn all_resources(&self) -> Vec<(ResourceKind, &str, &Path)> {
        let mut resources = Vec::new();
        if let Some(settings) = &self.settings {
            resources.push((
                ResourceKind::Settings,
                settings.resource.metadata.name.as_str(),
                settings.path.as_path(),
            ));
        }
        for shadow in &self.shadows {
            resources.push((
                ResourceKind::Shadow,
                shadow.resource.metadata.name.as_str(),
                shadow.path.as_path(),
            ));
        }
        for property in &self.properties {
            resources.push((
                ResourceKind::ClusterProperty,
                property.resource.metadata.name.as_str(),
                property.path.as_path(),
            ));
        }
        resources
    }

    /// Returns the settings spec, or the defaults when no Settings resource exists.
    pub fn settings_spec(&self) -> SettingsSpec {
        self.settings
            .as_ref()
            .map(|s| s.resource.spec.clone())
            .unwrap_or_default()
    }

    /// Builds a descriptor for every ClusterProperty, failing on the first invalid one.
    pub fn descriptors(&self) -> Result<Vec<PropertyDescriptor>, PropertyError> {
        self.properties
            .iter()
            .map(|p| p.resource.to_descriptor())
            .collect()
    }
}

impl ShadowCatalog for LoadedConfig {
    fn shadow_exists(&self, name: &str) -> bool {
        self.shadows.iter().any(|s| s.resource.metadata.name == name)
    }
}

/// Loads manifests from a directory tree.
pub struct ConfigLoader {
    manifest_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(manifest_dir: impl Into<PathBuf>) -> Self {
        Self {
            manifest_dir: manifest_dir.into(),
        }
    }

    pub fn manifest_dir(&self) -> &Path {
        &self.manifest_dir
    }

    /// Loads all manifests from the directory.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        if !self.manifest_dir.exists() {
            return Err(ConfigError::ManifestDirNotFound(self.manifest_dir.clone()));
        }

        let mut config = LoadedConfig::default();

        for entry in WalkDir::new(&self.manifest_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            // Skip hidden files and anything under a hidden directory
            if let Ok(relative) = path.strip_prefix(&self.manifest_dir) {
                let has_hidden_component = relative.components().any(|c| {
                    c.as_os_str()
                        .to_str()
                        .map(|s| s.starts_with('.'))
                        .unwrap_or(false)
                });
                if has_hidden_component {
                    continue;
                }
            }

            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if ext != "yaml" && ext != "yml" {
                continue;
            }

            let resource = match self.load_file(path) {
                Ok(resource) => resource,
                Err(e) => {
                    log::warn!("Failed to load {}: {}", path.display(), e);
                    return Err(e);
                }
            };

            let relative_path = path
                .strip_prefix(&self.manifest_dir)
                .unwrap_or(path)
                .to_path_buf();

            match resource {
                AnyResource::Settings(r) => {
                    if config.settings.is_some() {
                        return Err(ConfigError::DuplicateName {
                            kind: ResourceKind::Settings.to_string(),
                            name: r.metadata.name.clone(),
                        });
                    }
                    config.settings = Some(ResourceWithPath::new(r, relative_path));
                }
                AnyResource::Shadow(r) => {
                    if config
                        .shadows
                        .iter()
                        .any(|s| s.resource.metadata.name == r.metadata.name)
                    {
                        return Err(ConfigError::DuplicateName {
                            kind: ResourceKind::Shadow.to_string(),
                            name: r.metadata.name.clone(),
                        });
                    }
                    config.shadows.push(ResourceWithPath::new(r, relative_path));
                }
                AnyResource::ClusterProperty(r) => {
                    if config
                        .properties
                        .iter()
                        .any(|p| p.resource.metadata.name == r.metadata.name)
                    {
                        return Err(ConfigError::DuplicateName {
                            kind: ResourceKind::ClusterProperty.to_string(),
                            name: r.metadata.name.clone(),
                        });
                    }
                    config.properties.push(ResourceWithPath::new(r, relative_path));
                }
            }
        }

        log::debug!(
            "Loaded {} properties and {} shadows from {}",
            config.properties.len(),
            config.shadows.len(),
            self.manifest_dir.display()
        );

        Ok(config)
    }

    /// Loads a single resource file.
    pub fn load_file(&self, path: &Path) -> Result<AnyResource, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        self.parse_resource(&content, path)
    }

    /// Parses a resource from YAML content.
    pub fn parse_resource(&self, content: &str, path: &Path) -> Result<AnyResource, ConfigError> {
        let parse_error = |e: serde_yaml::Error| ConfigError::ParseYaml {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        // Read the header first to find out which spec to expect
        let header: ResourceHeader = serde_yaml::from_str(content).map_err(parse_error)?;

        if header.api_version != API_VERSION {
            return Err(ConfigError::InvalidApiVersion {
                version: header.api_version,
                expected: API_VERSION.to_string(),
            });
        }

        match header.kind {
            ResourceKind::Settings => Ok(AnyResource::Settings(
                serde_yaml::from_str(content).map_err(parse_error)?,
            )),
            ResourceKind::Shadow => Ok(AnyResource::Shadow(
                serde_yaml::from_str(content).map_err(parse_error)?,
            )),
            ResourceKind::ClusterProperty => Ok(AnyResource::ClusterProperty(
                serde_yaml::from_str(content).map_err(parse_error)?,
            )),
        }
    }

    /// Writes a resource below the manifest directory.
    pub fn write_resource(&self, resource: &AnyResource, path: &Path) -> Result<(), ConfigError> {
        let full_path = self.manifest_dir.join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
                path: full_path.clone(),
                source: e,
            })?;
        }

        let content =
            serde_yaml::to_string(resource).map_err(|e| ConfigError::SerializeYaml(e.to_string()))?;

        fs::write(&full_path, content).map_err(|e| ConfigError::WriteFile {
            path: full_path,
            source: e,
        })
    }

    /// Default relative path for a resource: `<kind dir>/<name>.yaml`.
    pub fn default_path(resource: &AnyResource) -> PathBuf {
        let file = format!("{}.yaml", resource.name());
        match resource.kind().directory() {
            Some(dir) => Path::new(dir).join(file),
            None => PathBuf::from("settings.yaml"),
        }
    }
}
