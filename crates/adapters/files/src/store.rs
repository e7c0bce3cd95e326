//! [`ConfigStore`] implementation over a directory of YAML files.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use hued_app::ports::config_store::Definitions;
use hued_app::ports::{ConfigKind, ConfigStore};
use hued_domain::error::HuedError;
use hued_domain::event::EventDefinition;
use hued_domain::rule::RuleDefinition;
use serde::de::DeserializeOwned;
use serde_yaml::Value;

use crate::error::FileError;

/// Reads `events.yml`, `scenes.yml` and `rules.yml` from one directory.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    dir: PathBuf,
}

impl FileConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `kind`.
    #[must_use]
    pub fn path(&self, kind: ConfigKind) -> PathBuf {
        self.dir.join(format!("{kind}.yml"))
    }
}

impl ConfigStore for FileConfigStore {
    async fn modified(&self, kind: ConfigKind) -> Option<SystemTime> {
        let metadata = tokio::fs::metadata(self.path(kind)).await.ok()?;
        metadata.modified().ok()
    }

    async fn load_events(&self) -> Result<Option<Definitions<EventDefinition>>, HuedError> {
        Ok(read_definitions(&self.path(ConfigKind::Events)).await?)
    }

    async fn load_scenes(&self) -> Result<Option<Definitions<Vec<EventDefinition>>>, HuedError> {
        Ok(read_definitions(&self.path(ConfigKind::Scenes)).await?)
    }

    async fn load_rules(&self) -> Result<Option<Definitions<RuleDefinition>>, HuedError> {
        Ok(read_definitions(&self.path(ConfigKind::Rules)).await?)
    }
}

/// Read and deserialize a whole YAML file. `Ok(None)` when it does not exist.
///
/// # Errors
///
/// Returns [`FileError::Io`] when the file cannot be read and
/// [`FileError::Yaml`] when it does not deserialize into `T`.
pub async fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, FileError> {
    let Some(contents) = read_file(path).await? else {
        return Ok(None);
    };
    serde_yaml::from_str(&contents)
        .map(Some)
        .map_err(|source| FileError::Yaml {
            path: path.to_path_buf(),
            source,
        })
}

async fn read_file(path: &Path) -> Result<Option<String>, FileError> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "file not found");
            Ok(None)
        }
        Err(source) => Err(FileError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Read a top-level mapping of named entries, keeping file order.
///
/// An empty file has no entries.
async fn read_definitions<T: DeserializeOwned>(
    path: &Path,
) -> Result<Option<Definitions<T>>, FileError> {
    let Some(contents) = read_file(path).await? else {
        return Ok(None);
    };
    if contents.trim().is_empty() {
        return Ok(Some(Vec::new()));
    }

    let document: Value = serde_yaml::from_str(&contents).map_err(|source| FileError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    let mapping = match document {
        Value::Null => return Ok(Some(Vec::new())),
        Value::Mapping(mapping) => mapping,
        _ => {
            return Err(FileError::InvalidKey {
                path: path.to_path_buf(),
            });
        }
    };

    let mut definitions = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let name = match key {
            Value::String(name) => name,
            Value::Number(number) => number.to_string(),
            _ => {
                return Err(FileError::InvalidKey {
                    path: path.to_path_buf(),
                });
            }
        };
        let definition = serde_yaml::from_value(value).map_err(|source| FileError::Entry {
            path: path.to_path_buf(),
            name: name.clone(),
            source,
        })?;
        definitions.push((name, definition));
    }
    Ok(Some(definitions))
}
