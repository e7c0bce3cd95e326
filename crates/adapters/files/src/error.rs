//! File adapter error types.

use std::path::PathBuf;

use hued_domain::error::HuedError;

/// Errors raised while reading configuration files.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    /// The file exists but could not be read.
    #[error("could not read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML, or not a mapping at the top level.
    #[error("could not parse {}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A top-level key is neither a string nor a number.
    #[error("{}: entry names must be strings", path.display())]
    InvalidKey { path: PathBuf },

    /// A single entry does not match the expected shape.
    #[error("{}: entry `{name}` is malformed", path.display())]
    Entry {
        path: PathBuf,
        name: String,
        #[source]
        source: serde_yaml::Error,
    },
}

impl From<FileError> for HuedError {
    fn from(err: FileError) -> Self {
        Self::Config(Box::new(err))
    }
}
