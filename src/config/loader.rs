//! Configuration loading from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The process-wide environment has not been initialized yet.
    #[error("configuration environment not initialized")]
    NotInitialized,

    /// The configuration root or environment directory is unusable.
    #[error("invalid configuration root {path:?}: {reason}")]
    InvalidRoot { path: PathBuf, reason: String },

    /// The file name is not a plain path inside the environment directory.
    #[error("invalid configuration file name {0:?}")]
    InvalidFileName(String),

    /// The requested file does not exist in the environment directory.
    #[error("configuration file not found: {0:?}")]
    NotFound(PathBuf),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file content does not decode into the target type.
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Load a TOML file into `T`.
///
/// Either every field of `T` is populated from the file or an error is
/// returned. Keys the file carries but `T` does not declare are ignored.
pub fn parse_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound(path.to_path_buf())
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
