//! Runtime environment resolution.
//!
//! # Responsibilities
//! - Resolve the active environment (`dev`, `prod`, ...) and its directory
//! - Hold the resolved environment for the life of the process
//! - Locate and decode files under `<root>/<env>/`
//!
//! # Design Decisions
//! - Resolution runs once behind a one-time barrier; late arrivals wait for
//!   the first caller and observe its result
//! - A failed resolution leaves the barrier open so the caller sees the error
//! - Files are re-read on every load; nothing is cached besides the environment

use std::env;
use std::path::{Component, Path, PathBuf};

use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;

use crate::config::loader::{parse_config, ConfigError};

/// Process variable naming the active environment for [`init_from_env`].
pub const ENV_VAR: &str = "SERVICE_ENV";

/// Environment used by [`init_from_env`] when [`ENV_VAR`] is unset.
pub const DEFAULT_ENV: &str = "dev";

/// A resolved configuration environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfEnv {
    root: PathBuf,
    env: String,
}

impl ConfEnv {
    /// Resolve from an environment directory such as `./conf/dev/`.
    ///
    /// The final path component names the environment and its parent is the
    /// configuration root.
    pub fn resolve(conf_path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let conf_path = conf_path.as_ref();
        let invalid = |reason: &str| ConfigError::InvalidRoot {
            path: conf_path.to_path_buf(),
            reason: reason.to_string(),
        };

        if !conf_path.is_dir() {
            return Err(invalid("not a directory"));
        }

        let dir = conf_path
            .canonicalize()
            .map_err(|e| invalid(&e.to_string()))?;
        let env = dir
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| invalid("no environment name in path"))?
            .to_string();
        let root = dir
            .parent()
            .ok_or_else(|| invalid("environment directory has no parent"))?
            .to_path_buf();

        Ok(Self { root, env })
    }

    /// Build from an explicit root and environment name.
    pub fn new(root: impl Into<PathBuf>, env: impl Into<String>) -> Result<Self, ConfigError> {
        let root = root.into();
        let env = env.into();

        if env.is_empty() || env.contains(['/', '\\']) || env == "." || env == ".." {
            return Err(ConfigError::InvalidRoot {
                path: root,
                reason: format!("invalid environment name {:?}", env),
            });
        }

        let conf = Self { root, env };
        if !conf.dir().is_dir() {
            return Err(ConfigError::InvalidRoot {
                path: conf.dir(),
                reason: "environment directory does not exist".to_string(),
            });
        }

        Ok(conf)
    }

    /// Build from a root, taking the environment name from [`ENV_VAR`].
    pub fn from_process_env(root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let env = env::var(ENV_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENV.to_string());

        Self::new(root, env.trim())
    }

    pub fn env(&self) -> &str {
        &self.env
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding this environment's files.
    pub fn dir(&self) -> PathBuf {
        self.root.join(&self.env)
    }

    /// Path of `filename` inside this environment's directory.
    ///
    /// Only plain relative names are accepted; absolute paths and `..` or `.`
    /// components would leave the environment directory.
    pub fn file_path(&self, filename: &str) -> Result<PathBuf, ConfigError> {
        let relative = Path::new(filename);
        let plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));

        if filename.is_empty() || !plain {
            return Err(ConfigError::InvalidFileName(filename.to_string()));
        }

        Ok(self.dir().join(relative))
    }

    /// Decode `filename` from this environment's directory.
    pub fn parse_local_config<T: DeserializeOwned>(
        &self,
        filename: &str,
    ) -> Result<T, ConfigError> {
        let path = self.file_path(filename)?;
        tracing::debug!(env = %self.env, path = ?path, "Loading local config");
        parse_config(&path)
    }
}

/// One-time initialization barrier around a [`ConfEnv`].
#[derive(Debug, Default)]
pub struct ConfEnvCell {
    cell: OnceCell<ConfEnv>,
}

impl ConfEnvCell {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Run `init` if nothing has been resolved yet.
    ///
    /// Concurrent callers block until the first one finishes. If `init` fails
    /// the cell stays empty and the error goes to that caller only.
    pub fn get_or_try_init<F>(&self, init: F) -> Result<&ConfEnv, ConfigError>
    where
        F: FnOnce() -> Result<ConfEnv, ConfigError>,
    {
        self.cell.get_or_try_init(init)
    }

    pub fn get(&self) -> Option<&ConfEnv> {
        self.cell.get()
    }
}

static CONF_ENV: ConfEnvCell = ConfEnvCell::new();

/// Initialize the process-wide environment from an environment directory.
///
/// Only the first successful call resolves anything; later calls return the
/// environment already in place.
pub fn init(conf_path: impl AsRef<Path>) -> Result<&'static ConfEnv, ConfigError> {
    let conf_path = conf_path.as_ref();
    let conf = CONF_ENV.get_or_try_init(|| {
        let conf = ConfEnv::resolve(conf_path)?;
        tracing::info!(env = %conf.env, root = ?conf.root, "Configuration environment initialized");
        Ok(conf)
    })?;

    if conf_path.canonicalize().ok().as_deref() != Some(conf.dir().as_path()) {
        tracing::warn!(
            requested = ?conf_path,
            active = ?conf.dir(),
            "Configuration environment already initialized, ignoring new path"
        );
    }

    Ok(conf)
}

/// Initialize the process-wide environment from a configuration root, with
/// the environment name taken from [`ENV_VAR`].
pub fn init_from_env(conf_root: impl Into<PathBuf>) -> Result<&'static ConfEnv, ConfigError> {
    CONF_ENV.get_or_try_init(|| {
        let conf = ConfEnv::from_process_env(conf_root)?;
        tracing::info!(env = %conf.env, root = ?conf.root, "Configuration environment initialized");
        Ok(conf)
    })
}

/// Active environment name, or `None` before initialization.
pub fn conf_env() -> Option<&'static str> {
    CONF_ENV.get().map(ConfEnv::env)
}

/// Path of `filename` inside the active environment directory.
pub fn conf_file_path(filename: &str) -> Result<PathBuf, ConfigError> {
    active()?.file_path(filename)
}

/// Decode `filename` from the active environment directory.
pub fn parse_local_config<T: DeserializeOwned>(filename: &str) -> Result<T, ConfigError> {
    active()?.parse_local_config(filename)
}

fn active() -> Result<&'static ConfEnv, ConfigError> {
    CONF_ENV.get().ok_or(ConfigError::NotInitialized)
}
