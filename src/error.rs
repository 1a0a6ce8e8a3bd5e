//! Error type shared by every configuration operation.
//!
//! Configuration failures are meant to abort startup, so nothing here is
//! retried or recovered internally; callers propagate with `?`.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while parsing keys, interpolating values, reading,
/// merging, or querying a configuration tree.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A key argument was not a string.
    #[error("config key must be a string, got {found}")]
    KeyType { found: &'static str },

    /// A lookup without a default could not resolve the full path.
    #[error("key not found: {key}")]
    KeyNotFound { key: String },

    /// A typed accessor could not convert the stored value.
    #[error("cannot convert `{key}` to {expected}: found {found}")]
    Coercion {
        key: String,
        expected: &'static str,
        found: String,
    },

    /// A `${NAME?msg}` / `${NAME:?msg}` placeholder named a missing variable.
    ///
    /// The message always ends with a period.
    #[error("{message}")]
    InterpolationRequired { name: String, message: String },

    /// Nothing was registered, supplied, or discovered on disk.
    #[error(
        "no configuration source found. Register a configuration, pass an \
         application configuration, or add config files under `CONFIG_DIR`"
    )]
    NoConfigSource,

    /// No environment was passed and none could be found.
    #[error(
        "you must define an environment. Pass one explicitly, set `ENV` in \
         the application configuration, or use the environment variable `ENV`"
    )]
    NoEnvironment,

    /// Raw JSON text could not be decoded.
    #[error("invalid JSON config document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    ParseFile { path: PathBuf, message: String },

    /// A config document decoded to something other than a mapping.
    #[error("config file {path} must contain a mapping at the top level")]
    InvalidRoot { path: PathBuf },
}

impl ConfigError {
    /// Build an [`ConfigError::InterpolationRequired`] with the bash-style
    /// message: the caller text followed by a period.
    pub(crate) fn required(name: &str, message: &str) -> Self {
        let message = if message.is_empty() {
            format!("{name} is required.")
        } else {
            format!("{message}.")
        };
        ConfigError::InterpolationRequired {
            name: name.to_string(),
            message,
        }
    }
}
