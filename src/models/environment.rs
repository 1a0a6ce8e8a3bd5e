//! Deployment environment marker.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::env::Env;
use crate::error::ConfigError;

/// The active deployment environment (e.g. `dev`).
///
/// Every loaded tree carries one; it is exposed as a first-class attribute
/// rather than only through the `env` key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Environment {
    name: String,
}

impl Environment {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Name of the environment.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Alias of [`Environment::name`].
    pub fn env(&self) -> &str {
        &self.name
    }

    /// Resolve the environment: an explicit non-empty name wins, otherwise
    /// the `ENV` variable is consulted.
    pub fn resolve(explicit: Option<&str>, env: &Env) -> Result<Self, ConfigError> {
        if let Some(name) = explicit.filter(|n| !n.is_empty()) {
            return Ok(Self::new(name));
        }

        env.get_non_empty(constants::ENV_ENV)
            .map(Self::new)
            .ok_or(ConfigError::NoEnvironment)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<&str> for Environment {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Environment {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl PartialEq<str> for Environment {
    fn eq(&self, other: &str) -> bool {
        self.name == other
    }
}

impl PartialEq<&str> for Environment {
    fn eq(&self, other: &&str) -> bool {
        self.name == *other
    }
}
