//! Configuration loading and layering.
//!
//! Handles config-file discovery, the caller-owned [`Registry`] of
//! dictionaries, and the fold that merges them with the application
//! dictionary into a single [`Config`].

pub mod loader;
pub mod registry;

use std::ops::Deref;

use serde_json::{Map, Value};

pub use loader::{ConfigFile, Format, LoadOptions, discover_files, load};
pub use registry::Registry;

use crate::constants;
use crate::error::ConfigError;
use crate::models::Environment;
use crate::tree::ConfigTree;

/// The application's root configuration.
///
/// Wraps the root [`ConfigTree`]; every tree lookup is available through
/// `Deref`. The root always carries an `env` key naming its environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    tree: ConfigTree,
}

impl Config {
    /// Wrap an existing tree as-is.
    pub fn from_tree(tree: ConfigTree) -> Self {
        Self { tree }
    }

    /// Build the root from a merged mapping, setting its `env` key.
    pub fn from_dict(env: impl Into<Environment>, mut conf: Map<String, Value>) -> Self {
        let env = env.into();
        conf.insert(constants::ENV_KEY.to_string(), Value::String(env.name().to_string()));
        Self {
            tree: ConfigTree::from_dict(env, conf),
        }
    }

    pub fn env(&self) -> &Environment {
        self.tree.env()
    }

    pub fn app_name(&self) -> Result<String, ConfigError> {
        self.tree.get_string(constants::APP_NAME_KEY)
    }

    pub fn app_version(&self) -> Result<String, ConfigError> {
        self.tree.get_string(constants::APP_VERSION_KEY)
    }

    pub fn tree(&self) -> &ConfigTree {
        &self.tree
    }

    pub fn into_tree(self) -> ConfigTree {
        self.tree
    }
}

impl Deref for Config {
    type Target = ConfigTree;

    fn deref(&self) -> &ConfigTree {
        &self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_dict_sets_env_key() {
        let conf = Config::from_dict("dev", json!({"a": 1}).as_object().cloned().unwrap());
        assert_eq!(conf.env(), &Environment::new("dev"));
        assert_eq!(conf.get_string("env").unwrap(), "dev");
    }

    #[test]
    fn env_key_overrides_dictionary_value() {
        let conf = Config::from_dict("prod", json!({"env": "dev"}).as_object().cloned().unwrap());
        assert_eq!(conf.get_string("env").unwrap(), "prod");
    }

    #[test]
    fn app_identity() {
        let conf = Config::from_dict(
            "dev",
            json!({"app_name": "billing", "app_version": "1.2.0"})
                .as_object()
                .cloned()
                .unwrap(),
        );
        assert_eq!(conf.app_name().unwrap(), "billing");
        assert_eq!(conf.app_version().unwrap(), "1.2.0");
    }

    #[test]
    fn missing_app_name_is_key_not_found() {
        let conf = Config::from_dict("dev", Map::new());
        assert!(matches!(conf.app_name().unwrap_err(), ConfigError::KeyNotFound { .. }));
    }

    #[test]
    fn deref_exposes_tree_lookups() {
        let tree = ConfigTree::from_value("dev", json!({"db": {"port": 5432}})).unwrap();
        let conf = Config::from_tree(tree.clone());
        assert_eq!(conf.get_integer("db.port").unwrap(), 5432);
        assert_eq!(conf.into_tree(), tree);
    }
}
