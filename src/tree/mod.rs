//! Hierarchical configuration tree.
//!
//! A [`ConfigTree`] is an insertion-ordered map from key to [`ConfigValue`]
//! tagged with the [`Environment`] it was built for. Construction keeps the
//! source mapping's keys literal (dotted keys are stored quoted); dotted
//! paths are only interpreted at lookup time.

pub mod key;
pub mod merge;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::models::{ConfigValue, Environment};

use key::parse_key;

/// An immutable configuration node.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigTree {
    env: Environment,
    entries: IndexMap<String, ConfigValue>,
}

impl ConfigTree {
    /// An empty tree.
    pub fn new(env: impl Into<Environment>) -> Self {
        Self {
            env: env.into(),
            entries: IndexMap::new(),
        }
    }

    /// Build a tree from a plain nested mapping.
    ///
    /// Keys are not split on dots: `{"pass.word": ..}` is stored as the
    /// single key `"pass.word"` (quoted) and comes back that way from
    /// [`ConfigTree::to_dict`].
    pub fn from_dict(env: impl Into<Environment>, conf: Map<String, Value>) -> Self {
        let env = env.into();
        let entries = conf
            .into_iter()
            .map(|(k, v)| (key::storage_key(k), ConfigValue::from_json(v, &env)))
            .collect();
        Self { env, entries }
    }

    /// Build a tree from a JSON value that must be an object.
    pub fn from_value(env: impl Into<Environment>, conf: Value) -> Result<Self, ConfigError> {
        match conf {
            Value::Object(map) => Ok(Self::from_dict(env, map)),
            other => {
                let found = ConfigValue::from_json(other, &Environment::new(""));
                Err(coercion_error("", "tree", &found))
            }
        }
    }

    /// Environment of this tree (shared by every subtree).
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Look up a dotted key path.
    pub fn get(&self, key: &str) -> Result<&ConfigValue, ConfigError> {
        self.lookup(&parse_key(key))
            .ok_or_else(|| ConfigError::KeyNotFound {
                key: key.to_string(),
            })
    }

    /// Look up a dotted key path, returning `default` when any segment is
    /// missing. Never fails.
    pub fn get_or_default(&self, key: &str, default: impl Into<ConfigValue>) -> ConfigValue {
        match self.get(key) {
            Ok(value) => value.clone(),
            Err(_) => default.into(),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.lookup(&parse_key(key)).is_some()
    }

    pub fn get_string(&self, key: &str) -> Result<String, ConfigError> {
        match self.get(key)? {
            ConfigValue::String(s) => Ok(s.clone()),
            scalar @ (ConfigValue::Integer(_) | ConfigValue::Float(_) | ConfigValue::Bool(_)) => {
                Ok(scalar.to_string())
            }
            other => Err(coercion_error(key, "string", other)),
        }
    }

    pub fn get_integer(&self, key: &str) -> Result<i64, ConfigError> {
        let value = self.get(key)?;
        let converted = match value {
            ConfigValue::Integer(i) => Some(*i),
            // `as` saturates, so bound the range before casting.
            ConfigValue::Float(f)
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
            {
                Some(*f as i64)
            }
            ConfigValue::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        converted.ok_or_else(|| coercion_error(key, "integer", value))
    }

    pub fn get_float(&self, key: &str) -> Result<f64, ConfigError> {
        let value = self.get(key)?;
        let converted = match value {
            ConfigValue::Float(f) => Some(*f),
            ConfigValue::Integer(i) => Some(*i as f64),
            ConfigValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        converted.ok_or_else(|| coercion_error(key, "float", value))
    }

    /// Fetch a boolean.
    ///
    /// Accepts booleans, numbers (non-zero is `true`), the words
    /// `true/yes/on` and `false/no/off` in any case, and numeric strings.
    pub fn get_bool(&self, key: &str) -> Result<bool, ConfigError> {
        let value = self.get(key)?;
        let converted = match value {
            ConfigValue::Bool(b) => Some(*b),
            ConfigValue::Integer(i) => Some(*i != 0),
            ConfigValue::Float(f) => Some(*f != 0.0),
            ConfigValue::String(s) => parse_bool(s),
            _ => None,
        };
        converted.ok_or_else(|| coercion_error(key, "bool", value))
    }

    pub fn get_tree(&self, key: &str) -> Result<&ConfigTree, ConfigError> {
        let value = self.get(key)?;
        value
            .as_tree()
            .ok_or_else(|| coercion_error(key, "tree", value))
    }

    pub fn get_list(&self, key: &str) -> Result<&[ConfigValue], ConfigError> {
        let value = self.get(key)?;
        value
            .as_list()
            .ok_or_else(|| coercion_error(key, "list", value))
    }

    /// Top-level keys in insertion order (dotted keys in quoted form).
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dotted paths of every leaf, depth first. Empty subtrees count as
    /// leaves.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_leaf_paths("", &mut paths);
        paths
    }

    /// Convert back into a plain nested mapping.
    pub fn to_dict(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_dict())
    }

    /// Merge `low` underneath this tree. This tree's values win; the result
    /// keeps this tree's environment.
    pub fn with_fallback(&self, low: &ConfigTree) -> ConfigTree {
        let merged = merge::fallback_map(self.to_dict(), low.to_dict());
        Self::from_dict(self.env.clone(), merged)
    }

    fn lookup(&self, segments: &[String]) -> Option<&ConfigValue> {
        let (first, rest) = segments.split_first()?;
        let value = self.entry(first)?;
        if rest.is_empty() {
            return Some(value);
        }
        value.as_tree()?.lookup(rest)
    }

    /// A segment matches its literal key or the quoted storage form.
    fn entry(&self, segment: &str) -> Option<&ConfigValue> {
        if let Some(value) = self.entries.get(segment) {
            return Some(value);
        }
        let stored = key::storage_key(segment.to_string());
        if stored == segment {
            return None;
        }
        self.entries.get(&stored)
    }

    fn collect_leaf_paths(&self, prefix: &str, paths: &mut Vec<String>) {
        for (k, v) in &self.entries {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            match v {
                ConfigValue::Tree(tree) if !tree.is_empty() => {
                    tree.collect_leaf_paths(&path, paths)
                }
                _ => paths.push(path),
            }
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Some(true),
        "false" | "no" | "off" | "" => Some(false),
        other => other
            .parse::<f64>()
            .ok()
            .filter(|n| !n.is_nan())
            .map(|n| n != 0.0),
    }
}

fn coercion_error(key: &str, expected: &'static str, found: &ConfigValue) -> ConfigError {
    let found = match found {
        ConfigValue::List(_) | ConfigValue::Tree(_) | ConfigValue::Null => found.kind().to_string(),
        scalar => format!("{} `{scalar}`", scalar.kind()),
    };
    ConfigError::Coercion {
        key: key.to_string(),
        expected,
        found,
    }
}
