//! Caller-owned registry of configuration dictionaries.
//!
//! Libraries and the application register their dictionaries here; the
//! loader folds them in registration order, later entries winning. The
//! registry is an explicit value threaded into [`super::load`], not a
//! process-wide singleton.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};

use crate::env::Env;
use crate::error::ConfigError;
use crate::interpolate;
use crate::tree::key::json_kind;

/// Ordered, append-only list of raw configuration dictionaries.
///
/// A single mutex guards every operation so all readers observe entries in
/// registration order.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Mutex<Vec<Map<String, Value>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an already-interpolated dictionary. Returns its position.
    pub fn register(&self, conf: Map<String, Value>) -> usize {
        let mut entries = self.lock();
        entries.push(conf);
        entries.len() - 1
    }

    /// Decode JSON text (interpolating placeholders) and register it.
    ///
    /// The document must be a JSON object.
    pub fn register_json(&self, text: &str, env: &Env) -> Result<usize, ConfigError> {
        match interpolate::from_json_str(text, env)? {
            Value::Object(conf) => Ok(self.register(conf)),
            other => Err(ConfigError::Coercion {
                key: String::new(),
                expected: "mapping",
                found: json_kind(&other).to_string(),
            }),
        }
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Copy of every entry in registration order.
    pub fn snapshot(&self) -> Vec<Map<String, Value>> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Map<String, Value>>> {
        // Entries are plain data, a panic elsewhere cannot leave them torn.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
