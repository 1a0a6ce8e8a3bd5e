//! Environment variable source for interpolation and environment lookup.
//!
//! Production code uses [`Env::real()`] which delegates to [`std::env::var`].
//! Tests and embedders use [`Env::mock()`] backed by an explicit map, so the
//! process environment is never mutated (no `unsafe` `set_var` calls).

use std::collections::HashMap;

/// Environment variable reader.
///
/// Interpolation needs to tell "unset" apart from "set to the empty
/// string", so [`Env::get`] returns `None` only when the variable is absent.
#[derive(Clone, Debug, Default)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

impl Env {
    /// Create an `Env` that reads from the real process environment.
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// Create an `Env` backed only by the given key-value pairs.
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            overrides: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Create an empty mock environment.
    pub fn empty() -> Self {
        Self {
            overrides: Some(HashMap::new()),
        }
    }

    /// Look up a variable. Empty values are returned as `Some("")`.
    ///
    /// Values that are not valid unicode in the real environment are
    /// treated as unset.
    pub fn get(&self, name: &str) -> Option<String> {
        match &self.overrides {
            Some(map) => map.get(name).cloned(),
            None => std::env::var(name).ok(),
        }
    }

    /// Look up a variable, treating the empty string as unset.
    pub fn get_non_empty(&self, name: &str) -> Option<String> {
        self.get(name).filter(|v| !v.is_empty())
    }

    /// Returns `true` if the variable is present, even when empty.
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}
