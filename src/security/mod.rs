//! Sanitized dumps of configuration for display and logging.
//!
//! The dumper copies a tree into plain JSON, masking every value stored
//! under a sensitive key. By default only top-level scalars are shown and
//! every nested mapping or list becomes `"..."`; [`ConfigDumper::full_depth`]
//! walks the whole tree instead. The output is for humans only; never store
//! or compare it.

use serde_json::{Map, Value};

use crate::constants::{MASK, SENSITIVE_KEYS};
use crate::tree::ConfigTree;

/// Produces display-safe copies of configuration structures.
#[derive(Debug, Clone)]
pub struct ConfigDumper {
    /// Lowercased denylist, matched against whole keys.
    denylist: Vec<String>,
    /// Collapse containers nested deeper than this below the root. `None`
    /// walks everything.
    max_depth: Option<usize>,
}

impl Default for ConfigDumper {
    fn default() -> Self {
        Self::new(SENSITIVE_KEYS.iter().copied())
    }
}

impl ConfigDumper {
    /// A dumper masking the given keys (case-insensitive), collapsing every
    /// nested mapping or list under the root.
    pub fn new(keys: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        Self {
            denylist: keys
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
            max_depth: Some(0),
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Descend into every subtree, masking sensitive keys at any depth.
    pub fn full_depth(mut self) -> Self {
        self.max_depth = None;
        self
    }

    /// Whether values under `key` are masked.
    pub fn is_sensitive(&self, key: &str) -> bool {
        let key = key.trim_matches(|c| c == '"' || c == '\'').to_lowercase();
        self.denylist.iter().any(|k| *k == key)
    }

    /// Sanitize a plain JSON value. Non-mapping roots are copied as they are
    /// (lists are still walked for nested mappings).
    pub fn sanitize(&self, value: &Value) -> Value {
        self.sanitize_at(value, 0)
    }

    pub fn sanitize_tree(&self, tree: &ConfigTree) -> Map<String, Value> {
        self.sanitize_map(&tree.to_dict(), 0)
    }

    fn sanitize_at(&self, value: &Value, depth: usize) -> Value {
        match value {
            Value::Object(map) => Value::Object(self.sanitize_map(map, depth)),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.sanitize_child(item, depth))
                    .collect(),
            ),
            scalar => scalar.clone(),
        }
    }

    fn sanitize_map(&self, map: &Map<String, Value>, depth: usize) -> Map<String, Value> {
        map.iter()
            .map(|(key, value)| {
                let value = if self.is_sensitive(key) {
                    Value::String(MASK.to_string())
                } else {
                    self.sanitize_child(value, depth)
                };
                (key.clone(), value)
            })
            .collect()
    }

    /// `value` sits inside a container at `depth`, so a container value is
    /// one level deeper.
    fn sanitize_child(&self, value: &Value, depth: usize) -> Value {
        let is_container = value.is_object() || value.is_array();
        match self.max_depth {
            Some(max) if is_container && depth + 1 > max => Value::String(MASK.to_string()),
            _ => self.sanitize_at(value, depth + 1),
        }
    }
}

/// Sanitize a tree with the default denylist.
pub fn sanitize(tree: &ConfigTree) -> Map<String, Value> {
    ConfigDumper::default().sanitize_tree(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn password_is_masked() {
        let dumped = ConfigDumper::default().sanitize(&json!({"host": "localhost", "password": "secret"}));
        assert_eq!(dumped, json!({"host": "localhost", "password": "..."}));
    }

    #[test]
    fn match_is_case_insensitive() {
        let dumped = ConfigDumper::default().sanitize(&json!({"PassWord": "secret"}));
        assert_eq!(dumped, json!({"PassWord": "..."}));
    }

    #[test]
    fn nested_tables_are_collapsed_by_default() {
        let dumped = ConfigDumper::default().sanitize(&json!({"password": "secret", "port": {"value": 5432}}));
        assert_eq!(dumped, json!({"password": "...", "port": "..."}));
    }

    #[test]
    fn sensitive_subtree_is_collapsed_whole() {
        let dumped = ConfigDumper::default().full_depth().sanitize(&json!({
            "password": {"primary": "a", "replica": "b"},
            "port": {"value": 5432},
        }));
        assert_eq!(dumped, json!({"password": "...", "port": {"value": 5432}}));
    }

    #[test]
    fn nested_sensitive_keys_are_found() {
        let dumped = ConfigDumper::default().full_depth().sanitize(&json!({
            "database": {"user": "app", "password": "x"},
            "replicas": [{"password": "y", "host": "r1"}],
        }));
        assert_eq!(
            dumped,
            json!({
                "database": {"user": "app", "password": "..."},
                "replicas": [{"password": "...", "host": "r1"}],
            })
        );
    }

    #[test]
    fn default_collapses_every_subtree() {
        let dumped = ConfigDumper::default().sanitize(&json!({
            "password": "secret",
            "port": {"value": 5432},
            "hosts": ["a", "b"],
            "env": "dev",
        }));
        assert_eq!(
            dumped,
            json!({"password": "...", "port": "...", "hosts": "...", "env": "dev"})
        );
    }

    #[test]
    fn max_depth_one_keeps_first_level() {
        let dumped = ConfigDumper::default()
            .with_max_depth(1)
            .sanitize(&json!({"a": {"b": 1, "c": {"d": 2}}}));
        assert_eq!(dumped, json!({"a": {"b": 1, "c": "..."}}));
    }

    #[test]
    fn custom_denylist() {
        let dumper = ConfigDumper::new(["token", "Secret"]);
        let dumped = dumper.sanitize(&json!({"token": "t", "secret": "s", "password": "p"}));
        assert_eq!(dumped, json!({"token": "...", "secret": "...", "password": "p"}));
    }

    #[test]
    fn quoted_storage_keys_still_match() {
        assert!(ConfigDumper::default().is_sensitive("\"password\""));
    }

    #[test]
    fn sanitize_tree_uses_stored_keys() {
        let tree = ConfigTree::from_value("dev", json!({"db.password": "x", "password": "y"})).unwrap();
        let dumped = sanitize(&tree);
        assert_eq!(dumped["password"], json!("..."));
        assert_eq!(dumped["\"db.password\""], json!("x"));
    }
}
