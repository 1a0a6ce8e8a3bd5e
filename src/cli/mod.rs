//! CLI command definitions and output rendering.
//!
//! Uses clap derive macros for argument definitions.

pub mod args;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use args::{OutputFormat, ValueType};
use conftree::models::ConfigValue;
use conftree::tree::ConfigTree;

/// Serialize a sanitized mapping in the requested format.
pub fn render_map(map: &Map<String, Value>, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(map).context("failed to render JSON")?,
        OutputFormat::Yaml => serde_yaml_ng::to_string(map).context("failed to render YAML")?,
        OutputFormat::Toml => toml::to_string_pretty(map).context("failed to render TOML (null values are not representable)")?,
    };
    Ok(rendered.trim_end().to_string())
}

/// Look up `key` and render it after applying `value_type`.
pub fn render_value(tree: &ConfigTree, key: &str, value_type: ValueType) -> Result<String> {
    let rendered = match value_type {
        ValueType::String => tree.get_string(key)?,
        ValueType::Integer => tree.get_integer(key)?.to_string(),
        ValueType::Float => tree.get_float(key)?.to_string(),
        ValueType::Bool => tree.get_bool(key)?.to_string(),
        ValueType::Raw => match tree.get(key)? {
            value @ (ConfigValue::Tree(_) | ConfigValue::List(_)) => {
                serde_json::to_string_pretty(&value.to_json()).context("failed to render JSON")?
            }
            value => value.to_string(),
        },
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree() -> ConfigTree {
        ConfigTree::from_value(
            "dev",
            json!({"db": {"port": "5432", "ssl": "yes", "hosts": ["a", "b"]}, "ratio": 0.5, "nothing": null}),
        )
        .unwrap()
    }

    #[test]
    fn render_typed_values() {
        let tree = tree();
        assert_eq!(render_value(&tree, "db.port", ValueType::Integer).unwrap(), "5432");
        assert_eq!(render_value(&tree, "db.ssl", ValueType::Bool).unwrap(), "true");
        assert_eq!(render_value(&tree, "ratio", ValueType::Float).unwrap(), "0.5");
        assert_eq!(render_value(&tree, "db.port", ValueType::Raw).unwrap(), "5432");
    }

    #[test]
    fn render_raw_list_as_json() {
        let rendered = render_value(&tree(), "db.hosts", ValueType::Raw).unwrap();
        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, json!(["a", "b"]));
    }

    #[test]
    fn render_missing_key_fails() {
        assert!(render_value(&tree(), "db.user", ValueType::Raw).is_err());
    }

    #[test]
    fn render_map_formats() {
        let map = json!({"env": "dev", "db": {"port": 5432}}).as_object().cloned().unwrap();
        assert!(render_map(&map, OutputFormat::Json).unwrap().contains("\"port\": 5432"));
        assert!(render_map(&map, OutputFormat::Yaml).unwrap().contains("port: 5432"));
        assert!(render_map(&map, OutputFormat::Toml).unwrap().contains("[db]"));
    }
}
