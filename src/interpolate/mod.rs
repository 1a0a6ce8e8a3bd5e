//! Environment variable interpolation.
//!
//! Rewrites `$NAME` and `${NAME...}` placeholders inside string values,
//! with bash-style default (`-`, `:-`) and required (`?`, `:?`) modifiers.
//! Placeholders may appear anywhere in a value, so
//! `https://${HOST:-localhost}:8000/api` works.
//!
//! | Form | Unset | Set to "" |
//! |---|---|---|
//! | `$NAME`, `${NAME}` | left as written | `""` |
//! | `${NAME-def}` | `def` | `""` |
//! | `${NAME:-def}` | `def` | `def` |
//! | `${NAME?msg}` | error `msg.` | `""` |
//! | `${NAME:?msg}` | error `msg.` | error `msg.` |
//!
//! `$$NAME` and `$${...}` are escapes and are returned untouched.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::env::Env;
use crate::error::ConfigError;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\$\$(?:\{[^}]*\}|[A-Za-z_][A-Za-z0-9_]*)?",
        r"|\$\{(?P<name>[A-Za-z_][A-Za-z0-9_]*)(?:(?P<op>:?[-?])(?P<arg>[^}]*))?\}",
        r"|\$(?P<bare>[A-Za-z_][A-Za-z0-9_]*)",
    ))
    .expect("placeholder regex is valid")
});

/// Substitute every placeholder in `value`.
pub fn interpolate_env_var(value: &str, env: &Env) -> Result<String, ConfigError> {
    if !value.contains('$') {
        return Ok(value.to_string());
    }

    let mut out = String::with_capacity(value.len());
    let mut last = 0;
    for caps in PLACEHOLDER_RE.captures_iter(value) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&value[last..whole.start()]);
        out.push_str(&resolve(&caps, whole.as_str(), env)?);
        last = whole.end();
    }
    out.push_str(&value[last..]);
    Ok(out)
}

fn resolve(caps: &Captures<'_>, token: &str, env: &Env) -> Result<String, ConfigError> {
    if let Some(bare) = caps.name("bare") {
        return Ok(env.get(bare.as_str()).unwrap_or_else(|| token.to_string()));
    }

    // Escaped `$$...`
    let Some(name) = caps.name("name").map(|m| m.as_str()) else {
        return Ok(token.to_string());
    };
    let arg = caps.name("arg").map_or("", |m| m.as_str());
    let value = env.get(name);

    match caps.name("op").map(|m| m.as_str()) {
        None => Ok(value.unwrap_or_else(|| token.to_string())),
        Some("-") => Ok(value.unwrap_or_else(|| arg.to_string())),
        Some(":-") => Ok(value
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| arg.to_string())),
        Some("?") => value.ok_or_else(|| ConfigError::required(name, arg)),
        Some(":?") => value
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::required(name, arg)),
        Some(_) => Ok(token.to_string()),
    }
}

/// Decode hook: interpolate every string scalar in a parsed document.
///
/// Numbers, booleans, and nulls pass through; arrays and objects are
/// rebuilt from their interpolated children. Object keys are left alone.
pub fn interpolate_value(value: Value, env: &Env) -> Result<Value, ConfigError> {
    match value {
        Value::String(s) => interpolate_env_var(&s, env).map(Value::String),
        Value::Array(items) => items
            .into_iter()
            .map(|item| interpolate_value(item, env))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => map
            .into_iter()
            .map(|(k, v)| Ok((k, interpolate_value(v, env)?)))
            .collect::<Result<serde_json::Map<_, _>, ConfigError>>()
            .map(Value::Object),
        scalar => Ok(scalar),
    }
}

/// Parse JSON text and run the decode hook over the result.
pub fn from_json_str(text: &str, env: &Env) -> Result<Value, ConfigError> {
    let value: Value = serde_json::from_str(text)?;
    interpolate_value(value, env)
}
