//! App-wide constants.
//!
//! Centralises the tool name, environment variable names, config file
//! naming, and the dumper's mask so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "conftree";

/// Crate version, embedded at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Marker between a config file's stem and its format extension
/// (`app.conf.json`, `app.dev.conf.yaml`).
pub const CONFIG_FILE_MARKER: &str = ".conf.";

/// Key under which every loaded tree records its environment.
pub const ENV_KEY: &str = "env";

/// Key in an application dictionary that may name the environment.
pub const APP_ENV_KEY: &str = "ENV";

/// Key holding the application name.
pub const APP_NAME_KEY: &str = "app_name";

/// Key holding the application version.
pub const APP_VERSION_KEY: &str = "app_version";

/// Replacement text for masked values in sanitized dumps.
pub const MASK: &str = "...";

/// Keys whose values are always masked by the default dumper.
pub const SENSITIVE_KEYS: &[&str] = &["password"];

// ── Environment variable names ──────────────────────────────────────

pub const ENV_ENV: &str = "ENV";
pub const ENV_CONFIG_DIR: &str = "CONFIG_DIR";
pub const ENV_LOG: &str = "CONFTREE_LOG";
