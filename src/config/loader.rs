//! Source discovery and the `load` fold.
//!
//! Priority (highest to lowest):
//! 1. The application dictionary passed to [`load`]
//! 2. Registered dictionaries, later registrations first
//! 3. `<name>.<env>.conf.<ext>` files in the config directory
//! 4. `<name>.conf.<ext>` files in the config directory
//!
//! Supported extensions are `json`, `toml`, `yaml` and `yml`. Every file is
//! decoded into a mapping and run through env interpolation before merging.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::Config;
use super::registry::Registry;
use crate::constants;
use crate::env::Env;
use crate::error::ConfigError;
use crate::interpolate;
use crate::models::Environment;
use crate::tree::merge::fallback_all;

/// Options for a single [`load`] call.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Active environment. Falls back to `ENV` in the app dictionary, then
    /// to the `ENV` variable.
    pub env: Option<String>,
    /// Directory searched for config files. Falls back to `CONFIG_DIR`,
    /// then the current directory.
    pub config_dir: Option<PathBuf>,
    /// Application dictionary, highest precedence.
    pub app: Option<Map<String, Value>>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    pub fn config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    pub fn app(mut self, app: Map<String, Value>) -> Self {
        self.app = Some(app);
        self
    }
}

/// Config file formats understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
    Yaml,
}

impl Format {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "toml" => Some(Format::Toml),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }

    /// Parse text into an untyped document (no interpolation).
    pub fn parse(self, text: &str) -> Result<Value, String> {
        match self {
            Format::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            Format::Toml => toml::from_str(text).map_err(|e| e.to_string()),
            Format::Yaml => serde_yaml_ng::from_str(text).map_err(|e| e.to_string()),
        }
    }
}

/// A config file found in the config directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub format: Format,
    /// Environment qualifier (`app.dev.conf.json` → `dev`).
    pub env: Option<String>,
}

impl ConfigFile {
    /// Recognise `<name>[.<env>].conf.<ext>`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let (stem, ext) = file_name.rsplit_once(constants::CONFIG_FILE_MARKER)?;
        let format = Format::from_extension(ext)?;
        if stem.is_empty() {
            return None;
        }
        let env = stem.rsplit_once('.').map(|(_, env)| env.to_string());
        Some(Self {
            path: path.to_path_buf(),
            format,
            env,
        })
    }

    /// Read, parse, and interpolate the file. The root must be a mapping.
    pub fn read(&self, env: &Env) -> Result<Map<String, Value>, ConfigError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::ReadFile {
            path: self.path.clone(),
            source: e,
        })?;
        let document = self
            .format
            .parse(&content)
            .map_err(|message| ConfigError::ParseFile {
                path: self.path.clone(),
                message,
            })?;
        match interpolate::interpolate_value(document, env)? {
            Value::Object(map) => Ok(map),
            _ => Err(ConfigError::InvalidRoot {
                path: self.path.clone(),
            }),
        }
    }
}

/// List config files in `dir` (non-recursive), lowest precedence first.
///
/// Generic files come before files for `environment`; files for other
/// environments are skipped. A missing directory yields no files.
pub fn discover_files(dir: &Path, environment: Option<&Environment>) -> Result<Vec<ConfigFile>, ConfigError> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "config directory does not exist");
        return Ok(Vec::new());
    }

    let read_error = |source| ConfigError::ReadFile {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if !path.is_file() {
            continue;
        }
        let Some(file) = ConfigFile::from_path(&path) else {
            continue;
        };
        match (&file.env, environment) {
            (None, _) => files.push(file),
            (Some(file_env), Some(active)) if active == file_env.as_str() => files.push(file),
            (Some(file_env), _) => {
                warn!(path = %path.display(), env = %file_env, "ignoring config file for another environment");
            }
        }
    }

    files.sort_by(|a, b| {
        a.env
            .is_some()
            .cmp(&b.env.is_some())
            .then_with(|| a.path.file_name().cmp(&b.path.file_name()))
    });
    Ok(files)
}

/// Build the final configuration.
///
/// Sources are folded with [`fallback_all`] from lowest to highest
/// precedence (see the module docs). Fails with
/// [`ConfigError::NoConfigSource`] when nothing at all was found, and with
/// [`ConfigError::NoEnvironment`] when no environment could be resolved.
pub fn load(registry: &Registry, options: LoadOptions, env: &Env) -> Result<Config, ConfigError> {
    let LoadOptions {
        env: explicit_env,
        config_dir,
        app,
    } = options;

    let app_env = app
        .as_ref()
        .and_then(|app| app.get(constants::APP_ENV_KEY))
        .and_then(Value::as_str);
    let explicit_env = explicit_env.as_deref().filter(|name| !name.is_empty());
    let environment = Environment::resolve(explicit_env.or(app_env), env).ok();

    let config_dir = config_dir
        .or_else(|| env.get_non_empty(constants::ENV_CONFIG_DIR).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));

    let files = discover_files(&config_dir, environment.as_ref())?;
    let registered = registry.snapshot();

    debug!(
        files = files.len(),
        registered = registered.len(),
        app = app.is_some(),
        dir = %config_dir.display(),
        "merging configuration sources"
    );

    let mut sources = Vec::with_capacity(files.len() + registered.len() + 1);
    for file in &files {
        debug!(path = %file.path.display(), "loading config file");
        sources.push(Value::Object(file.read(env)?));
    }
    sources.extend(registered.into_iter().map(Value::Object));
    sources.extend(app.map(Value::Object));

    let Some(Value::Object(merged)) = fallback_all(sources) else {
        return Err(ConfigError::NoConfigSource);
    };

    let Some(environment) = environment else {
        warn!("configuration sources found but no environment is defined");
        return Err(ConfigError::NoEnvironment);
    };

    debug!(env = %environment, keys = merged.len(), "configuration loaded");
    Ok(Config::from_dict(environment, merged))
}
