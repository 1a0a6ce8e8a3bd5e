//! Integration tests for layered loading, environment resolution, and
//! sanitized dumps, using the public API of the conftree crate.

use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};

use conftree::config::{Config, LoadOptions, Registry, load};
use conftree::env::Env;
use conftree::error::ConfigError;
use conftree::security::{self, ConfigDumper};

fn map(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

/// Registry with the two library dictionaries shared by most tests.
fn registry_with(port: Value) -> Registry {
    let registry = Registry::new();
    registry.register(map(json!({"host": "localhost", "password": "password"})));
    registry.register(map(json!({"port": port, "password": "override"})));
    registry
}

fn load_in_empty_dir(registry: &Registry, options: LoadOptions, env: &Env) -> Result<Config, ConfigError> {
    let dir = tempfile::tempdir().unwrap();
    load(registry, options.config_dir(dir.path()), env)
}

// ---------------------------------------------------------------------------
// precedence
// ---------------------------------------------------------------------------

#[test]
fn later_registration_overrides_earlier() {
    let registry = registry_with(json!(5432));
    let app = load_in_empty_dir(&registry, LoadOptions::new(), &Env::mock([("ENV", "dev")])).unwrap();

    assert_eq!(app.get_string("password").unwrap(), "override");
    assert_eq!(app.get_string("host").unwrap(), "localhost");
    assert_eq!(app.get_integer("port").unwrap(), 5432);
}

#[test]
fn app_dictionary_overrides_registrations() {
    let registry = registry_with(json!(5432));
    let options = LoadOptions::new().app(map(json!({"password": "app_password"})));
    let app = load_in_empty_dir(&registry, options, &Env::mock([("ENV", "dev")])).unwrap();

    assert_eq!(app.get_string("password").unwrap(), "app_password");
}

#[test]
fn merged_key_order_follows_precedence() {
    let registry = registry_with(json!(5432));
    let options = LoadOptions::new().app(map(json!({"password": "app_password"})));
    let app = load_in_empty_dir(&registry, options, &Env::mock([("ENV", "dev")])).unwrap();

    let keys: Vec<_> = app.keys().collect();
    assert_eq!(keys, vec!["password", "port", "host", "env"]);
}

#[test]
fn nested_tables_merge_across_sources() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("db.conf.toml"),
        "[database]\nhost = \"localhost\"\nport = 5432\n",
    )
    .unwrap();

    let registry = Registry::new();
    registry.register(map(json!({"database": {"port": 6543}})));
    let options = LoadOptions::new()
        .env("dev")
        .config_dir(dir.path())
        .app(map(json!({"database": {"name": "orders"}})));
    let app = load(&registry, options, &Env::empty()).unwrap();

    assert_eq!(
        app.get_tree("database").unwrap().to_value(),
        json!({"name": "orders", "port": 6543, "host": "localhost"})
    );
}

#[test]
fn no_sources_is_an_error() {
    let err = load_in_empty_dir(&Registry::new(), LoadOptions::new(), &Env::empty()).unwrap_err();
    assert!(matches!(err, ConfigError::NoConfigSource));
}

// ---------------------------------------------------------------------------
// environment
// ---------------------------------------------------------------------------

#[test]
fn env_from_app_dictionary() {
    let registry = registry_with(json!(5432));
    let options = LoadOptions::new().app(map(json!({"password": "app_password", "ENV": "dev"})));
    let app = load_in_empty_dir(&registry, options, &Env::empty()).unwrap();

    assert_eq!(app.env(), &"dev");
    assert_eq!(app.get_string("env").unwrap(), "dev");
}

#[test]
fn explicit_env_beats_variable() {
    let registry = registry_with(json!(5432));
    let options = LoadOptions::new().env("prod");
    let app = load_in_empty_dir(&registry, options, &Env::mock([("ENV", "integration")])).unwrap();

    assert_eq!(app.env(), &"prod");
}

#[test]
fn subtrees_share_root_environment() {
    let registry = Registry::new();
    registry.register(map(json!({"db": {"pool": {"size": 4}}})));
    let app = load_in_empty_dir(&registry, LoadOptions::new(), &Env::mock([("ENV", "dev")])).unwrap();

    let pool = app.get_tree("db.pool").unwrap();
    assert_eq!(pool.env(), app.env());
}

#[test]
fn app_name_and_version() {
    let registry = registry_with(json!(5432));
    let options = LoadOptions::new().app(map(json!({
        "password": "app_password",
        "ENV": "dev",
        "app_name": "cool app",
        "app_version": "1.0.0",
    })));
    let app = load_in_empty_dir(&registry, options, &Env::empty()).unwrap();

    assert_eq!(app.app_name().unwrap(), "cool app");
    assert_eq!(app.app_version().unwrap(), "1.0.0");
}

// ---------------------------------------------------------------------------
// files
// ---------------------------------------------------------------------------

#[test]
fn loads_json_file_from_config_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bom.conf.json"), r#"{"a": "b"}"#).unwrap();

    let env = Env::mock([("ENV", "dev"), ("CONFIG_DIR", dir.path().to_str().unwrap())]);
    let app = load(&Registry::new(), LoadOptions::new(), &env).unwrap();

    assert_eq!(app.get_string("a").unwrap(), "b");
}

#[test]
fn dotted_file_keys_stay_literal() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("hosts.conf.yaml"),
        "hosts:\n  \"1.0.0.1\":\n    name: primary\n",
    )
    .unwrap();

    let app = load(
        &Registry::new(),
        LoadOptions::new().env("dev").config_dir(dir.path()),
        &Env::empty(),
    )
    .unwrap();

    assert_eq!(app.get_string("hosts.\"1.0.0.1\".name").unwrap(), "primary");
    assert!(app.get("hosts.1.0.0.1.name").is_err());
}

// ---------------------------------------------------------------------------
// dumper
// ---------------------------------------------------------------------------

#[test]
fn dump_hides_password() {
    let registry = registry_with(json!(5432));
    let options = LoadOptions::new().app(map(json!({"password": "app_password"})));
    let app = load_in_empty_dir(&registry, options, &Env::mock([("ENV", "dev")])).unwrap();

    let dumped = security::sanitize(&app);
    assert_eq!(dumped["password"], json!("..."));
    assert_eq!(dumped["host"], json!("localhost"));
}

#[test]
fn dump_hides_nested_tables() {
    let registry = registry_with(json!({"value": 5432}));
    let options = LoadOptions::new().app(map(json!({"password": "app_password"})));
    let app = load_in_empty_dir(&registry, options, &Env::mock([("ENV", "dev")])).unwrap();

    let dumped = security::sanitize(&app);
    assert_eq!(dumped["port"], json!("..."));
    assert_eq!(dumped["password"], json!("..."));
    assert_eq!(dumped["env"], json!("dev"));
}

#[test]
fn full_depth_dump_shows_nested_tables() {
    let registry = registry_with(json!({"value": 5432, "password": "nested"}));
    let app = load_in_empty_dir(&registry, LoadOptions::new(), &Env::mock([("ENV", "dev")])).unwrap();

    let dumped = ConfigDumper::default().full_depth().sanitize_tree(&app);
    assert_eq!(dumped["port"], json!({"value": 5432, "password": "..."}));
}

#[test]
fn dump_does_not_touch_config() {
    let registry = registry_with(json!(5432));
    let app = load_in_empty_dir(&registry, LoadOptions::new(), &Env::mock([("ENV", "dev")])).unwrap();

    let _ = security::sanitize(&app);
    assert_eq!(app.get_string("password").unwrap(), "override");
}
