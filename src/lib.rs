//! conftree: hierarchical, environment-aware application configuration.
//!
//! Configuration is layered from `*.conf.{json,toml,yaml,yml}` files, a
//! caller-owned [`config::Registry`] of dictionaries, and an application
//! dictionary, then exposed as an immutable [`tree::ConfigTree`] addressed
//! by dotted keys.

pub mod config;
pub mod constants;
pub mod env;
pub mod error;
pub mod interpolate;
pub mod models;
pub mod security;
pub mod tree;

pub use config::{Config, LoadOptions, Registry, load};
pub use error::ConfigError;
pub use models::{ConfigValue, Environment};
pub use tree::ConfigTree;
