//! Clap argument types for the `conftree` binary.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Inspect layered application configuration.
#[derive(Parser, Debug)]
#[command(name = "conftree", version = conftree::constants::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Print the merged configuration with sensitive values masked.
    Show(ShowArgs),

    /// Print a single value.
    Get(GetArgs),

    /// List the dotted path of every leaf value.
    Keys(SourceArgs),

    /// Print version information.
    Version,
}

/// Where configuration is loaded from.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Active environment (e.g. `dev`, `prod`).
    #[arg(long, env = "ENV")]
    pub env: Option<String>,

    /// Directory containing `*.conf.{json,toml,yaml,yml}` files.
    #[arg(long, env = "CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,
}

/// Arguments for the `show` subcommand.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Show nested tables instead of collapsing them to `...`.
    #[arg(long, default_value_t = false)]
    pub full: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// Arguments for the `get` subcommand.
#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Dotted key, e.g. `database.port` or `hosts."1.0.0.1".name`.
    pub key: String,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Coerce the value before printing.
    #[arg(long = "as", value_enum, default_value_t = ValueType::Raw)]
    pub value_type: ValueType,
}

/// Output format for `show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Toml,
}

/// Coercion applied by `get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValueType {
    String,
    Integer,
    Float,
    Bool,
    /// Print the stored value as-is (subtrees and lists as JSON).
    Raw,
}
