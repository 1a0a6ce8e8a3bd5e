//! conftree: inspect layered application configuration.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! error propagation and user-facing messages.

mod cli;

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::args::{Cli, Command, GetArgs, ShowArgs, SourceArgs};
use conftree::config::{self, Config, LoadOptions, Registry};
use conftree::constants;
use conftree::env::Env;
use conftree::security::ConfigDumper;

fn main() {
    init_logging();

    if let Err(err) = run() {
        eprintln!("{} {err:#}", "Error:".red().bold());
        process::exit(1);
    }
}

/// Log to stderr, filtered by `CONFTREE_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env(constants::ENV_LOG).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Show(args) => run_show(args),
        Command::Get(args) => run_get(args),
        Command::Keys(args) => run_keys(args),
        Command::Version => run_version(),
    }
}

/// Load the merged configuration for the given source flags.
fn load_config(source: SourceArgs) -> Result<Config> {
    let mut options = LoadOptions::new();
    if let Some(env) = source.env {
        options = options.env(env);
    }
    if let Some(dir) = source.config_dir {
        options = options.config_dir(dir);
    }
    config::load(&Registry::new(), options, &Env::real()).context("failed to load configuration")
}

fn run_show(args: ShowArgs) -> Result<()> {
    let conf = load_config(args.source)?;
    let dumper = if args.full {
        ConfigDumper::default().full_depth()
    } else {
        ConfigDumper::default()
    };
    let sanitized = dumper.sanitize_tree(&conf);
    println!("{}", cli::render_map(&sanitized, args.format)?);
    Ok(())
}

fn run_get(args: GetArgs) -> Result<()> {
    let conf = load_config(args.source)?;
    let rendered = cli::render_value(&conf, &args.key, args.value_type)
        .with_context(|| format!("failed to read `{}`", args.key))?;
    println!("{rendered}");
    Ok(())
}

fn run_keys(args: SourceArgs) -> Result<()> {
    let conf = load_config(args)?;
    for path in conf.leaf_paths() {
        println!("{path}");
    }
    Ok(())
}

fn run_version() -> Result<()> {
    println!("{} {}", constants::APP_NAME.bold(), constants::VERSION.green().bold());
    Ok(())
}
