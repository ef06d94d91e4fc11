//! Command‑line entry point for the `easyviz` tool.
//!
//! Provides subcommands to list the registered backends, inspect the facade
//! a configuration produces, and run demo scenes through it.

use std::{
    env,
    fmt::Display,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use easyviz::{Config, Facade, Registry, Verbosity, config, registry};
use tracing_subscriber::EnvFilter;

/// Demo scenes.
mod demo;

use crate::demo::Scene;

/// Validate a backend name against the registry.
fn parse_backend_name(s: &str) -> Result<String, String> {
    if registry::BACKEND_NAMES.contains(&registry::normalize(s).as_str()) {
        Ok(s.to_string())
    } else {
        Err(format!(
            "Invalid backend name '{}'. Valid options: {}",
            s,
            registry::BACKEND_NAMES.join(", ")
        ))
    }
}

#[derive(Parser)]
#[command(name = "easyviz")]
#[command(version = env!("CARGO_PKG_VERSION"))]
/// Top‑level CLI options and subcommands.
struct Cli {
    /// Sets the level of verbosity (`-v`, `-vv`, ...).
    #[arg(short, action = clap::ArgAction::Count, help = "Sets the level of verbosity")]
    v: u8,

    /// Backend overriding the configuration file and environment.
    #[arg(
        long = "easyviz",
        value_name = "NAME",
        global = true,
        value_parser = parse_backend_name,
        help = &format!("Backend name (options: {})", registry::BACKEND_NAMES.join(", "))
    )]
    backend: Option<String>,

    /// Explicit configuration file.
    #[arg(
        long = "config",
        value_name = "PATH",
        global = true,
        help = "Configuration file (default: ./.easyviz.toml, then ~/.easyviz.toml)"
    )]
    config: Option<PathBuf>,

    /// Command to execute.
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
/// Subcommands supported by the `easyviz` tool.
enum Commands {
    #[command(about = "List registered backends and whether they are built in")]
    /// List registered backends.
    Backends,

    #[command(about = "Initialise the facade and describe its namespace")]
    /// Initialise the facade and print its namespace.
    Info,

    #[command(about = "Run a demo scene and write the backend transcript")]
    /// Run a demo scene.
    Demo {
        #[arg(value_enum, help = "Scene to draw")]
        /// Scene to draw.
        scene: Scene,

        #[arg(
            short = 'o',
            long = "output",
            help = "Optional transcript file; printed to stdout when omitted"
        )]
        /// Optional transcript path (stdout when not provided).
        output: Option<PathBuf>,
    },
}

/// Print a success message or exit with an error.
fn report_ok<E: Display>(result: Result<(), E>, ok_msg: &str) {
    match result {
        Ok(()) => {
            if !ok_msg.is_empty() {
                println!("{ok_msg}");
            }
        }
        Err(e) => {
            eprintln!("{e:#}");
            process::exit(1);
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let default_level = "warn";
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

/// Assemble the configuration: file, environment, then command-line flags.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_with(
        cli.config.as_deref(),
        |name| env::var(name).ok(),
        Vec::<String>::new(),
    )?;
    if let Some(backend) = &cli.backend {
        config.backend.clone_from(backend);
    }
    if cli.v > 0 {
        let requested = Verbosity::try_from(i64::from(cli.v.min(3)))?;
        config.verbosity = config.verbosity.max(requested);
    }
    tracing::debug!(
        backend = %config.backend,
        verbosity = %config.verbosity,
        "configuration loaded"
    );
    Ok(config)
}

/// Initialise the process-wide facade.
fn facade(cli: &Cli) -> Result<&'static Facade> {
    let config = load_config(cli)?;
    easyviz::initialize(&config).context("easyviz initialisation failed")
}

/// Handle the `backends` subcommand.
fn handle_backends() {
    println!("Registered backends (key: display, output):");
    for entry in registry::REGISTRY {
        let status = match (entry.available, entry.requires) {
            (true, _) => String::new(),
            (false, Some(feature)) => format!(" [needs the `{feature}` feature]"),
            (false, None) => " [unavailable]".to_string(),
        };
        println!(
            "- {}: {}, {}{status}",
            entry.key, entry.display, entry.description
        );
    }
    if let Some(path) = config::discover() {
        println!("Configuration file: {}", path.display());
    }
}

/// Handle the `info` subcommand.
fn handle_info(cli: &Cli) -> Result<()> {
    let facade = facade(cli)?;
    let backend = facade.get_active_backend();
    let (primitives, utilities): (Vec<&str>, Vec<&str>) = facade
        .names()
        .into_iter()
        .partition(|name| facade.resolve(name).is_some_and(|s| s.is_primitive()));

    println!("backend: {} ({})", backend.name(), backend.display());
    println!("verbosity: {}", facade.config().verbosity);
    println!("primitives: {}", primitives.join(" "));
    println!("utilities: {}", utilities.join(" "));
    let known = Registry::builtin().names().len();
    println!("registered backends: {known}");
    Ok(())
}

/// Handle the `demo` subcommand.
fn handle_demo(cli: &Cli, scene: Scene, output: Option<&Path>) -> Result<()> {
    let facade = facade(cli)?;
    demo::run(facade, scene)?;

    let mut transcript = facade.get_active_backend().transcript().join("\n");
    transcript.push('\n');
    match output {
        Some(path) => fs::write(path, transcript)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout().write_all(transcript.as_bytes())?,
    }
    Ok(())
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Backends => handle_backends(),
        Commands::Info => report_ok(handle_info(&cli), ""),
        Commands::Demo { scene, output } => {
            let msg = output
                .as_ref()
                .map(|p| format!("Saved transcript to {}", p.display()))
                .unwrap_or_default();
            report_ok(handle_demo(&cli, *scene, output.as_deref()), &msg);
        }
    }
}
