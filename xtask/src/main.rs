//! Project automation tasks.
//!
//! Run via `cargo xtask <command>`.

use std::{
    fs,
    path::{Path, PathBuf},
    process,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use xshell::{Shell, cmd};

/// Backends whose demo transcripts `transcripts` writes.
const DEMO_BACKENDS: &[&str] = &["gnuplot", "matplotlib", "template", "vtk"];
/// Demo scenes rendered by `transcripts`.
const DEMO_SCENES: &[&str] = &["line", "peaks", "quiver"];

/// Command line interface for the `xtask` helper.
#[derive(Debug, Parser)]
#[command(name = "xtask")]
struct Cli {
    /// Task to run.
    #[command(subcommand)]
    command: CommandName,
}

/// Supported automation commands.
#[derive(Debug, Subcommand)]
enum CommandName {
    /// Format the workspace and run the linter.
    Tidy,
    /// Run tests using cargo nextest, with and without optional backends.
    Test,
    /// Write every demo scene for every backend into `target/transcripts/`.
    Transcripts {
        /// Output directory (defaults to `target/transcripts`).
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Common repository paths computed relative to the `xtask` crate.
#[derive(Debug, Clone)]
struct RepoPaths {
    /// Repository root directory.
    root: PathBuf,
    /// Default transcript output directory.
    transcripts: PathBuf,
}

impl RepoPaths {
    /// Discover repository paths from `CARGO_MANIFEST_DIR`.
    fn discover() -> Result<Self> {
        let xtask_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let root = xtask_dir
            .parent()
            .context("xtask crate must live at <repo>/xtask")?
            .to_path_buf();

        Ok(Self {
            transcripts: root.join("target").join("transcripts"),
            root,
        })
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        process::exit(1);
    }
}

/// Dispatch the selected `xtask` command.
fn run() -> Result<()> {
    let cli = Cli::parse();
    let paths = RepoPaths::discover()?;

    match cli.command {
        CommandName::Tidy => tidy(&paths),
        CommandName::Test => test(&paths),
        CommandName::Transcripts { out } => {
            transcripts(&paths, out.as_deref().unwrap_or(&paths.transcripts))
        }
    }
}

/// Run `cargo fmt` and the workspace linter.
fn tidy(paths: &RepoPaths) -> Result<()> {
    format_workspace(paths)?;
    lint_workspace(paths)?;
    format_workspace(paths)?;
    Ok(())
}

/// Run tests using cargo nextest for the default and the full feature set.
fn test(paths: &RepoPaths) -> Result<()> {
    let sh = repo_shell(paths)?;
    cmd!(sh, "cargo nextest run --all").run()?;
    cmd!(sh, "cargo nextest run -p easyviz -p easyviz-cli --features vtk").run()?;
    cmd!(sh, "cargo test --doc -p easyviz").run()?;
    Ok(())
}

/// Format the Rust workspace using rustfmt.
fn format_workspace(paths: &RepoPaths) -> Result<()> {
    let sh = repo_shell(paths)?;

    let config = paths.root.join("rustfmt-nightly.toml");
    if config.is_file() {
        cmd!(sh, "cargo +nightly fmt --all -- --config-path {config}").run()?;
        return Ok(());
    }

    cmd!(sh, "cargo +nightly fmt --all").run()?;
    Ok(())
}

/// Run clippy across the workspace, applying safe fixes.
fn lint_workspace(paths: &RepoPaths) -> Result<()> {
    let sh = repo_shell(paths)?;
    cmd!(
        sh,
        "cargo clippy -q --fix --all --all-targets --all-features --allow-dirty --tests"
    )
    .run()?;
    Ok(())
}

/// Run every demo scene through every backend, saving the transcripts.
fn transcripts(paths: &RepoPaths, out: &Path) -> Result<()> {
    let sh = repo_shell(paths)?;
    fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;

    cmd!(sh, "cargo build -q -p easyviz-cli --features vtk").run()?;
    let bin = paths.root.join("target").join("debug").join("easyviz");
    for backend in DEMO_BACKENDS {
        for scene in DEMO_SCENES {
            let file = out.join(format!("{scene}.{backend}.txt"));
            cmd!(sh, "{bin} --easyviz {backend} demo {scene} -o {file}").run()?;
        }
    }
    println!("Wrote transcripts to {}", out.display());
    Ok(())
}

/// Create a verbose shell rooted at the repository root.
fn repo_shell(paths: &RepoPaths) -> Result<Shell> {
    let sh = Shell::new()?;
    sh.change_dir(&paths.root);
    Ok(sh)
}
