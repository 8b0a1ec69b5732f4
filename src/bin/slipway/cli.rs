//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell as CompletionShell;

use slipway::config::{CONFIG_FILE, MANIFEST_FILE};
use slipway::util::shell::ColorChoice;

/// Slipway - a configure-style feature probing engine for C
#[derive(Parser)]
#[command(name = "slipway")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (echo compiler command lines)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress status output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output mode
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe the environment and persist the build configuration
    Configure(ConfigureArgs),

    /// Show a persisted configuration
    Show(ShowArgs),

    /// Install declared files into their destinations
    Install(InstallArgs),

    /// Remove previously installed files
    Uninstall(InstallArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ConfigureArgs {
    /// Manifest to load
    #[arg(long, default_value = MANIFEST_FILE)]
    pub manifest: PathBuf,

    /// Where to write the configuration artifact
    #[arg(long, default_value = CONFIG_FILE)]
    pub out: PathBuf,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Configuration artifact to read
    #[arg(long, default_value = CONFIG_FILE)]
    pub file: PathBuf,

    /// Emit machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct InstallArgs {
    /// Manifest to load
    #[arg(long, default_value = MANIFEST_FILE)]
    pub manifest: PathBuf,

    /// Configuration artifact to read
    #[arg(long, default_value = CONFIG_FILE)]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: CompletionShell,
}
