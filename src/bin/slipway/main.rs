//! Slipway CLI - a configure-style feature probing engine for C

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use slipway::util::shell::Shell;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("slipway=debug")
    } else {
        EnvFilter::new("slipway=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let shell = Shell::from_flags(cli.quiet, cli.verbose, cli.color);

    // Execute command
    match cli.command {
        Commands::Configure(args) => commands::configure::execute(args, &shell),
        Commands::Show(args) => commands::show::execute(args),
        Commands::Install(args) => commands::install::execute(args, &shell),
        Commands::Uninstall(args) => commands::uninstall::execute(args, &shell),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
