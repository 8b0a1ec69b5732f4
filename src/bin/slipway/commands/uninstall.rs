//! `slipway uninstall` - remove previously installed files.

use anyhow::{Context, Result};

use slipway::config::{Configuration, Manifest};
use slipway::ops::run_uninstall;
use slipway::util::shell::Shell;

use crate::cli::InstallArgs;

pub fn execute(args: InstallArgs, shell: &Shell) -> Result<()> {
    let manifest = Manifest::load(&args.manifest)?;
    let config = Configuration::load(&args.file)
        .context("no configuration found; run `slipway configure` first")?;
    let root = std::env::current_dir()?;
    run_uninstall(&root, &manifest, &config, shell)
}
