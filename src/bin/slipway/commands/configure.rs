//! `slipway configure` - run the probing pass and persist the artifact.

use anyhow::Result;

use slipway::ops::{configure, ConfigureOptions};
use slipway::util::shell::Shell;

use crate::cli::ConfigureArgs;

pub fn execute(args: ConfigureArgs, shell: &Shell) -> Result<()> {
    let opts = ConfigureOptions {
        manifest: args.manifest,
        out: args.out,
    };
    configure(&opts, shell)?;
    Ok(())
}
