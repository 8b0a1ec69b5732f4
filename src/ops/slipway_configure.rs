//! The `slipway configure` operation.

use std::path::PathBuf;

use anyhow::Result;

use crate::config::{Configuration, Manifest};
use crate::toolchain::{detect_toolchain, CommandDriver};
use crate::util::shell::{Shell, Status};

/// Options for a configure run.
#[derive(Debug, Clone)]
pub struct ConfigureOptions {
    /// Manifest to load.
    pub manifest: PathBuf,
    /// Where to persist the finished artifact.
    pub out: PathBuf,
}

/// Load the manifest, run the probing pass against the detected
/// toolchain, and persist the finished configuration.
pub fn configure(opts: &ConfigureOptions, shell: &Shell) -> Result<Configuration> {
    let manifest = Manifest::load(&opts.manifest)?;
    let defs = manifest.to_definitions()?;

    // Resolve environment overrides up front so toolchain detection sees
    // the same values the artifact will record.
    let mut seed = Configuration::new(defs.environment());
    seed.apply_env();

    let toolchain = detect_toolchain(&seed.environment)?;
    shell.status(
        Status::Configuring,
        format!(
            "with {} ({})",
            toolchain.compiler_path().display(),
            toolchain.family().as_str()
        ),
    );

    let env: Vec<(String, String)> = seed
        .environment
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let driver = CommandDriver::new(toolchain, env, shell);

    let config = defs.perform(&driver, shell)?;
    config.save(&opts.out)?;
    shell.status(Status::Saved, opts.out.display());

    shell.status(
        Status::Configured,
        format!(
            "{} feature(s), {} macro(s), {} header(s), {} lib(s)",
            config.features.len(),
            config.macros.len(),
            config.headers.len(),
            config.libs.len()
        ),
    );
    Ok(config)
}
