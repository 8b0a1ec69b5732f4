//! The `slipway install` / `slipway uninstall` operations.

use std::path::Path;

use anyhow::{bail, Result};

use crate::config::{Configuration, DirSet, Manifest};
use crate::install::{self, InstallEntry, Ownership};
use crate::util::shell::Shell;

/// Resolve the manifest's install declarations against a finished
/// configuration, expanding destinations through its directories.
///
/// It is an error when the manifest declares no installers: the install
/// and uninstall tasks only exist once an entry was declared.
pub fn entries_from_manifest(
    manifest: &Manifest,
    config: &Configuration,
) -> Result<Vec<InstallEntry>> {
    if !manifest.has_installers() {
        bail!("no install entries declared in the manifest");
    }

    let mut dirs = DirSet::new();
    for (name, path) in &config.directories {
        dirs.insert(name.clone(), path.display().to_string());
    }

    manifest
        .install
        .iter()
        .map(|decl| {
            let dest = dirs.expand(&decl.dest)?;
            let mode = decl.mode.as_deref().map(install::parse_mode).transpose()?;
            let ownership = Ownership {
                uid: decl.uid,
                gid: decl.gid,
                mode,
            };
            Ok(InstallEntry {
                files: decl.files.clone(),
                dest,
                ownership: (!ownership.is_noop()).then_some(ownership),
            })
        })
        .collect()
}

/// Install everything the manifest declares.
pub fn run_install(
    root: &Path,
    manifest: &Manifest,
    config: &Configuration,
    shell: &Shell,
) -> Result<()> {
    let entries = entries_from_manifest(manifest, config)?;
    install::install(root, &entries, shell)
}

/// Remove everything the manifest declares, children before parents.
pub fn run_uninstall(
    root: &Path,
    manifest: &Manifest,
    config: &Configuration,
    shell: &Shell,
) -> Result<()> {
    let entries = entries_from_manifest(manifest, config)?;
    install::uninstall(root, &entries, shell)
}
