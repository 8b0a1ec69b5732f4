//! Toolchain auto-detection.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Result};

use crate::util::process::{find_c_compiler, find_executable};

use super::{GccToolchain, MsvcToolchain, Toolchain, ToolchainFamily};

/// Detect a C toolchain.
///
/// The configured environment's `CC` entry wins, then the `CC` process
/// variable, then a PATH search over common compiler names.
pub fn detect_toolchain(environment: &BTreeMap<String, String>) -> Result<Box<dyn Toolchain>> {
    let cc = match environment.get("CC") {
        Some(cc) if !cc.is_empty() => match find_executable(cc) {
            Some(path) => Some(path),
            None => bail!("configured compiler `{}` not found in PATH", cc),
        },
        _ => find_c_compiler(),
    };

    let Some(cc) = cc else {
        bail!("no C compiler found; install one or set the CC environment variable");
    };

    tracing::debug!(compiler = %cc.display(), "detected toolchain");

    match classify(&cc) {
        ToolchainFamily::Msvc => Ok(Box::new(MsvcToolchain::new(cc))),
        family => Ok(Box::new(GccToolchain::new(cc, family))),
    }
}

/// Classify a compiler by its executable name.
fn classify(cc: &Path) -> ToolchainFamily {
    let name = cc
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if name == "cl" {
        ToolchainFamily::Msvc
    } else if name.contains("clang") {
        ToolchainFamily::Clang
    } else {
        // "cc" is usually a gcc or clang symlink; gcc flags work either way.
        ToolchainFamily::Gcc
    }
}
