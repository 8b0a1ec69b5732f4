//! High-level operations backing the CLI commands.

pub mod slipway_configure;
pub mod slipway_install;

pub use slipway_configure::{configure, ConfigureOptions};
pub use slipway_install::{entries_from_manifest, run_install, run_uninstall};
