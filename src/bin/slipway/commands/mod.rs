//! CLI command implementations.

pub mod completions;
pub mod configure;
pub mod install;
pub mod show;
pub mod uninstall;
