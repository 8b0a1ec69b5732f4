//! Slipway - a configure-style feature probing and build configuration
//! engine for C projects.
//!
//! This crate discovers which headers, macros, functions, and libraries
//! the target environment provides by compiling small trial programs with
//! the real toolchain, and records the results in a persisted
//! configuration artifact that downstream compile/link/install steps
//! consume.

pub mod config;
pub mod install;
pub mod ops;
pub mod toolchain;
pub mod util;

/// Test utilities and mocks for slipway unit tests.
///
/// Only available in test builds; provides a recording compile/link
/// primitive so the probe engine runs without a real compiler.
#[cfg(test)]
pub mod test_support;

pub use config::{
    Configuration, Definitions, DirSet, FeatureState, MacroValue, Manifest, Probe, ProbeKind,
    CONFIG_FILE, MANIFEST_FILE,
};
pub use toolchain::{detect_toolchain, CommandDriver, ToolDriver, Toolchain};
pub use util::shell::Shell;
