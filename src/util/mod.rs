//! Shared utilities.

pub mod diagnostic;
pub mod fs;
pub mod process;
pub mod shell;

pub use diagnostic::{DeclarationError, ProbeError};
pub use shell::{ColorChoice, Shell, Status, Verbosity};
