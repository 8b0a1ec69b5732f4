//! Toolchain abstraction for the probe engine.
//!
//! This module provides a unified interface for generating compiler and
//! linker commands across toolchains (GCC, Clang, MSVC), plus the
//! [`ToolDriver`] primitive the probe engine runs against: compile or link
//! a trial source and report the exit verdict as a boolean. Tests
//! substitute a recording driver; production wraps a detected toolchain.
//!
//! Toolchain detection priority:
//! 1. The `CC` value recorded in the configuration environment
//! 2. The `CC` process environment variable
//! 3. Auto-detection (searching PATH for common compilers)

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::util::process::ProcessBuilder;
use crate::util::shell::Shell;

mod detect;
mod gcc;
mod msvc;

pub use detect::detect_toolchain;
pub use gcc::GccToolchain;
pub use msvc::MsvcToolchain;

/// How a trial source is to be compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileMode {
    /// Preprocessor-only pass; used by header and macro probes.
    Preprocess,
    /// Full compile to an object file; used by function and library probes.
    Object,
}

/// A command to execute, with program, arguments, and environment.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// The program to run (e.g., "gcc", "cl.exe")
    pub program: PathBuf,
    /// Command arguments
    pub args: Vec<String>,
    /// Environment variables to set
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    /// Create a new command spec.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    /// Add an environment variable.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// Input for a compile step.
#[derive(Debug, Clone)]
pub struct CompileInput {
    /// Source file to compile
    pub source: PathBuf,
    /// Output file (preprocessed text or object, depending on mode)
    pub output: PathBuf,
    /// Include directories
    pub include_dirs: Vec<PathBuf>,
    /// Preprocessor defines (name, optional value)
    pub defines: Vec<(String, Option<String>)>,
}

/// Input for a link step.
#[derive(Debug, Clone)]
pub struct LinkInput {
    /// Object files to link
    pub objects: Vec<PathBuf>,
    /// Output executable
    pub output: PathBuf,
    /// Library search paths
    pub lib_dirs: Vec<PathBuf>,
    /// Libraries to link (without -l prefix)
    pub libs: Vec<String>,
}

/// The platform/family of a toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainFamily {
    /// GCC (GNU Compiler Collection)
    Gcc,
    /// Clang/LLVM
    Clang,
    /// Microsoft Visual C++
    Msvc,
}

impl ToolchainFamily {
    /// Get the family name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolchainFamily::Gcc => "gcc",
            ToolchainFamily::Clang => "clang",
            ToolchainFamily::Msvc => "msvc",
        }
    }
}

/// Trait for toolchain implementations.
///
/// Each toolchain knows how to render commands for its specific compiler.
pub trait Toolchain: Send + Sync {
    /// Get the toolchain family.
    fn family(&self) -> ToolchainFamily;

    /// Get the C compiler path.
    fn compiler_path(&self) -> &Path;

    /// Render a compile command for the given mode.
    fn compile_command(&self, input: &CompileInput, mode: CompileMode) -> CommandSpec;

    /// Render a link command producing an executable.
    fn link_command(&self, input: &LinkInput) -> CommandSpec;

    /// Get the object file extension.
    fn object_extension(&self) -> &str;

    /// Get the executable extension.
    fn exe_extension(&self) -> &str;
}

/// The compile/link primitive the probe engine runs against.
///
/// Implementations interpret the external process exit status only; they
/// never inspect produced binaries. A nonzero exit is a `false` verdict,
/// not an error; `Err` is reserved for failures to run the tool at all.
pub trait ToolDriver {
    /// Compile a trial source. Returns whether the compiler accepted it.
    fn compile(&self, input: &CompileInput, mode: CompileMode) -> Result<bool>;

    /// Link trial objects. Returns whether the linker succeeded.
    fn link(&self, input: &LinkInput) -> Result<bool>;
}

/// Production driver: renders commands through a [`Toolchain`] and executes
/// them, injecting the configured environment into every invocation.
pub struct CommandDriver<'a> {
    toolchain: Box<dyn Toolchain>,
    env: Vec<(String, String)>,
    shell: &'a Shell,
}

impl<'a> CommandDriver<'a> {
    /// Create a driver around a toolchain.
    pub fn new(
        toolchain: Box<dyn Toolchain>,
        env: Vec<(String, String)>,
        shell: &'a Shell,
    ) -> Self {
        CommandDriver {
            toolchain,
            env,
            shell,
        }
    }

    /// The wrapped toolchain.
    pub fn toolchain(&self) -> &dyn Toolchain {
        self.toolchain.as_ref()
    }

    fn run(&self, spec: CommandSpec) -> Result<bool> {
        let mut pb = ProcessBuilder::new(&spec.program).args(&spec.args);
        for (key, value) in &self.env {
            pb = pb.env(key, value);
        }
        for (key, value) in &spec.env {
            pb = pb.env(key, value);
        }

        self.shell.verbose(pb.display_command());
        let output = pb.exec()?;
        if !output.status.success() {
            tracing::debug!(
                command = %pb.display_command(),
                code = ?output.status.code(),
                stderr = %String::from_utf8_lossy(&output.stderr),
                "trial rejected"
            );
        }
        Ok(output.status.success())
    }
}

impl ToolDriver for CommandDriver<'_> {
    fn compile(&self, input: &CompileInput, mode: CompileMode) -> Result<bool> {
        self.run(self.toolchain.compile_command(input, mode))
    }

    fn link(&self, input: &LinkInput) -> Result<bool> {
        self.run(self.toolchain.link_command(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_spec_builder() {
        let spec = CommandSpec::new("gcc")
            .arg("-c")
            .args(["trial.c", "-o", "trial.o"])
            .env("LANG", "C");

        assert_eq!(spec.program, PathBuf::from("gcc"));
        assert_eq!(spec.args, vec!["-c", "trial.c", "-o", "trial.o"]);
        assert_eq!(spec.env, vec![("LANG".to_string(), "C".to_string())]);
    }
}
