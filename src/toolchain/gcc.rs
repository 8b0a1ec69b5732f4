//! GCC/Clang toolchain implementation.

use std::path::{Path, PathBuf};

use super::{CommandSpec, CompileInput, CompileMode, LinkInput, Toolchain, ToolchainFamily};

/// GCC/Clang toolchain (Unix-like systems).
#[derive(Debug, Clone)]
pub struct GccToolchain {
    /// Path to the C compiler
    pub cc: PathBuf,
    /// Compiler family (gcc or clang)
    pub family: ToolchainFamily,
}

impl GccToolchain {
    /// Create a new GCC-style toolchain.
    pub fn new(cc: PathBuf, family: ToolchainFamily) -> Self {
        GccToolchain { cc, family }
    }
}

impl Toolchain for GccToolchain {
    fn family(&self) -> ToolchainFamily {
        self.family
    }

    fn compiler_path(&self) -> &Path {
        &self.cc
    }

    fn compile_command(&self, input: &CompileInput, mode: CompileMode) -> CommandSpec {
        let mut cmd = CommandSpec::new(&self.cc);

        cmd = match mode {
            CompileMode::Preprocess => cmd.arg("-E"),
            CompileMode::Object => cmd.arg("-c"),
        };

        // Include directories
        for dir in &input.include_dirs {
            cmd = cmd.arg(format!("-I{}", dir.display()));
        }

        // Defines
        for (name, value) in &input.defines {
            match value {
                Some(v) => cmd = cmd.arg(format!("-D{}={}", name, v)),
                None => cmd = cmd.arg(format!("-D{}", name)),
            }
        }

        // Input and output
        cmd = cmd.arg(input.source.display().to_string());
        cmd = cmd.arg("-o");
        cmd = cmd.arg(input.output.display().to_string());

        cmd
    }

    fn link_command(&self, input: &LinkInput) -> CommandSpec {
        let mut cmd = CommandSpec::new(&self.cc);

        // Output
        cmd = cmd.arg("-o");
        cmd = cmd.arg(input.output.display().to_string());

        // Object files
        for obj in &input.objects {
            cmd = cmd.arg(obj.display().to_string());
        }

        // Library search paths
        for dir in &input.lib_dirs {
            cmd = cmd.arg(format!("-L{}", dir.display()));
        }

        // Libraries
        for lib in &input.libs {
            cmd = cmd.arg(format!("-l{}", lib));
        }

        cmd
    }

    fn object_extension(&self) -> &str {
        "o"
    }

    fn exe_extension(&self) -> &str {
        ""
    }
}
