//! MSVC toolchain implementation.

use std::path::{Path, PathBuf};

use super::{CommandSpec, CompileInput, CompileMode, LinkInput, Toolchain, ToolchainFamily};

/// MSVC toolchain (Windows).
#[derive(Debug, Clone)]
pub struct MsvcToolchain {
    /// Path to cl.exe
    pub cl: PathBuf,
}

impl MsvcToolchain {
    /// Create a new MSVC toolchain.
    pub fn new(cl: PathBuf) -> Self {
        MsvcToolchain { cl }
    }
}

impl Toolchain for MsvcToolchain {
    fn family(&self) -> ToolchainFamily {
        ToolchainFamily::Msvc
    }

    fn compiler_path(&self) -> &Path {
        &self.cl
    }

    fn compile_command(&self, input: &CompileInput, mode: CompileMode) -> CommandSpec {
        let mut cmd = CommandSpec::new(&self.cl);

        cmd = cmd.arg("/nologo");

        // Include directories
        for dir in &input.include_dirs {
            cmd = cmd.arg(format!("/I{}", dir.display()));
        }

        // Defines
        for (name, value) in &input.defines {
            match value {
                Some(v) => cmd = cmd.arg(format!("/D{}={}", name, v)),
                None => cmd = cmd.arg(format!("/D{}", name)),
            }
        }

        cmd = match mode {
            // /P writes the preprocessed output to the /Fi path.
            CompileMode::Preprocess => cmd
                .arg("/P")
                .arg(format!("/Fi{}", input.output.display())),
            CompileMode::Object => cmd
                .arg("/c")
                .arg(format!("/Fo{}", input.output.display())),
        };

        cmd = cmd.arg(input.source.display().to_string());

        cmd
    }

    fn link_command(&self, input: &LinkInput) -> CommandSpec {
        let mut cmd = CommandSpec::new(&self.cl);

        cmd = cmd.arg("/nologo");
        cmd = cmd.arg(format!("/Fe{}", input.output.display()));

        for obj in &input.objects {
            cmd = cmd.arg(obj.display().to_string());
        }

        cmd = cmd.arg("/link");
        for dir in &input.lib_dirs {
            cmd = cmd.arg(format!("/LIBPATH:{}", dir.display()));
        }
        for lib in &input.libs {
            cmd = cmd.arg(format!("{}.lib", lib));
        }

        cmd
    }

    fn object_extension(&self) -> &str {
        "obj"
    }

    fn exe_extension(&self) -> &str {
        "exe"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_compile_command() {
        let input = CompileInput {
            source: PathBuf::from("trial.c"),
            output: PathBuf::from("trial.obj"),
            include_dirs: vec![],
            defines: vec![("HAVE_HEADER_STDIO_H".to_string(), None)],
        };

        let cmd = MsvcToolchain::new(PathBuf::from("cl.exe"))
            .compile_command(&input, CompileMode::Object);
        assert_eq!(
            cmd.args,
            vec![
                "/nologo",
                "/DHAVE_HEADER_STDIO_H",
                "/c",
                "/Fotrial.obj",
                "trial.c",
            ]
        );
    }

    #[test]
    fn test_link_command_uses_libpath() {
        let input = LinkInput {
            objects: vec![PathBuf::from("trial.obj")],
            output: PathBuf::from("trial.exe"),
            lib_dirs: vec![PathBuf::from("C:\\libs")],
            libs: vec!["user32".to_string()],
        };

        let cmd = MsvcToolchain::new(PathBuf::from("cl.exe")).link_command(&input);
        assert!(cmd.args.contains(&"/link".to_string()));
        assert!(cmd.args.contains(&"/LIBPATH:C:\\libs".to_string()));
        assert!(cmd.args.contains(&"user32.lib".to_string()));
    }
}
