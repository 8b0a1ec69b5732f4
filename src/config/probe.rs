//! Compiler-verdict probes.
//!
//! A probe synthesizes a minimal trial source, hands it to the toolchain,
//! and interprets the exit status as the check verdict. Probes run
//! strictly sequentially in declaration order; macro and function probes
//! replay every header the configuration has confirmed so far, so header
//! probes must be declared before the probes that rely on them.
//!
//! Header and function checks that fail merely answer "no". A required
//! macro that is undefined, or a library that does not link, aborts the
//! whole configure run.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::config::artifact::{Configuration, MacroValue};
use crate::config::contributor::macro_name;
use crate::toolchain::{CompileInput, CompileMode, LinkInput, ToolDriver};
use crate::util::diagnostic::ProbeError;
use crate::util::fs;
use crate::util::shell::Shell;

/// What a probe is checking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    Header,
    Macro,
    Function,
    Library,
}

impl ProbeKind {
    /// The human-readable kind word in the check line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeKind::Header => "header",
            ProbeKind::Macro => "macro",
            ProbeKind::Function => "function",
            ProbeKind::Library => "library",
        }
    }
}

/// A pending check, bound to the feature that was active when declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub kind: ProbeKind,
    pub feature: Option<String>,
    pub name: String,
}

impl Probe {
    /// Create a probe.
    pub fn new(kind: ProbeKind, feature: Option<String>, name: impl Into<String>) -> Self {
        Probe {
            kind,
            feature,
            name: name.into(),
        }
    }

    /// Run the probe against the configuration.
    ///
    /// No-op when the owning feature is disabled. On a "yes" verdict the
    /// probe records its findings; on "no" a macro or library probe
    /// aborts, while header and function probes simply record nothing.
    pub fn run(
        &self,
        config: &mut Configuration,
        driver: &dyn ToolDriver,
        shell: &Shell,
    ) -> Result<()> {
        if !config.feature_allows(self.feature.as_deref()) {
            return Ok(());
        }

        shell.check_start(self.kind.as_str(), &self.name);
        let verdict = self.check(config, driver);
        // The verdict line is owed even when the check errors out.
        shell.check_result(matches!(verdict, Ok(true)));
        let ok = verdict?;

        if ok {
            self.record(config);
            return Ok(());
        }

        match self.kind {
            ProbeKind::Macro => Err(ProbeError::MacroNotDefined {
                name: self.name.clone(),
            }
            .into()),
            ProbeKind::Library => Err(ProbeError::LibraryMissing {
                name: self.name.clone(),
            }
            .into()),
            ProbeKind::Header | ProbeKind::Function => Ok(()),
        }
    }

    /// Write the trial source and obtain the compiler/linker verdict.
    /// The temp file set is removed on every exit path.
    fn check(&self, config: &Configuration, driver: &dyn ToolDriver) -> Result<bool> {
        let trial = TrialFiles::new()?;
        fs::write_string(&trial.source, &self.build_source(config))?;

        let input = CompileInput {
            source: trial.source.clone(),
            output: match self.kind {
                ProbeKind::Header | ProbeKind::Macro => trial.preprocessed.clone(),
                ProbeKind::Function | ProbeKind::Library => trial.object.clone(),
            },
            include_dirs: config.incdirs.clone(),
            defines: config.defines(),
        };

        match self.kind {
            ProbeKind::Header | ProbeKind::Macro => driver.compile(&input, CompileMode::Preprocess),
            ProbeKind::Function => driver.compile(&input, CompileMode::Object),
            ProbeKind::Library => {
                if !driver.compile(&input, CompileMode::Object)? {
                    return Ok(false);
                }
                driver.link(&LinkInput {
                    objects: vec![trial.object.clone()],
                    output: trial.binary.clone(),
                    lib_dirs: config.libdirs.clone(),
                    libs: vec![self.name.clone()],
                })
            }
        }
    }

    /// Synthesize the trial source for this probe.
    fn build_source(&self, config: &Configuration) -> String {
        match self.kind {
            ProbeKind::Header => format!("#include <{}>\n", self.name),
            ProbeKind::Macro => {
                let mut src = replay_headers(config);
                let _ = write!(
                    src,
                    "#ifndef {}\n#error not defined\n#endif\n",
                    self.name
                );
                src
            }
            ProbeKind::Function => {
                // Taking the address forces the name to exist as a
                // declared symbol, not merely something invocable.
                let mut src = replay_headers(config);
                let _ = write!(
                    src,
                    "void trial(void)\n{{\n  void (*f)(void) = (void (*)(void)) {};\n  (void) f;\n}}\n",
                    self.name
                );
                src
            }
            ProbeKind::Library => "int main(int argc, char *argv[]) { return 0; }\n".to_string(),
        }
    }

    /// Record a confirmed finding into the configuration.
    fn record(&self, config: &mut Configuration) {
        match self.kind {
            ProbeKind::Header => {
                config.macros.insert(
                    format!("HAVE_HEADER_{}", macro_name(&self.name)),
                    MacroValue::Bool(true),
                );
                config.headers.push(self.name.clone());
            }
            // A defined macro needs no record: its definition came from a
            // confirmed header or an existing -D flag.
            ProbeKind::Macro => {}
            ProbeKind::Function => {
                config.macros.insert(
                    format!("HAVE_FUNC_{}", macro_name(&self.name)),
                    MacroValue::Bool(true),
                );
            }
            ProbeKind::Library => {
                config.libs.push(self.name.clone());
            }
        }
    }
}

/// `#include` lines for every header confirmed so far.
fn replay_headers(config: &Configuration) -> String {
    let mut src = String::new();
    for header in &config.headers {
        let _ = writeln!(src, "#include <{}>", header);
    }
    src
}

/// The scoped temporary file set for one probe. The backing directory is
/// removed when this is dropped, on success and failure alike.
struct TrialFiles {
    _dir: TempDir,
    source: PathBuf,
    preprocessed: PathBuf,
    object: PathBuf,
    binary: PathBuf,
}

impl TrialFiles {
    fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("slipway-trial")
            .tempdir()
            .context("failed to create trial directory")?;
        let base = dir.path();
        Ok(TrialFiles {
            source: base.join("trial.c"),
            preprocessed: base.join("trial.i"),
            object: base.join("trial.o"),
            binary: base.join("trial"),
            _dir: dir,
        })
    }
}
