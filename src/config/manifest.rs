//! Slipway.toml manifest parsing and lowering.
//!
//! The manifest is the declarative source a configure run starts from.
//! It is deserialized with serde and lowered onto the [`Definitions`]
//! builder in a documented order: top-level parameters, top-level checks,
//! then each `[[feature]]` block in manifest order. Within any check
//! group, headers run before macros, macros before functions, functions
//! before libraries, so confirmed headers are visible to the probes that
//! replay them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::artifact::FeatureState;
use crate::config::definitions::Definitions;
use crate::util::fs;

/// Default manifest file name.
pub const MANIFEST_FILE: &str = "Slipway.toml";

/// The parsed `Slipway.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Environment variable defaults; the process environment overrides.
    #[serde(default)]
    pub environment: BTreeMap<String, String>,

    /// Named directories; `${name}` references between entries allowed.
    #[serde(default)]
    pub directories: BTreeMap<String, String>,

    /// Featureless user parameters.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,

    /// Featureless checks.
    #[serde(default)]
    pub checks: CheckGroup,

    /// Feature blocks, in declaration order.
    #[serde(default, rename = "feature")]
    pub features: Vec<FeatureDecl>,

    /// Install entries, in declaration order.
    #[serde(default, rename = "install")]
    pub install: Vec<InstallDecl>,
}

/// One `[[feature]]` block.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureDecl {
    /// Feature name (macro-name source).
    pub name: String,

    /// Explicit decision; omitted means tri-state "unset".
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Parameters scoped to this feature.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,

    /// Include directories scoped to this feature (expandable values).
    #[serde(default)]
    pub incdirs: BTreeMap<String, String>,

    /// Library directories scoped to this feature (expandable values).
    #[serde(default)]
    pub libdirs: BTreeMap<String, String>,

    /// Checks scoped to this feature.
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub macros: Vec<String>,
    #[serde(default)]
    pub functions: Vec<String>,
    #[serde(default)]
    pub libraries: Vec<String>,
}

impl FeatureDecl {
    fn checks(&self) -> CheckGroup {
        CheckGroup {
            headers: self.headers.clone(),
            macros: self.macros.clone(),
            functions: self.functions.clone(),
            libraries: self.libraries.clone(),
        }
    }
}

/// The four probe lists of a check group.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckGroup {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub macros: Vec<String>,
    #[serde(default)]
    pub functions: Vec<String>,
    #[serde(default)]
    pub libraries: Vec<String>,
}

impl CheckGroup {
    fn lower(&self, defs: &mut Definitions) {
        for name in &self.headers {
            defs.have_header(name);
        }
        for name in &self.macros {
            defs.have_macro(name);
        }
        for name in &self.functions {
            defs.have_function(name);
        }
        for name in &self.libraries {
            defs.have_library(name);
        }
    }
}

/// One `[[install]]` entry: files copied into an expandable destination,
/// optionally with ownership applied.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallDecl {
    /// Paths relative to the project root.
    pub files: Vec<PathBuf>,
    /// Destination directory; may reference `${directories}`.
    pub dest: String,
    /// Numeric uid to apply.
    #[serde(default)]
    pub uid: Option<u32>,
    /// Numeric gid to apply.
    #[serde(default)]
    pub gid: Option<u32>,
    /// Octal mode string, e.g. "0644".
    #[serde(default)]
    pub mode: Option<String>,
}

impl Manifest {
    /// Load a manifest from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        toml::from_str(&text)
            .with_context(|| format!("invalid manifest: {}", path.display()))
    }

    /// Whether any install entries were declared. Install and uninstall
    /// tasks exist only when they were.
    pub fn has_installers(&self) -> bool {
        !self.install.is_empty()
    }

    /// Lower the manifest onto a [`Definitions`] builder.
    pub fn to_definitions(&self) -> Result<Definitions> {
        let mut defs = Definitions::standard();

        for (name, value) in &self.environment {
            defs.env(name, value);
        }
        for (name, value) in &self.directories {
            defs.dir(name, value);
        }
        for (name, value) in &self.parameters {
            defs.with(name, value);
        }
        self.checks.lower(&mut defs);

        for feature in &self.features {
            let state = FeatureState::from_flag(feature.enabled);
            defs.with_feature(&feature.name, state, |d| {
                for (name, value) in &feature.parameters {
                    d.with(name, value);
                }
                for (name, value) in &feature.incdirs {
                    d.incdir(name, value);
                }
                for (name, value) in &feature.libdirs {
                    d.libdir(name, value);
                }
                feature.checks().lower(d);
                Ok(())
            })?;
        }

        Ok(defs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeDriver;
    use crate::util::{ColorChoice, Shell};

    const MANIFEST: &str = r#"
[environment]
CC = "gcc"

[directories]
prefix = "/opt/app"

[parameters]
release = "1"

[checks]
headers = ["stdio.h"]
functions = ["printf"]

[[feature]]
name = "curses"
enabled = true
parameters = { keymap = "vi" }
incdirs = { main = "${includedir}/ncurses" }
headers = ["curses.h"]
libraries = ["ncursesw"]

[[feature]]
name = "legacy"
enabled = false
parameters = { compat = "on" }

[[install]]
files = ["include/app.h"]
dest = "${includedir}"
mode = "0644"
"#;

    #[test]
    fn test_parse_full_manifest() {
        let manifest: Manifest = toml::from_str(MANIFEST).unwrap();
        assert_eq!(manifest.environment["CC"], "gcc");
        assert_eq!(manifest.features.len(), 2);
        assert_eq!(manifest.features[0].name, "curses");
        assert_eq!(manifest.features[0].enabled, Some(true));
        assert_eq!(manifest.features[0].headers, vec!["curses.h"]);
        assert!(manifest.has_installers());
        assert_eq!(manifest.install[0].mode.as_deref(), Some("0644"));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let err = toml::from_str::<Manifest>("[typo]\nx = 1\n").unwrap_err();
        assert!(err.to_string().contains("typo"));
    }

    #[test]
    fn test_lowering_runs_whole_pipeline() {
        let manifest: Manifest = toml::from_str(MANIFEST).unwrap();
        let defs = manifest.to_definitions().unwrap();

        let driver = FakeDriver::accepting();
        let shell = Shell::from_flags(true, false, ColorChoice::Never);
        let config = defs.perform(&driver, &shell).unwrap();

        // prefix overridden, dependents follow
        assert_eq!(
            config.directories["includedir"],
            PathBuf::from("/opt/app/include")
        );
        // top-level and enabled-feature parameters applied; disabled not
        assert_eq!(config.parameters.get("release"), Some(&"1".to_string()));
        assert_eq!(config.parameters.get("keymap"), Some(&"vi".to_string()));
        assert!(!config.parameters.contains_key("compat"));
        // top-level checks run before feature checks
        assert_eq!(config.headers, vec!["stdio.h", "curses.h"]);
        assert_eq!(config.libs, vec!["ncursesw"]);
        assert_eq!(
            config.incdirs,
            vec![PathBuf::from("/opt/app/include/ncurses")]
        );
    }

    #[test]
    fn test_function_probe_sees_top_level_header() {
        let manifest: Manifest = toml::from_str(MANIFEST).unwrap();
        let defs = manifest.to_definitions().unwrap();

        let driver = FakeDriver::accepting();
        let shell = Shell::from_flags(true, false, ColorChoice::Never);
        defs.perform(&driver, &shell).unwrap();

        let sources = driver.compiled_sources();
        // stdio.h probe, printf probe, curses.h probe, ncursesw compile
        let printf_src = sources
            .iter()
            .find(|s| s.contains("printf"))
            .expect("printf trial compiled");
        assert!(printf_src.contains("#include <stdio.h>"));
    }
}
