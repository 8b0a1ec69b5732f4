//! The declarative front-end of the configure pass.
//!
//! A `Definitions` is populated by sequential declarative calls (features,
//! parameters, search paths, checks), then `perform` runs the whole pass
//! and returns the finished [`Configuration`]. The "currently active
//! feature" is explicit builder state: [`Definitions::with_feature`]
//! scopes it over a closure and restores it afterwards, errors included.
//! Feature blocks do not nest.

use std::collections::BTreeMap;

use anyhow::Result;

use crate::config::artifact::{Configuration, FeatureState};
use crate::config::contributor::{Contributor, ValueKind};
use crate::config::dirs::DirSet;
use crate::config::probe::{Probe, ProbeKind};
use crate::toolchain::ToolDriver;
use crate::util::diagnostic::DeclarationError;
use crate::util::shell::Shell;

/// Declarative configuration definitions, built once and performed
/// against a fresh [`Configuration`].
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    environment: BTreeMap<String, String>,
    directories: DirSet,
    /// Declared features in declaration order.
    features: Vec<(String, FeatureState)>,
    /// Keyed argument declarations, one list per kind, declaration order.
    /// Keys are feature-scoped (`"feat/name"`) when declared in a block.
    parameters: Vec<(String, String)>,
    incdirs: Vec<(String, String)>,
    libdirs: Vec<(String, String)>,
    /// Pending probes, each tagged with the feature active at declaration.
    checks: Vec<Probe>,
    /// Explicit "current feature" context for block-scoped declarations.
    current: Option<String>,
}

impl Definitions {
    /// Create empty definitions.
    pub fn new() -> Self {
        Definitions::default()
    }

    /// Create definitions with the conventional install directories seeded.
    pub fn standard() -> Self {
        Definitions {
            directories: DirSet::standard(),
            ..Definitions::default()
        }
    }

    /// Declare an environment variable default.
    pub fn env(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.environment.insert(name.into(), value.into());
    }

    /// Declare a named, expandable directory.
    pub fn dir(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.directories.insert(name, value);
    }

    /// The directory registry.
    pub fn directories(&self) -> &DirSet {
        &self.directories
    }

    /// The declared environment defaults.
    pub fn environment(&self) -> &BTreeMap<String, String> {
        &self.environment
    }

    /// Declare a feature without deciding it (tri-state "unset").
    pub fn feature(&mut self, name: &str) -> Result<(), DeclarationError> {
        self.declare_feature(name, FeatureState::Unset)
    }

    /// Declare a feature as enabled.
    pub fn enable(&mut self, name: &str) -> Result<(), DeclarationError> {
        self.declare_feature(name, FeatureState::Enabled)
    }

    /// Declare a feature as disabled.
    pub fn disable(&mut self, name: &str) -> Result<(), DeclarationError> {
        self.declare_feature(name, FeatureState::Disabled)
    }

    /// Declare a feature and run `body` with it as the active feature.
    ///
    /// Declarations made inside the body are scoped to the feature:
    /// keyed values get `"<feature>/"`-prefixed keys, probes are tagged
    /// with the feature. The previous (absent) context is restored even
    /// when the body fails. Opening a block inside another block is a
    /// declaration error.
    pub fn with_feature<F>(&mut self, name: &str, state: FeatureState, body: F) -> Result<()>
    where
        F: FnOnce(&mut Definitions) -> Result<()>,
    {
        self.declare_feature(name, state)?;
        self.current = Some(name.to_string());
        let result = body(self);
        self.current = None;
        result
    }

    fn declare_feature(&mut self, name: &str, state: FeatureState) -> Result<(), DeclarationError> {
        if let Some(outer) = &self.current {
            return Err(DeclarationError::NestedFeature {
                outer: outer.clone(),
                inner: name.to_string(),
            });
        }
        if let Some(entry) = self.features.iter_mut().find(|(n, _)| n == name) {
            entry.1 = state;
        } else {
            self.features.push((name.to_string(), state));
        }
        Ok(())
    }

    /// Declare a user parameter. Ignored when the value, after trimming a
    /// trailing newline, is empty.
    pub fn with(&mut self, name: &str, value: &str) {
        Self::arg_def(&mut self.parameters, &self.current, name, value);
    }

    /// Declare an include search directory (expandable).
    pub fn incdir(&mut self, name: &str, dir: &str) {
        Self::arg_def(&mut self.incdirs, &self.current, name, dir);
    }

    /// Declare a library search directory (expandable).
    pub fn libdir(&mut self, name: &str, dir: &str) {
        Self::arg_def(&mut self.libdirs, &self.current, name, dir);
    }

    fn arg_def(
        list: &mut Vec<(String, String)>,
        current: &Option<String>,
        name: &str,
        value: &str,
    ) {
        let value = value.strip_suffix('\n').unwrap_or(value);
        if value.is_empty() {
            return;
        }
        let key = match current {
            Some(feature) => format!("{}/{}", feature, name),
            None => name.to_string(),
        };
        if let Some(entry) = list.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value.to_string();
        } else {
            list.push((key, value.to_string()));
        }
    }

    /// Enqueue a header presence check.
    pub fn have_header(&mut self, name: &str) {
        self.push_check(ProbeKind::Header, name);
    }

    /// Enqueue a macro definedness check (fatal when undefined).
    pub fn have_macro(&mut self, name: &str) {
        self.push_check(ProbeKind::Macro, name);
    }

    /// Enqueue a function presence check.
    pub fn have_function(&mut self, name: &str) {
        self.push_check(ProbeKind::Function, name);
    }

    /// Enqueue a library link check (fatal when missing).
    pub fn have_library(&mut self, name: &str) {
        self.push_check(ProbeKind::Library, name);
    }

    fn push_check(&mut self, kind: ProbeKind, name: &str) {
        self.checks.push(Probe::new(kind, self.current.clone(), name));
    }

    /// Run the configure pass and return the finished configuration.
    ///
    /// The pass seeds the configuration from the declared environment
    /// (process overrides honored), copies expanded directory bindings,
    /// merges features, then executes in fixed order: feature
    /// contributors, parameter contributors, incdir contributors, libdir
    /// contributors, probes — each list in declaration order. Probes run
    /// strictly sequentially; later probes observe earlier findings.
    pub fn perform(&self, driver: &dyn ToolDriver, shell: &Shell) -> Result<Configuration> {
        let mut config = Configuration::new(&self.environment);
        config.apply_env();

        for name in self.directories.names() {
            config
                .directories
                .insert(name.to_string(), self.directories.expanded(name)?);
        }

        for (name, state) in &self.features {
            config.features.insert(name.clone(), *state);
        }

        let mut contributors = Vec::new();
        for (name, _) in &self.features {
            contributors.push(Contributor::Feature {
                feature: name.clone(),
            });
        }
        for (key, value) in &self.parameters {
            contributors.push(Contributor::key_val(ValueKind::Parameter, key, value));
        }
        for (key, value) in &self.incdirs {
            contributors.push(Contributor::key_val(ValueKind::IncDir, key, value));
        }
        for (key, value) in &self.libdirs {
            contributors.push(Contributor::key_val(ValueKind::LibDir, key, value));
        }

        for contributor in &contributors {
            contributor.apply(&mut config, &self.directories)?;
        }

        tracing::debug!(checks = self.checks.len(), "running probes");
        for probe in &self.checks {
            probe.run(&mut config, driver, shell)?;
        }

        Ok(config)
    }
}
