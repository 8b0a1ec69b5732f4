//! Feature-gated contributors.
//!
//! A contributor writes one declared value into the configuration: a
//! feature macro, a user parameter, or an include/library search path.
//! Every contributor is gated on its owning feature: if that feature is
//! explicitly disabled in the configuration, applying it is a no-op.

use crate::config::artifact::{Configuration, MacroValue};
use crate::config::dirs::DirSet;
use crate::util::diagnostic::DeclarationError;

/// The kind of keyed value a [`Contributor::key_val`] declaration carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Parameter,
    IncDir,
    LibDir,
}

/// A single feature-gated mutation of the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contributor {
    /// Record a declared feature as a `FEATURE_<NAME>` macro.
    Feature { feature: String },
    /// Record a user parameter and its `WITH_<NAME>` macro.
    Parameter {
        feature: Option<String>,
        name: String,
        value: String,
    },
    /// Append an include search directory.
    IncDir {
        feature: Option<String>,
        name: String,
        value: String,
    },
    /// Append a library search directory.
    LibDir {
        feature: Option<String>,
        name: String,
        value: String,
    },
}

impl Contributor {
    /// Build a keyed contributor from a possibly feature-scoped key.
    ///
    /// A key of the form `"feat/name"` splits into the owning feature and
    /// the bare name; a plain key has no owning feature.
    pub fn key_val(kind: ValueKind, key: &str, value: &str) -> Self {
        let (feature, name) = match key.split_once('/') {
            Some((feature, name)) => (Some(feature.to_string()), name.to_string()),
            None => (None, key.to_string()),
        };
        let value = value.to_string();
        match kind {
            ValueKind::Parameter => Contributor::Parameter {
                feature,
                name,
                value,
            },
            ValueKind::IncDir => Contributor::IncDir {
                feature,
                name,
                value,
            },
            ValueKind::LibDir => Contributor::LibDir {
                feature,
                name,
                value,
            },
        }
    }

    /// The feature gating this contributor, if any.
    pub fn feature(&self) -> Option<&str> {
        match self {
            Contributor::Feature { feature } => Some(feature.as_str()),
            Contributor::Parameter { feature, .. }
            | Contributor::IncDir { feature, .. }
            | Contributor::LibDir { feature, .. } => feature.as_deref(),
        }
    }

    /// Apply this contributor to the configuration, unless its owning
    /// feature is disabled. Directory values are expanded through `dirs`.
    pub fn apply(
        &self,
        config: &mut Configuration,
        dirs: &DirSet,
    ) -> Result<(), DeclarationError> {
        if !config.feature_allows(self.feature()) {
            return Ok(());
        }

        match self {
            Contributor::Feature { feature } => {
                config.macros.insert(
                    format!("FEATURE_{}", macro_name(feature)),
                    MacroValue::Bool(true),
                );
            }
            Contributor::Parameter { name, value, .. } => {
                config.parameters.insert(name.clone(), value.clone());
                config.macros.insert(
                    format!("WITH_{}", macro_name(name)),
                    MacroValue::Str(value.clone()),
                );
            }
            Contributor::IncDir { value, .. } => {
                config.incdirs.push(dirs.expand(value)?);
            }
            Contributor::LibDir { value, .. } => {
                config.libdirs.push(dirs.expand(value)?);
            }
        }
        Ok(())
    }
}

/// Upcase a declared name into macro-name form: uppercase the text, then
/// replace every character outside `[A-Z_]` with `_`.
pub fn macro_name(name: &str) -> String {
    name.to_uppercase()
        .chars()
        .map(|c| if c.is_ascii_uppercase() || c == '_' { c } else { '_' })
        .collect()
}
