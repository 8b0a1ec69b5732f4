//! The persisted configuration artifact.
//!
//! A `Configuration` is built once by [`Definitions::perform`] and is the
//! single source of truth for downstream compile, link, and install steps.
//! Nothing mutates it after the configure pass returns; it serializes to
//! TOML at `.slipway/config.toml` by default.
//!
//! [`Definitions::perform`]: crate::config::Definitions::perform

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::util::fs;

/// Default location of the persisted artifact, relative to the project root.
pub const CONFIG_FILE: &str = ".slipway/config.toml";

/// Tri-state value of a declared feature.
///
/// `Unset` gates like `Enabled`: only an explicit `Disabled` suppresses the
/// contributors and probes scoped to the feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureState {
    Enabled,
    Disabled,
    Unset,
}

impl FeatureState {
    /// Convert from the optional boolean used at declaration sites.
    pub fn from_flag(enabled: Option<bool>) -> Self {
        match enabled {
            Some(true) => FeatureState::Enabled,
            Some(false) => FeatureState::Disabled,
            None => FeatureState::Unset,
        }
    }
}

/// A macro value destined for a compiler `-D` flag: either a bare define
/// or a definition with a textual value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MacroValue {
    Bool(bool),
    Str(String),
}

impl MacroValue {
    /// Render as the value part of a `-D` flag; bare defines have none.
    pub fn as_define(&self) -> Option<String> {
        match self {
            MacroValue::Bool(_) => None,
            MacroValue::Str(s) => Some(s.clone()),
        }
    }
}

impl From<&str> for MacroValue {
    fn from(s: &str) -> Self {
        MacroValue::Str(s.to_string())
    }
}

/// The finished build configuration: everything the probing pass decided,
/// ready for compile/link/install steps to consume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Include search directories, in declaration order.
    #[serde(default)]
    pub incdirs: Vec<PathBuf>,

    /// Library search directories, in declaration order.
    #[serde(default)]
    pub libdirs: Vec<PathBuf>,

    /// Headers confirmed present, in confirmation order. Later macro and
    /// function probes replay this list when building their trial source.
    #[serde(default)]
    pub headers: Vec<String>,

    /// Libraries confirmed linkable, in confirmation order.
    #[serde(default)]
    pub libs: Vec<String>,

    /// Process environment variables to honor, e.g. a compiler override.
    #[serde(default)]
    pub environment: BTreeMap<String, String>,

    /// Named directories, fully expanded to absolute paths.
    #[serde(default)]
    pub directories: BTreeMap<String, PathBuf>,

    /// Declared features and their tri-state values.
    #[serde(default)]
    pub features: BTreeMap<String, FeatureState>,

    /// Macros destined for `-D` flags.
    #[serde(default)]
    pub macros: BTreeMap<String, MacroValue>,

    /// User-supplied build parameters, distinct from compiler macros.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl Configuration {
    /// Create a configuration seeded with environment defaults.
    pub fn new(environment: &BTreeMap<String, String>) -> Self {
        Configuration {
            environment: environment.clone(),
            ..Configuration::default()
        }
    }

    /// Let the process environment override the declared defaults. A
    /// variable that is set but empty does not override.
    pub fn apply_env(&mut self) {
        for (name, value) in self.environment.iter_mut() {
            if let Ok(actual) = std::env::var(name) {
                if !actual.is_empty() {
                    *value = actual;
                }
            }
        }
    }

    /// Whether a contributor or probe gated on `feature` may act.
    ///
    /// No owning feature always passes; a feature present but `Unset`
    /// counts as enabled. Only an explicit `Disabled` suppresses.
    pub fn feature_allows(&self, feature: Option<&str>) -> bool {
        match feature {
            None => true,
            Some(name) => !matches!(self.features.get(name), Some(FeatureState::Disabled)),
        }
    }

    /// Macros as `(name, optional value)` pairs for compiler `-D` flags.
    pub fn defines(&self) -> Vec<(String, Option<String>)> {
        self.macros
            .iter()
            .map(|(name, value)| (name.clone(), value.as_define()))
            .collect()
    }

    /// Serialize to TOML at `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = toml::to_string_pretty(self)
            .context("failed to serialize configuration")?;
        fs::write_string(path, &text)
    }

    /// Restore a previously saved configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        toml::from_str(&text)
            .with_context(|| format!("invalid configuration file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_feature_gating_tri_state() {
        let mut config = Configuration::default();
        config.features.insert("a".into(), FeatureState::Enabled);
        config.features.insert("b".into(), FeatureState::Disabled);
        config.features.insert("c".into(), FeatureState::Unset);

        assert!(config.feature_allows(None));
        assert!(config.feature_allows(Some("a")));
        assert!(!config.feature_allows(Some("b")));
        assert!(config.feature_allows(Some("c")));
        // A feature never declared does not suppress.
        assert!(config.feature_allows(Some("ghost")));
    }

    #[test]
    fn test_defines_rendering() {
        let mut config = Configuration::default();
        config
            .macros
            .insert("FEATURE_CURSES".into(), MacroValue::Bool(true));
        config
            .macros
            .insert("WITH_KEYMAP".into(), MacroValue::from("vi"));

        let defines = config.defines();
        assert!(defines.contains(&("FEATURE_CURSES".to_string(), None)));
        assert!(defines.contains(&("WITH_KEYMAP".to_string(), Some("vi".to_string()))));
    }

    #[test]
    fn test_save_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);

        let mut config = Configuration::default();
        config.environment.insert("CC".into(), "gcc".into());
        config
            .directories
            .insert("prefix".into(), PathBuf::from("/usr/local"));
        config.features.insert("curses".into(), FeatureState::Unset);
        config
            .macros
            .insert("HAVE_FUNC_PRINTF".into(), MacroValue::Bool(true));
        config.parameters.insert("keymap".into(), "vi".into());
        config.incdirs.push(PathBuf::from("/usr/include/ncurses"));
        config.headers.push("stdio.h".into());
        config.libs.push("ncursesw".into());

        config.save(&path).unwrap();
        let restored = Configuration::load(&path).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn test_apply_env_override() {
        let mut env = BTreeMap::new();
        // PATH is always present in the test environment.
        env.insert("PATH".to_string(), "default-value".to_string());
        env.insert(
            "SLIPWAY_TEST_UNSET_VARIABLE".to_string(),
            "kept".to_string(),
        );

        let mut config = Configuration::new(&env);
        config.apply_env();

        assert_ne!(config.environment["PATH"], "default-value");
        assert_eq!(config.environment["SLIPWAY_TEST_UNSET_VARIABLE"], "kept");
    }
}
