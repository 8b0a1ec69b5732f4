//! The configuration engine: declarative definitions, feature-gated
//! contributors, compiler-verdict probes, and the persisted artifact.

pub mod artifact;
pub mod contributor;
pub mod definitions;
pub mod dirs;
pub mod manifest;
pub mod probe;

pub use artifact::{Configuration, FeatureState, MacroValue, CONFIG_FILE};
pub use contributor::{macro_name, Contributor, ValueKind};
pub use definitions::Definitions;
pub use dirs::DirSet;
pub use manifest::{Manifest, MANIFEST_FILE};
pub use probe::{Probe, ProbeKind};
