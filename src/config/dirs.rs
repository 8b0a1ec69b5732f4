//! Named, expandable directory registry.
//!
//! Directories are declared as raw strings that may reference each other
//! with `${name}` placeholders (`bindir = "${prefix}/bin"`). Expansion is
//! lazy and by name, so declaration order between entries does not matter;
//! referencing a name that was never registered is a fatal declaration
//! error. Expanded results are always absolute paths.

use std::path::PathBuf;

use crate::util::diagnostic::DeclarationError;
use crate::util::fs::absolutize;

/// References deeper than this are assumed to be cyclic.
const MAX_EXPANSION_DEPTH: usize = 32;

/// A registry of named, `${name}`-expandable directory values.
#[derive(Debug, Clone, Default)]
pub struct DirSet {
    /// (name, raw value) pairs in declaration order; re-declaring a name
    /// overwrites its value in place.
    entries: Vec<(String, String)>,
}

impl DirSet {
    /// Create an empty registry.
    pub fn new() -> Self {
        DirSet::default()
    }

    /// Create a registry seeded with the conventional install locations.
    pub fn standard() -> Self {
        let mut dirs = DirSet::new();
        dirs.insert("prefix", "/usr/local");
        dirs.insert("bindir", "${prefix}/bin");
        dirs.insert("libdir", "${prefix}/lib");
        dirs.insert("includedir", "${prefix}/include");
        dirs
    }

    /// Register a directory, overwriting any previous value for the name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Look up the raw (unexpanded) value for a name.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Declared names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Whether any directories have been declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expand a value, substituting every `${name}` reference, and
    /// resolve the result to an absolute path.
    pub fn expand(&self, value: &str) -> Result<PathBuf, DeclarationError> {
        let expanded = self.substitute(value, 0)?;
        Ok(absolutize(&PathBuf::from(expanded)))
    }

    /// Expand the registered value for `name`.
    pub fn expanded(&self, name: &str) -> Result<PathBuf, DeclarationError> {
        let raw = self.raw(name).ok_or_else(|| DeclarationError::UnknownDirectory {
            name: name.to_string(),
            value: format!("${{{}}}", name),
        })?;
        self.expand(raw)
    }

    fn substitute(&self, value: &str, depth: usize) -> Result<String, DeclarationError> {
        if depth > MAX_EXPANSION_DEPTH {
            return Err(DeclarationError::ExpansionCycle {
                value: value.to_string(),
            });
        }

        let mut out = String::with_capacity(value.len());
        let mut rest = value;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after
                .find('}')
                .ok_or_else(|| DeclarationError::UnknownDirectory {
                    name: after.to_string(),
                    value: value.to_string(),
                })?;
            let name = &after[..end];
            let raw = self.raw(name).ok_or_else(|| DeclarationError::UnknownDirectory {
                name: name.to_string(),
                value: value.to_string(),
            })?;
            out.push_str(&self.substitute(raw, depth + 1)?);
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}
