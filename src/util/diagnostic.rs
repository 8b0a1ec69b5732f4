//! Typed errors for the configuration pass.
//!
//! Two failure families exist: declaration errors raised while a manifest
//! is being lowered onto the builder, and hard probe failures raised while
//! checks are running. Both abort the whole configure run; soft probe
//! failures ("no" answers) never surface here.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

/// Errors in the declarative front-end, before any compiler runs.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum DeclarationError {
    /// A feature block was opened while another one was still active.
    #[error("features may not be nested: `{inner}` declared inside `{outer}`")]
    #[diagnostic(
        code(slipway::declare::nested_feature),
        help("close the `{outer}` feature block before declaring `{inner}`")
    )]
    NestedFeature { outer: String, inner: String },

    /// A `${name}` reference named a directory that was never registered.
    #[error("unknown directory `{name}` referenced in `{value}`")]
    #[diagnostic(
        code(slipway::declare::unknown_directory),
        help("register the directory under [directories] before referencing it")
    )]
    UnknownDirectory { name: String, value: String },

    /// Expansion recursed past the depth limit, almost certainly a cycle.
    #[error("directory expansion of `{value}` does not terminate")]
    #[diagnostic(code(slipway::declare::expansion_cycle))]
    ExpansionCycle { value: String },
}

/// Hard probe failures. A failed header or function check is merely a
/// "no"; these two abort the configure run.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ProbeError {
    #[error("macro not defined: {name}")]
    #[diagnostic(
        code(slipway::probe::macro_not_defined),
        help("the macro `{name}` must be defined by a confirmed header or a -D flag")
    )]
    MacroNotDefined { name: String },

    #[error("library missing: {name}")]
    #[diagnostic(
        code(slipway::probe::library_missing),
        help("install lib{name} or add its location with a libdir declaration")
    )]
    LibraryMissing { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_failing_item() {
        let e = ProbeError::LibraryMissing {
            name: "ncursesw".into(),
        };
        assert_eq!(e.to_string(), "library missing: ncursesw");

        let e = DeclarationError::NestedFeature {
            outer: "curses".into(),
            inner: "wide".into(),
        };
        assert!(e.to_string().contains("`wide` declared inside `curses`"));
    }
}
