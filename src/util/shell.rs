//! Centralized shell output for the CLI.
//!
//! All human-readable output goes through a `Shell` so commands never
//! manage colors or alignment themselves. The probe engine additionally
//! uses the `check_start`/`check_result` pair, which form the classic
//! partial status line:
//!
//! ```text
//! Checking for header stdio.h ... yes
//! ```

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only
    Quiet,
    /// Default: status messages and check lines
    #[default]
    Normal,
    /// --verbose: additionally echo compiler command lines
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use ANSI colors.
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success statuses (green)
    Configured,
    Saved,
    Installed,
    Removed,

    // In-progress statuses (cyan)
    Configuring,
    Installing,
    Removing,

    // Warning statuses (yellow)
    Skipped,
    Warning,

    // Error status (red)
    Error,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Configured => "Configured",
            Status::Saved => "Saved",
            Status::Installed => "Installed",
            Status::Removed => "Removed",
            Status::Configuring => "Configuring",
            Status::Installing => "Installing",
            Status::Removing => "Removing",
            Status::Skipped => "Skipped",
            Status::Warning => "Warning",
            Status::Error => "error",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            // Success: bold green
            Status::Configured | Status::Saved | Status::Installed | Status::Removed => {
                "\x1b[1;32m"
            }
            // In-progress: bold cyan
            Status::Configuring | Status::Installing | Status::Removing => "\x1b[1;36m",
            // Warning: bold yellow
            Status::Skipped | Status::Warning => "\x1b[1;33m",
            // Error: bold red
            Status::Error => "\x1b[1;31m",
        }
    }
}

/// Central shell for all CLI output. Status and check lines go to stderr,
/// leaving stdout free for machine-readable dumps.
#[derive(Debug)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
}

impl Shell {
    /// Create a new shell.
    pub fn new(verbosity: Verbosity, color: ColorChoice) -> Self {
        let use_color = match color {
            ColorChoice::Auto => io::stderr().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };
        Shell {
            verbosity,
            use_color,
        }
    }

    /// Create a shell from CLI flags.
    pub fn from_flags(quiet: bool, verbose: bool, color: ColorChoice) -> Self {
        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        Shell::new(verbosity, color)
    }

    /// Current verbosity.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Print an aligned, colored status line.
    pub fn status(&self, status: Status, message: impl Display) {
        if self.verbosity == Verbosity::Quiet && status != Status::Error {
            return;
        }
        let name = status.as_str();
        if self.use_color {
            eprintln!(
                "{}{:>12}\x1b[0m {}",
                status.color_code(),
                name,
                message
            );
        } else {
            eprintln!("{:>12} {}", name, message);
        }
    }

    /// Begin a probe check line, leaving the verdict open.
    pub fn check_start(&self, kind: &str, name: &str) {
        if self.verbosity == Verbosity::Quiet {
            return;
        }
        eprint!("Checking for {} {} ... ", kind, name);
        let _ = io::stderr().flush();
    }

    /// Finish a probe check line with its verdict.
    pub fn check_result(&self, ok: bool) {
        if self.verbosity == Verbosity::Quiet {
            return;
        }
        eprintln!("{}", if ok { "yes" } else { "no" });
    }

    /// Print a plain informational line.
    pub fn note(&self, message: impl Display) {
        if self.verbosity != Verbosity::Quiet {
            eprintln!("{}", message);
        }
    }

    /// Print a line only in verbose mode; used to echo compiler commands.
    pub fn verbose(&self, message: impl Display) {
        if self.verbosity == Verbosity::Verbose {
            eprintln!("{}", message);
        }
    }

    /// Print an error line.
    pub fn error(&self, message: impl Display) {
        self.status(Status::Error, message);
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::Normal, ColorChoice::Auto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_choice_from_str() {
        assert_eq!("auto".parse::<ColorChoice>().unwrap(), ColorChoice::Auto);
        assert_eq!(
            "ALWAYS".parse::<ColorChoice>().unwrap(),
            ColorChoice::Always
        );
        assert!("sometimes".parse::<ColorChoice>().is_err());
    }

    #[test]
    fn test_from_flags_precedence() {
        let shell = Shell::from_flags(true, true, ColorChoice::Never);
        assert_eq!(shell.verbosity(), Verbosity::Quiet);
        let shell = Shell::from_flags(false, true, ColorChoice::Never);
        assert_eq!(shell.verbosity(), Verbosity::Verbose);
    }
}
