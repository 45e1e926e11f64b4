//! How serious a placement diagnostic is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic, ordered from `Note` up to `Error`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// Run summaries and convergence reports.
    Note,
    /// A tuning or input problem that does not stop placement.
    Warning,
    /// A definite problem that prevents a valid placement.
    Error,
}

impl Severity {
    /// Every severity, least serious first.
    pub const ALL: [Severity; 3] = [Severity::Note, Severity::Warning, Severity::Error];

    /// Returns `true` if this severity is [`Error`](Severity::Error).
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }

    /// Whether a diagnostic of this severity is printed.
    ///
    /// Quiet output keeps errors only. Notes need verbose output.
    pub fn is_shown(self, quiet: bool, verbose: bool) -> bool {
        if quiet {
            return self.is_error();
        }
        self >= Severity::Warning || verbose
    }

    /// ANSI SGR parameters used when painting the severity label.
    pub fn ansi(self) -> &'static str {
        match self {
            Severity::Note => "1;36",
            Severity::Warning => "1;33",
            Severity::Error => "1;31",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering() {
        assert!(Severity::Note < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert_eq!(Severity::ALL.map(Severity::index), [0, 1, 2]);
    }

    #[test]
    fn quiet_and_verbose_filtering() {
        assert!(Severity::Error.is_shown(true, false));
        assert!(!Severity::Warning.is_shown(true, true));
        assert!(Severity::Warning.is_shown(false, false));
        assert!(!Severity::Note.is_shown(false, false));
        assert!(Severity::Note.is_shown(false, true));
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Severity::Error), "error");
        assert_eq!(format!("{}", Severity::Warning), "warning");
        assert_eq!(format!("{}", Severity::Note), "note");
    }
}
