//! Message severities and the kind tags attached to diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    /// Human-readable name used as the leading token of rendered
    /// messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Severity::Debug => "Debug info",
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
            Severity::Fatal => "Fatal error",
        }
    }

    /// ANSI color escape for this severity, if it has one.
    pub fn color_code(&self) -> Option<&'static str> {
        match self {
            Severity::Debug | Severity::Info => None,
            Severity::Warning => Some("\x1b[33m"),
            Severity::Error => Some("\x1b[31m"),
            Severity::Fatal => Some("\x1b[1;31m"),
        }
    }

    /// Wraps `text` in this severity's color escape, or returns it
    /// unchanged when the severity carries no color.
    pub fn colored(&self, text: &str) -> String {
        match self.color_code() {
            Some(code) => format!("{code}{text}\x1b[0m"),
            None => text.to_string(),
        }
    }

    /// Whether messages of this severity abort processing.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Severity::Fatal)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Well-known kind tags, shown in parentheses after the severity name.
pub mod kind {
    pub const PARSING: &str = "XML parsing";
    pub const SCHEMA_VALIDATION: &str = "Schema validation";
    pub const USER_VALIDATION: &str = "XML validation";
}
