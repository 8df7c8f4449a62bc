//! The fatal error type returned by parsing.

use crate::positioner::Positioner;
use sxml_error_reporting::{Diagnostic, Severity};
use sxml_source_map::Position;
use thiserror::Error;

/// A fatal parse failure.
///
/// Carries the rendered diagnostic and the positioner built up to the
/// point of failure, so callers can still resolve positions for
/// whatever was parsed before the document became unusable.
#[derive(Debug, Error)]
#[error("{diagnostic}")]
pub struct XmlError {
    pub(crate) diagnostic: Diagnostic,
    pub(crate) positioner: Positioner,
}

impl XmlError {
    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        self.diagnostic
    }

    /// Positions recorded before the failure.
    pub fn positioner(&self) -> &Positioner {
        &self.positioner
    }

    pub fn severity(&self) -> Severity {
        self.diagnostic.severity()
    }

    pub fn message(&self) -> &str {
        self.diagnostic.message()
    }

    /// Where the failure points in the source.
    pub fn position(&self) -> Position {
        self.diagnostic.position()
    }
}

pub type Result<T> = std::result::Result<T, XmlError>;
