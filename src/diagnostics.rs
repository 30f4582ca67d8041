//! Non-fatal findings produced while reading a document.

use std::fmt;

use serde::Serialize;
use tracing::{error, warn};

use crate::error::ArxmlError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SourceLocation {
    /// 1-based line, 0 when unknown
    pub line: usize,
}

impl SourceLocation {
    pub fn line(line: usize) -> Self {
        Self { line }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Tag of the element the finding is about
    pub tag: Option<String>,
    pub location: SourceLocation,
}

impl Diagnostic {
    pub fn unprocessed(tag: &str, location: SourceLocation) -> Self {
        Self {
            severity: Severity::Warning,
            message: format!("unprocessed element <{}>", tag),
            tag: Some(tag.to_string()),
            location,
        }
    }

    pub fn from_error(error: &ArxmlError, tag: Option<&str>, location: SourceLocation) -> Self {
        Self {
            severity: Severity::Error,
            message: error.to_string(),
            tag: tag.map(str::to_string),
            location,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.line > 0 {
            write!(f, "line {}: ", self.location.line)?;
        }
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Receives findings as the reader produces them
#[cfg_attr(test, mockall::automock)]
pub trait DiagnosticSink {
    /// A child element no field access consumed. Called once per distinct tag
    /// per document.
    fn unprocessed_element(&mut self, tag: &str, location: SourceLocation);

    /// A recoverable error that caused the element or package tagged `tag`
    /// to be skipped
    fn error(&mut self, error: &ArxmlError, tag: &str, location: SourceLocation);
}

/// Keeps every finding in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }
}

impl DiagnosticSink for CollectingSink {
    fn unprocessed_element(&mut self, tag: &str, location: SourceLocation) {
        self.diagnostics.push(Diagnostic::unprocessed(tag, location));
    }

    fn error(&mut self, error: &ArxmlError, tag: &str, location: SourceLocation) {
        self.diagnostics
            .push(Diagnostic::from_error(error, Some(tag), location));
    }
}

/// Forwards findings to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn unprocessed_element(&mut self, tag: &str, location: SourceLocation) {
        warn!(tag, line = location.line, "unprocessed element");
    }

    fn error(&mut self, err: &ArxmlError, tag: &str, location: SourceLocation) {
        error!(tag, line = location.line, error = %err, "element skipped");
    }
}
