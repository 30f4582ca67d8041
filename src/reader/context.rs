use std::collections::HashSet;

use crate::diagnostics::{Diagnostic, DiagnosticSink, SourceLocation};
use crate::error::ArxmlError;
use crate::registry::TagRegistry;
use crate::schema::{SchemaVersion, VersionedTag};
use crate::xml::XmlElement;

/// State shared by every read function during one document parse
pub struct ReadContext<'a> {
    registry: &'a TagRegistry,
    version: SchemaVersion,
    report_unprocessed: bool,
    /// Tags already reported as unprocessed
    reported: HashSet<String>,
    diagnostics: Vec<Diagnostic>,
    sink: Option<&'a mut dyn DiagnosticSink>,
}

impl<'a> ReadContext<'a> {
    pub fn new(registry: &'a TagRegistry, version: SchemaVersion) -> Self {
        Self {
            registry,
            version,
            report_unprocessed: true,
            reported: HashSet::new(),
            diagnostics: Vec::new(),
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: &'a mut dyn DiagnosticSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn report_unprocessed(mut self, enabled: bool) -> Self {
        self.report_unprocessed = enabled;
        self
    }

    pub fn registry(&self) -> &'a TagRegistry {
        self.registry
    }

    pub fn schema_version(&self) -> SchemaVersion {
        self.version
    }

    pub(crate) fn set_schema_version(&mut self, version: SchemaVersion) {
        self.version = version;
    }

    /// Field tag for the document's schema revision
    pub fn select(&self, tag: &VersionedTag) -> &'static str {
        tag.select(self.version)
    }

    /// Record an element no read function consumed, once per distinct tag
    pub fn unprocessed(&mut self, element: &XmlElement) {
        if !self.report_unprocessed || !self.reported.insert(element.tag.clone()) {
            return;
        }
        let location = SourceLocation::line(element.line);
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.unprocessed_element(&element.tag, location);
        }
        self.diagnostics
            .push(Diagnostic::unprocessed(&element.tag, location));
    }

    /// Record a recoverable error for the element starting at `element`
    pub fn error(&mut self, error: &ArxmlError, element: &XmlElement) {
        let location = SourceLocation::line(element.line);
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.error(error, &element.tag, location);
        }
        self.diagnostics
            .push(Diagnostic::from_error(error, Some(&element.tag), location));
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
