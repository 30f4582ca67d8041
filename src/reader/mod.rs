//! ARXML text → [`Workspace`].
//!
//! Reading is tolerant: an element or package that fails to read is recorded
//! as a diagnostic and skipped, unless the reader is configured to stop on
//! the first error.

mod context;
mod cursor;

pub use context::ReadContext;
pub use cursor::ElementCursor;

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::config::ReaderConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{ArxmlError, Result};
use crate::model::{LanguageText, Metadata, MultiLanguageText, NodeId, Workspace};
use crate::registry::TagRegistry;
use crate::schema::SchemaVersion;
use crate::xml::{self, XmlElement};

/// Result of reading one document
#[derive(Debug)]
pub struct ReadOutcome {
    pub workspace: Workspace,
    pub diagnostics: Vec<Diagnostic>,
    /// Revision named by the document, or the configured default
    pub schema_version: SchemaVersion,
}

impl ReadOutcome {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }
}

pub struct Reader<'r> {
    registry: &'r TagRegistry,
    config: ReaderConfig,
    /// Handed to every workspace this reader builds
    package_map: BTreeMap<String, String>,
}

impl Reader<'static> {
    /// Reader over the process-wide registry
    pub fn global() -> Result<Self> {
        TagRegistry::global()
            .map(Reader::new)
            .ok_or_else(|| ArxmlError::Config("no tag registry installed".to_string()))
    }
}

impl<'r> Reader<'r> {
    pub fn new(registry: &'r TagRegistry) -> Self {
        Self::with_config(registry, ReaderConfig::default())
    }

    pub fn with_config(registry: &'r TagRegistry, config: ReaderConfig) -> Self {
        Self {
            registry,
            config,
            package_map: BTreeMap::new(),
        }
    }

    /// Role → package path map for the workspaces produced by this reader
    pub fn package_map(mut self, package_map: BTreeMap<String, String>) -> Self {
        self.package_map = package_map;
        self
    }

    pub fn stop_on_error(mut self, stop: bool) -> Self {
        self.config.stop_on_error = stop;
        self
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn read_str(&self, text: &str) -> Result<ReadOutcome> {
        self.read_with(text, self.context())
    }

    /// Read a document, forwarding every finding to `sink` as it happens
    pub fn read_str_with_sink(
        &self,
        text: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<ReadOutcome> {
        self.read_with(text, self.context().with_sink(sink))
    }

    pub fn read_file(&self, path: &Path) -> Result<ReadOutcome> {
        let text = std::fs::read_to_string(path).map_err(|e| ArxmlError::Document {
            file: path.to_path_buf(),
            details: e.to_string(),
        })?;
        debug!(file = %path.display(), bytes = text.len(), "reading document");
        self.read_str(&text)
    }

    fn context<'c>(&self) -> ReadContext<'c>
    where
        'r: 'c,
    {
        ReadContext::new(self.registry, self.config.default_schema_version)
            .report_unprocessed(self.config.report_unprocessed)
    }

    fn read_with(&self, text: &str, mut ctx: ReadContext<'_>) -> Result<ReadOutcome> {
        let mut root = xml::parse_document(text)?;
        xml::strip_namespace(&mut root, &self.config.namespace);
        if root.tag != "AUTOSAR" {
            return Err(ArxmlError::parse(
                root.tag.as_str(),
                "document root must be <AUTOSAR>",
            ));
        }

        if let Some(version) = root
            .attributes
            .iter()
            .find(|(key, _)| key.rsplit(':').next() == Some("schemaLocation"))
            .and_then(|(_, location)| SchemaVersion::from_schema_location(location))
        {
            ctx.set_schema_version(version);
        }
        let schema_version = ctx.schema_version();
        debug!(%schema_version, "document schema revision");

        let mut workspace = Workspace::with_package_map(self.package_map.clone());
        let mut cursor = ElementCursor::new(&root);
        if let Some(mut packages) = cursor.nested("AR-PACKAGES") {
            for package in packages.children("AR-PACKAGE") {
                self.isolate(&mut ctx, package, |ctx| {
                    read_package(&mut workspace, None, package, ctx, self)
                })?;
            }
            packages.finish(&mut ctx);
        }
        cursor.finish(&mut ctx);

        let diagnostics = ctx.into_diagnostics();
        debug!(
            packages = workspace.packages().len(),
            nodes = workspace.len(),
            diagnostics = diagnostics.len(),
            "document read"
        );
        Ok(ReadOutcome {
            workspace,
            diagnostics,
            schema_version,
        })
    }

    /// Run one package-local read; recoverable errors become diagnostics
    /// unless stop-on-error is set
    fn isolate(
        &self,
        ctx: &mut ReadContext<'_>,
        element: &XmlElement,
        read: impl FnOnce(&mut ReadContext<'_>) -> Result<()>,
    ) -> Result<()> {
        match read(ctx) {
            Err(err) if err.is_recoverable() && !self.config.stop_on_error => {
                ctx.error(&err, element);
                Ok(())
            }
            other => other,
        }
    }
}

fn read_package(
    workspace: &mut Workspace,
    parent: Option<NodeId>,
    element: &XmlElement,
    ctx: &mut ReadContext<'_>,
    reader: &Reader<'_>,
) -> Result<()> {
    let mut cursor = ElementCursor::new(element);
    let (name, metadata) = read_identity(&mut cursor)?;
    let package = workspace.add_package(parent, name, metadata)?;

    if let Some(mut elements) = cursor.nested("ELEMENTS") {
        for child in elements.all_children() {
            reader.isolate(ctx, child, |ctx| read_element(workspace, package, child, ctx))?;
        }
    }

    if let Some(mut packages) = cursor.nested("AR-PACKAGES") {
        for child in packages.children("AR-PACKAGE") {
            reader.isolate(ctx, child, |ctx| {
                read_package(workspace, Some(package), child, ctx, reader)
            })?;
        }
        packages.finish(ctx);
    }

    cursor.finish(ctx);
    Ok(())
}

fn read_element(
    workspace: &mut Workspace,
    package: NodeId,
    element: &XmlElement,
    ctx: &mut ReadContext<'_>,
) -> Result<()> {
    let Some(entry) = ctx.registry().entry_for_tag(&element.tag) else {
        ctx.unprocessed(element);
        return Ok(());
    };

    let mut cursor = ElementCursor::new(element);
    let (name, metadata) = read_identity(&mut cursor)?;
    let payload = (entry.read)(&mut cursor, ctx)?;
    cursor.finish(ctx);
    workspace.add_element(package, name, metadata, payload)?;
    Ok(())
}

/// Read the fields every named node carries
pub fn read_identity(cursor: &mut ElementCursor<'_>) -> Result<(String, Metadata)> {
    let name = cursor.required_text("SHORT-NAME")?;
    if name.contains('/') {
        return Err(ArxmlError::parse(
            "SHORT-NAME",
            format!("'{}' must not contain '/'", name),
        ));
    }

    let metadata = Metadata {
        uuid: cursor.attribute("UUID").map(str::to_string),
        long_name: cursor
            .child("LONG-NAME")
            .map(|element| read_multi_language(element, "L-4")),
        desc: cursor
            .child("DESC")
            .map(|element| read_multi_language(element, "L-2")),
        category: cursor.string("CATEGORY"),
    };
    Ok((name.to_string(), metadata))
}

fn read_multi_language(element: &XmlElement, entry_tag: &str) -> MultiLanguageText {
    let entries = element
        .children
        .iter()
        .filter(|child| child.tag == entry_tag)
        .map(|child| LanguageText {
            language: child.attribute("L").unwrap_or("FOR-ALL").to_string(),
            text: child.text().unwrap_or_default().to_string(),
        })
        .collect();
    MultiLanguageText { entries }
}
