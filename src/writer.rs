//! [`Workspace`] → ARXML text.

use std::path::Path;

use tracing::debug;

use crate::config::WriterConfig;
use crate::error::{ArxmlError, Result};
use crate::model::{Metadata, MultiLanguageText, NodeId, Workspace};
use crate::registry::TagRegistry;
use crate::schema::{SchemaVersion, VersionedTag, XSI_NAMESPACE};
use crate::xml::{self, XmlElement};

/// State passed to every write function
pub struct WriteContext<'a> {
    registry: &'a TagRegistry,
    version: SchemaVersion,
}

impl<'a> WriteContext<'a> {
    pub fn new(registry: &'a TagRegistry, version: SchemaVersion) -> Self {
        Self { registry, version }
    }

    pub fn registry(&self) -> &'a TagRegistry {
        self.registry
    }

    pub fn schema_version(&self) -> SchemaVersion {
        self.version
    }

    /// Field tag for the target schema revision
    pub fn select(&self, tag: &VersionedTag) -> &'static str {
        tag.select(self.version)
    }
}

pub struct Writer<'r> {
    registry: &'r TagRegistry,
    config: WriterConfig,
}

impl Writer<'static> {
    /// Writer over the process-wide registry
    pub fn global() -> Result<Self> {
        TagRegistry::global()
            .map(Writer::new)
            .ok_or_else(|| ArxmlError::Config("no tag registry installed".to_string()))
    }
}

impl<'r> Writer<'r> {
    pub fn new(registry: &'r TagRegistry) -> Self {
        Self::with_config(registry, WriterConfig::default())
    }

    pub fn with_config(registry: &'r TagRegistry, config: WriterConfig) -> Self {
        Self { registry, config }
    }

    pub fn schema_version(mut self, version: SchemaVersion) -> Self {
        self.config.schema_version = version;
        self
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    fn context(&self) -> WriteContext<'r> {
        WriteContext::new(self.registry, self.config.schema_version)
    }

    /// Render the whole workspace as a document
    pub fn write_workspace(&self, workspace: &Workspace) -> Result<String> {
        let tree = self.workspace_tree(workspace)?;
        xml::render(&tree, self.config.indent)
    }

    /// Render only the given top-level packages
    pub fn write_packages(&self, workspace: &Workspace, packages: &[NodeId]) -> Result<String> {
        let tree = self.document_tree(workspace, packages)?;
        xml::render(&tree, self.config.indent)
    }

    pub fn write_file(&self, workspace: &Workspace, path: &Path) -> Result<()> {
        let text = self.write_workspace(workspace)?;
        std::fs::write(path, &text).map_err(|e| ArxmlError::Document {
            file: path.to_path_buf(),
            details: e.to_string(),
        })?;
        debug!(file = %path.display(), bytes = text.len(), "document written");
        Ok(())
    }

    pub fn workspace_tree(&self, workspace: &Workspace) -> Result<XmlElement> {
        self.document_tree(workspace, workspace.packages())
    }

    fn document_tree(&self, workspace: &Workspace, packages: &[NodeId]) -> Result<XmlElement> {
        let mut root = XmlElement::new("AUTOSAR")
            .with_attribute("xmlns", self.config.namespace.as_str())
            .with_attribute("xmlns:xsi", XSI_NAMESPACE)
            .with_attribute(
                "xsi:schemaLocation",
                self.config
                    .schema_version
                    .schema_location(&self.config.namespace),
            );

        if !packages.is_empty() {
            let wrapper = root.push(XmlElement::new("AR-PACKAGES"));
            for package in packages {
                wrapper.children.push(self.package_tree(workspace, *package)?);
            }
        }
        Ok(root)
    }

    pub fn package_tree(&self, workspace: &Workspace, package: NodeId) -> Result<XmlElement> {
        if !workspace.is_package(package) {
            return Err(ArxmlError::NotAPackage {
                name: workspace.name(package).unwrap_or_default().to_string(),
            });
        }
        let mut tree = XmlElement::new("AR-PACKAGE");
        write_identity(&mut tree, workspace, package)?;

        let elements = workspace.elements(package);
        if !elements.is_empty() {
            let wrapper = tree.push(XmlElement::new("ELEMENTS"));
            for element in elements {
                wrapper.children.push(self.element_tree(workspace, *element)?);
            }
        }

        let packages = workspace.child_packages(package);
        if !packages.is_empty() {
            let wrapper = tree.push(XmlElement::new("AR-PACKAGES"));
            for child in packages {
                wrapper.children.push(self.package_tree(workspace, *child)?);
            }
        }
        Ok(tree)
    }

    pub fn element_tree(&self, workspace: &Workspace, element: NodeId) -> Result<XmlElement> {
        let payload = workspace.element_dyn(element).ok_or_else(|| {
            ArxmlError::InvalidChild {
                details: format!(
                    "'{}' is not an element",
                    workspace.name(element).unwrap_or_default()
                ),
            }
        })?;
        let kind = payload.kind();
        let entry = self
            .registry
            .entry_for_kind(kind)
            .ok_or(ArxmlError::UnregisteredKind { kind })?;

        let mut tree = XmlElement::new(entry.tag);
        write_identity(&mut tree, workspace, element)?;
        (entry.write)(payload, &mut tree, &self.context())?;
        Ok(tree)
    }
}

fn write_identity(tree: &mut XmlElement, workspace: &Workspace, node: NodeId) -> Result<()> {
    let name = workspace.name(node).ok_or(ArxmlError::UnknownNode)?;
    let metadata = workspace.metadata(node).ok_or(ArxmlError::UnknownNode)?;
    write_metadata(tree, name, metadata);
    Ok(())
}

/// Append `SHORT-NAME` and the metadata fields in schema order
pub fn write_metadata(tree: &mut XmlElement, name: &str, metadata: &Metadata) {
    if let Some(uuid) = &metadata.uuid {
        tree.attributes.insert("UUID".to_string(), uuid.clone());
    }
    tree.push_text("SHORT-NAME", name);
    if let Some(long_name) = &metadata.long_name {
        tree.push(multi_language("LONG-NAME", "L-4", long_name));
    }
    if let Some(desc) = &metadata.desc {
        tree.push(multi_language("DESC", "L-2", desc));
    }
    tree.push_optional("CATEGORY", metadata.category.as_deref());
}

fn multi_language(tag: &str, entry_tag: &str, text: &MultiLanguageText) -> XmlElement {
    let mut element = XmlElement::new(tag);
    for entry in &text.entries {
        element.children.push(
            XmlElement::new(entry_tag)
                .with_attribute("L", entry.language.as_str())
                .with_text(entry.text.as_str()),
        );
    }
    element
}
