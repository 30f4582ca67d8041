//! Per-tag dispatch table shared by the reader and the writer.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::{ArxmlError, Result};
use crate::model::{Element, Kind};
use crate::reader::{ElementCursor, ReadContext};
use crate::writer::WriteContext;
use crate::xml::XmlElement;

/// Builds a kind's payload from an element. Identity fields (`SHORT-NAME`,
/// `UUID`, `LONG-NAME`, `DESC`, `CATEGORY`) are already consumed.
pub type ReadFn = fn(&mut ElementCursor<'_>, &mut ReadContext<'_>) -> Result<Box<dyn Element>>;

/// Appends a kind's fields to an element that already carries its identity
pub type WriteFn = fn(&dyn Element, &mut XmlElement, &WriteContext<'_>) -> Result<()>;

/// Registration of one node kind
#[derive(Debug, Clone, Copy)]
pub struct RegistryEntry {
    pub tag: &'static str,
    pub kind: Kind,
    pub read: ReadFn,
    pub write: WriteFn,
}

/// Process-wide registry, installed at most once
static GLOBAL_REGISTRY: OnceLock<TagRegistry> = OnceLock::new();

#[derive(Debug, Default)]
pub struct TagRegistry {
    by_tag: HashMap<&'static str, RegistryEntry>,
    by_kind: HashMap<Kind, &'static str>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. A tag or kind can only be registered once.
    pub fn register(&mut self, entry: RegistryEntry) -> Result<()> {
        if self.by_tag.contains_key(entry.tag) || self.by_kind.contains_key(&entry.kind) {
            return Err(ArxmlError::DuplicateName {
                name: entry.tag.to_string(),
                container: "tag registry".to_string(),
            });
        }
        self.by_kind.insert(entry.kind, entry.tag);
        self.by_tag.insert(entry.tag, entry);
        Ok(())
    }

    pub fn entry_for_tag(&self, tag: &str) -> Option<&RegistryEntry> {
        self.by_tag.get(tag)
    }

    pub fn entry_for_kind(&self, kind: Kind) -> Option<&RegistryEntry> {
        self.by_kind.get(&kind).and_then(|tag| self.by_tag.get(tag))
    }

    /// Kind named by a `DEST` attribute. Packages are always known.
    pub fn kind_for_dest(&self, dest: &str) -> Option<Kind> {
        if dest == Kind::PACKAGE.name() {
            return Some(Kind::PACKAGE);
        }
        self.by_tag.get(dest).map(|entry| entry.kind)
    }

    /// Registered tags in sorted order
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.by_tag.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }

    /// Make this registry the process-wide one
    pub fn install(self) -> Result<&'static TagRegistry> {
        GLOBAL_REGISTRY
            .set(self)
            .map_err(|_| ArxmlError::RegistryAlreadyInstalled)?;
        GLOBAL_REGISTRY
            .get()
            .ok_or(ArxmlError::RegistryAlreadyInstalled)
    }

    /// Install the registry built by `init` unless one is installed already
    pub fn install_with(init: impl FnOnce() -> TagRegistry) -> &'static TagRegistry {
        GLOBAL_REGISTRY.get_or_init(init)
    }

    pub fn global() -> Option<&'static TagRegistry> {
        GLOBAL_REGISTRY.get()
    }
}
