//! Node kinds and the payload trait every registered kind implements.

use std::any::Any;
use std::fmt;

use crate::error::{ArxmlError, Result};

/// Identifies a node kind. The wrapped string is the kind's `DEST` name,
/// which for ARXML is the same text as its element tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Kind(&'static str);

impl Kind {
    /// The built-in container kind
    pub const PACKAGE: Kind = Kind::new("AR-PACKAGE");

    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Renders a set of allowed kinds as `A | B | C`
pub fn describe_kinds(kinds: &[Kind]) -> String {
    kinds
        .iter()
        .map(Kind::name)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Kind-specific payload of an element node.
///
/// Implemented automatically for every [`ElementKind`]; the workspace stores
/// payloads as `Box<dyn Element>` so that node kinds can be added by a catalog
/// without the core knowing them.
pub trait Element: Any + fmt::Debug {
    fn kind(&self) -> Kind;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Payload equality across trait objects. Values of different concrete
    /// types are never equal.
    fn eq_element(&self, other: &dyn Element) -> bool;

    fn clone_element(&self) -> Box<dyn Element>;
}

/// Static description of a concrete node kind
pub trait ElementKind: fmt::Debug + Clone + PartialEq + 'static {
    const KIND: Kind;
}

impl<T: ElementKind> Element for T {
    fn kind(&self) -> Kind {
        T::KIND
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn eq_element(&self, other: &dyn Element) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| other == self)
    }

    fn clone_element(&self) -> Box<dyn Element> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Element> {
    fn clone(&self) -> Self {
        self.clone_element()
    }
}

/// Downcast a payload to its concrete type, failing with the payload's kind
pub fn downcast<T: Element>(element: &dyn Element) -> Result<&T> {
    element
        .as_any()
        .downcast_ref::<T>()
        .ok_or(ArxmlError::UnregisteredKind {
            kind: element.kind(),
        })
}

/// Free-form metadata carried by every named node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// `UUID` attribute
    pub uuid: Option<String>,
    /// `LONG-NAME`
    pub long_name: Option<MultiLanguageText>,
    /// `DESC`
    pub desc: Option<MultiLanguageText>,
    /// `CATEGORY`
    pub category: Option<String>,
}

impl Metadata {
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_desc(mut self, desc: MultiLanguageText) -> Self {
        self.desc = Some(desc);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Metadata::default()
    }
}

/// Text given in one or more languages (`L-2`/`L-4` entries)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiLanguageText {
    pub entries: Vec<LanguageText>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageText {
    /// Value of the `L` attribute, e.g. `EN` or `FOR-ALL`
    pub language: String,
    pub text: String,
}

impl MultiLanguageText {
    pub fn english(text: impl Into<String>) -> Self {
        Self {
            entries: vec![LanguageText {
                language: "EN".to_string(),
                text: text.into(),
            }],
        }
    }

    pub fn text(&self, language: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.language == language)
            .map(|entry| entry.text.as_str())
    }
}
