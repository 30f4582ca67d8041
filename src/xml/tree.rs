use std::fmt::Display;

use indexmap::IndexMap;

use crate::model::ReferencePath;

/// Owned element of a parsed or generated document.
///
/// Tags of namespaced elements are held in `{namespace}local` form until
/// [`strip_namespace`](super::strip_namespace) removes the configured one.
#[derive(Debug, Clone, Default)]
pub struct XmlElement {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
    pub text: Option<String>,
    pub children: Vec<XmlElement>,
    /// 1-based source line, 0 for generated elements
    pub line: usize,
}

impl PartialEq for XmlElement {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
            && self.attributes == other.attributes
            && self.text == other.text
            && self.children == other.children
    }
}

impl XmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Trimmed text content, `None` when absent or blank
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// First direct child with the given tag
    pub fn child(&self, tag: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Append a child and return it for further building
    pub fn push(&mut self, child: XmlElement) -> &mut XmlElement {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn push_text(&mut self, tag: &str, text: impl Display) {
        self.children.push(XmlElement::new(tag).with_text(text.to_string()));
    }

    /// Append a text child only when the value is present
    pub fn push_optional<T: Display>(&mut self, tag: &str, value: Option<T>) {
        if let Some(value) = value {
            self.push_text(tag, value);
        }
    }

    pub fn push_bool(&mut self, tag: &str, value: bool) {
        self.push_text(tag, if value { "true" } else { "false" });
    }

    /// Append a reference child carrying a `DEST` attribute when typed
    pub fn push_reference(&mut self, tag: &str, reference: &ReferencePath) {
        let mut child = XmlElement::new(tag).with_text(reference.as_str());
        if let Some(dest) = reference.dest() {
            child.attributes.insert("DEST".to_string(), dest.to_string());
        }
        self.children.push(child);
    }

    /// Namespace and local part of a `{namespace}local` tag
    pub fn split_tag(&self) -> (Option<&str>, &str) {
        if let Some(rest) = self.tag.strip_prefix('{')
            && let Some((namespace, local)) = rest.split_once('}')
        {
            return (Some(namespace), local);
        }
        (None, &self.tag)
    }
}
