use std::collections::HashMap;
use std::str::FromStr;

use super::ReadContext;
use crate::error::{ArxmlError, Result};
use crate::model::{Kind, ReferencePath, describe_kinds};
use crate::xml::XmlElement;

/// Field-level access to one element's direct children.
///
/// Children are indexed by tag on their first occurrence; later children
/// repeating a tag are outside the index and never reported. Every access
/// marks the child as consumed, and [`ElementCursor::finish`] reports the
/// indexed children that were never touched.
#[derive(Debug)]
pub struct ElementCursor<'a> {
    element: &'a XmlElement,
    index: HashMap<&'a str, usize>,
    accessed: Vec<bool>,
}

impl<'a> ElementCursor<'a> {
    pub fn new(element: &'a XmlElement) -> Self {
        let mut index = HashMap::new();
        for (position, child) in element.children.iter().enumerate() {
            index.entry(child.tag.as_str()).or_insert(position);
        }
        Self {
            element,
            index,
            accessed: vec![false; element.children.len()],
        }
    }

    pub fn element(&self) -> &'a XmlElement {
        self.element
    }

    pub fn tag(&self) -> &'a str {
        &self.element.tag
    }

    pub fn line(&self) -> usize {
        self.element.line
    }

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.element.attribute(name)
    }

    /// First child with `tag`
    pub fn child(&mut self, tag: &str) -> Option<&'a XmlElement> {
        let position = *self.index.get(tag)?;
        self.accessed[position] = true;
        self.element.children.get(position)
    }

    /// Every child with `tag`, in document order
    pub fn children(&mut self, tag: &str) -> Vec<&'a XmlElement> {
        let mut found = Vec::new();
        for (position, child) in self.element.children.iter().enumerate() {
            if child.tag == tag {
                self.accessed[position] = true;
                found.push(child);
            }
        }
        found
    }

    /// Every child regardless of tag; used for wrapper elements whose
    /// children are dispatched individually
    pub fn all_children(&mut self) -> &'a [XmlElement] {
        self.accessed.iter_mut().for_each(|flag| *flag = true);
        &self.element.children
    }

    /// Mark a child as consumed without reading it
    pub fn skip(&mut self, tag: &str) {
        self.child(tag);
    }

    /// Cursor over the first child with `tag`
    pub fn nested(&mut self, tag: &str) -> Option<ElementCursor<'a>> {
        self.child(tag).map(ElementCursor::new)
    }

    /// Trimmed text of the first child with `tag`
    pub fn text(&mut self, tag: &str) -> Option<&'a str> {
        self.child(tag).and_then(XmlElement::text)
    }

    pub fn string(&mut self, tag: &str) -> Option<String> {
        self.text(tag).map(str::to_string)
    }

    pub fn required_text(&mut self, tag: &str) -> Result<&'a str> {
        let owner = self.tag();
        self.text(tag)
            .ok_or_else(|| ArxmlError::parse(owner, format!("missing required <{}>", tag)))
    }

    /// Parsed value of a text child; `Ok(None)` when absent
    pub fn number<T>(&mut self, tag: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.text(tag)
            .map(|text| {
                text.parse::<T>()
                    .map_err(|e| ArxmlError::parse(tag, format!("'{}': {}", text, e)))
            })
            .transpose()
    }

    /// Boolean child accepting `true`/`false`/`1`/`0`
    pub fn boolean(&mut self, tag: &str) -> Result<Option<bool>> {
        self.text(tag)
            .map(|text| match text {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                other => Err(ArxmlError::parse(
                    tag,
                    format!("'{}' is not a boolean", other),
                )),
            })
            .transpose()
    }

    /// Reference child whose `DEST` must name one of `allowed`
    pub fn reference(
        &mut self,
        tag: &str,
        allowed: &[Kind],
        ctx: &ReadContext<'_>,
    ) -> Result<Option<ReferencePath>> {
        let Some(child) = self.child(tag) else {
            return Ok(None);
        };
        let value = child
            .text()
            .ok_or_else(|| ArxmlError::parse(tag, "empty reference"))?;
        let dest = child
            .attribute("DEST")
            .ok_or_else(|| ArxmlError::parse(tag, "reference without DEST attribute"))?;

        let kind = ctx
            .registry()
            .kind_for_dest(dest)
            .filter(|kind| allowed.contains(kind))
            .ok_or_else(|| ArxmlError::InvalidReferenceKind {
                tag: tag.to_string(),
                found: dest.to_string(),
                expected: describe_kinds(allowed),
            })?;

        ReferencePath::new(value, kind)
            .map(Some)
            .map_err(|_| ArxmlError::parse(tag, format!("reference '{}' is not absolute", value)))
    }

    pub fn required_reference(
        &mut self,
        tag: &str,
        allowed: &[Kind],
        ctx: &ReadContext<'_>,
    ) -> Result<ReferencePath> {
        let owner = self.tag();
        self.reference(tag, allowed, ctx)?
            .ok_or_else(|| ArxmlError::parse(owner, format!("missing required <{}>", tag)))
    }

    /// Report indexed children that were never accessed, in document order
    pub fn finish(self, ctx: &mut ReadContext<'_>) {
        let mut pending: Vec<usize> = self
            .index
            .values()
            .copied()
            .filter(|&position| !self.accessed[position])
            .collect();
        pending.sort_unstable();
        for position in pending {
            ctx.unprocessed(&self.element.children[position]);
        }
    }
}
