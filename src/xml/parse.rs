use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;

use super::XmlElement;
use crate::error::{ArxmlError, Result};

/// Maps byte offsets to 1-based line numbers
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(index, _)| index + 1))
            .collect();
        Self { starts }
    }

    fn line(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(index) => index + 1,
            Err(index) => index,
        }
    }
}

fn xml_error(err: impl std::fmt::Display, line: usize) -> ArxmlError {
    ArxmlError::Xml(format!("line {}: {}", line, err))
}

/// Parse a complete document into its root element.
///
/// Namespaced element tags are stored as `{namespace}local`; attribute keys
/// keep their qualified names. Comments, processing instructions and the
/// declaration are dropped.
pub fn parse_document(text: &str) -> Result<XmlElement> {
    let lines = LineIndex::new(text);
    let mut reader = NsReader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root = None;

    loop {
        let markup = next_markup(text, reader.buffer_position() as usize);
        let read = reader
            .read_resolved_event_into(&mut buf)
            .map(|(resolved, event)| (bound_namespace(&resolved), event));
        let line = lines.line(reader.buffer_position() as usize);
        let (namespace, event) = read.map_err(|e| xml_error(e, line))?;

        match event {
            Event::Start(start) => {
                let opened = lines.line(markup);
                stack.push(open_element(namespace.as_deref(), &start, opened)?);
            }
            Event::Empty(start) => {
                let opened = lines.line(markup);
                let element = open_element(namespace.as_deref(), &start, opened)?;
                close_element(element, &mut stack, &mut root, line)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| xml_error("unexpected closing tag", line))?;
                close_element(element, &mut stack, &mut root, line)?;
            }
            Event::Text(content) => {
                let content = content.unescape().map_err(|e| xml_error(e, line))?;
                append_text(&mut stack, &content);
            }
            Event::CData(content) => {
                let content = String::from_utf8_lossy(&content.into_inner()).into_owned();
                append_text(&mut stack, &content);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(ArxmlError::Xml("unexpected end of document".to_string()));
    }
    root.ok_or_else(|| ArxmlError::Xml("document has no root element".to_string()))
}

/// Offset of the first `<` at or after `offset`
fn next_markup(text: &str, offset: usize) -> usize {
    text.get(offset..)
        .and_then(|rest| rest.find('<'))
        .map_or(offset, |distance| offset + distance)
}

fn bound_namespace(resolved: &ResolveResult<'_>) -> Option<String> {
    match resolved {
        ResolveResult::Bound(namespace) => {
            Some(String::from_utf8_lossy(namespace.as_ref()).into_owned())
        }
        _ => None,
    }
}

fn open_element(
    namespace: Option<&str>,
    start: &BytesStart<'_>,
    line: usize,
) -> Result<XmlElement> {
    let local = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let tag = match namespace {
        Some(namespace) => format!("{{{}}}{}", namespace, local),
        None => local,
    };

    let mut element = XmlElement::new(tag);
    element.line = line;
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| xml_error(e, line))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| xml_error(e, line))?
            .into_owned();
        element.attributes.insert(key, value);
    }
    Ok(element)
}

fn close_element(
    element: XmlElement,
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    line: usize,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(xml_error("multiple root elements", line)),
    }
    Ok(())
}

fn append_text(stack: &mut [XmlElement], content: &str) {
    if let Some(current) = stack.last_mut() {
        current.text.get_or_insert_with(String::new).push_str(content);
    }
}

/// Remove `namespace` from every tag in the tree, in place
pub fn strip_namespace(root: &mut XmlElement, namespace: &str) {
    let prefix = format!("{{{}}}", namespace);
    let mut pending = vec![root];
    while let Some(element) = pending.pop() {
        if let Some(local) = element.tag.strip_prefix(&prefix) {
            element.tag = local.to_string();
        }
        pending.extend(element.children.iter_mut());
    }
}
