use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::XmlElement;
use crate::error::{ArxmlError, Result};

fn write_error(err: impl std::fmt::Display) -> ArxmlError {
    ArxmlError::Xml(err.to_string())
}

/// Render a tree as a UTF-8 document with an XML declaration. `indent` is
/// the number of spaces per nesting level; 0 writes everything on one line.
pub fn render(root: &XmlElement, indent: usize) -> Result<String> {
    let mut writer = if indent == 0 {
        Writer::new(Vec::new())
    } else {
        Writer::new_with_indent(Vec::new(), b' ', indent)
    };

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_error)?;
    write_element(&mut writer, root)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(write_error)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.tag.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    let text = element.text.as_deref().filter(|t| !t.is_empty());
    if text.is_none() && element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(write_error);
    }

    writer.write_event(Event::Start(start)).map_err(write_error)?;
    if let Some(text) = text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(write_error)?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.tag.as_str())))
        .map_err(write_error)
}
