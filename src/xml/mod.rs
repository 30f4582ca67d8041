//! Owned tagged tree and its text codec (quick-xml).

mod parse;
mod render;
mod tree;

pub use parse::{parse_document, strip_namespace};
pub use render::render;
pub use tree::XmlElement;
