use std::fmt;

use super::element::Kind;
use crate::error::{ArxmlError, Result};

/// Absolute, slash-delimited path to a node plus the kind it is expected to
/// point at.
///
/// Paths are never resolved eagerly; see [`Workspace::resolve`](super::Workspace::resolve).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferencePath {
    value: String,
    dest: Option<Kind>,
}

impl ReferencePath {
    /// Literal reference with a declared destination kind
    pub fn new(value: impl Into<String>, dest: Kind) -> Result<Self> {
        Self::build(value.into(), Some(dest))
    }

    /// Literal reference without a destination kind
    pub fn untyped(value: impl Into<String>) -> Result<Self> {
        Self::build(value.into(), None)
    }

    fn build(value: String, dest: Option<Kind>) -> Result<Self> {
        check_absolute(&value).map_err(|details| ArxmlError::parse("reference", details))?;
        Ok(Self { value, dest })
    }

    /// Path computed from the owner chain. `segments` are root-to-leaf and
    /// start with the empty root marker.
    pub(crate) fn computed(segments: &[&str], dest: Kind) -> Self {
        Self {
            value: segments.join("/"),
            dest: Some(dest),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn dest(&self) -> Option<Kind> {
        self.dest
    }

    /// Name segments, root to leaf, without the root marker
    pub fn segments(&self) -> impl Iterator<Item = &str> + Clone {
        self.value.split('/').skip(1)
    }

    /// Last segment, the referenced node's own name
    pub fn name(&self) -> &str {
        self.value.rsplit('/').next().unwrap_or_default()
    }

    /// Path of the owning package, `None` for a top-level package
    pub fn parent(&self) -> Option<&str> {
        match self.value.rfind('/') {
            Some(0) | None => None,
            Some(index) => Some(&self.value[..index]),
        }
    }
}

/// A reference path must start with `/` and contain no empty segment
pub(crate) fn check_absolute(value: &str) -> std::result::Result<(), String> {
    let Some(rest) = value.strip_prefix('/') else {
        return Err(format!("reference '{}' is not absolute", value));
    };
    if rest.is_empty() || rest.split('/').any(str::is_empty) {
        return Err(format!("reference '{}' contains an empty segment", value));
    }
    Ok(())
}

impl fmt::Display for ReferencePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
