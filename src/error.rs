use std::path::PathBuf;

use thiserror::Error;

use crate::model::Kind;

/// Main library error type that encompasses all possible failure modes
#[derive(Error, Debug)]
pub enum ArxmlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Duplicate name: '{name}' already exists in '{container}'")]
    DuplicateName { name: String, container: String },

    #[error("Parse error in <{tag}>: {details}")]
    Parse { tag: String, details: String },

    #[error("Invalid reference kind: {found} is not allowed for <{tag}> (expected {expected})")]
    InvalidReferenceKind {
        tag: String,
        found: String,
        expected: String,
    },

    #[error("Unresolved reference: {path}")]
    UnresolvedReference { path: String },

    #[error("Node already has an owner: '{name}' must be detached before it is appended")]
    AlreadyAttached { name: String },

    #[error("Package '{name}' cannot contain itself")]
    CyclicContainment { name: String },

    #[error("Not a package: '{name}'")]
    NotAPackage { name: String },

    #[error("Invalid child: {details}")]
    InvalidChild { details: String },

    #[error("Unknown node handle")]
    UnknownNode,

    #[error("No registry entry for kind {kind}")]
    UnregisteredKind { kind: Kind },

    #[error("Tag registry is already installed")]
    RegistryAlreadyInstalled,

    #[error("Failed to read document: {file} - {details}")]
    Document { file: PathBuf, details: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ArxmlError {
    /// Build a parse error for the given tag
    pub fn parse(tag: impl Into<String>, details: impl Into<String>) -> Self {
        ArxmlError::Parse {
            tag: tag.into(),
            details: details.into(),
        }
    }

    /// Errors that the reader downgrades to diagnostics at package level
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ArxmlError::DuplicateName { .. }
                | ArxmlError::Parse { .. }
                | ArxmlError::InvalidReferenceKind { .. }
        )
    }
}

impl From<quick_xml::Error> for ArxmlError {
    fn from(err: quick_xml::Error) -> Self {
        ArxmlError::Xml(err.to_string())
    }
}

impl From<crate::config::ConfigError> for ArxmlError {
    fn from(err: crate::config::ConfigError) -> Self {
        ArxmlError::Config(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ArxmlError>;
