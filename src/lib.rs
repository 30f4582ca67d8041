//! # arxml Library
//!
//! Reading and writing AUTOSAR ARXML models. Documents are parsed into a
//! [`Workspace`], an arena of packages and elements in which every node has
//! exactly one owner and a name unique among its siblings. Element kinds are
//! not built in: a catalog registers them in a [`TagRegistry`] together with
//! the functions that read and write their fields. [`catalog`] provides a
//! sample set of data types, units and port interfaces.
//!
//! ```no_run
//! use arxml::{Reader, Writer, catalog};
//!
//! # fn main() -> arxml::Result<()> {
//! let registry = catalog::install()?;
//! let outcome = Reader::new(registry).read_file("model.arxml".as_ref())?;
//! for diagnostic in &outcome.diagnostics {
//!     eprintln!("{}", diagnostic);
//! }
//! let text = Writer::new(registry).write_workspace(&outcome.workspace)?;
//! # let _ = text;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod check;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod file_discovery;
pub mod model;
pub mod output;
pub mod reader;
pub mod registry;
pub mod schema;
pub mod writer;
pub mod xml;

pub use check::{CheckResults, CheckStatus, FileCheckResult, check_file, check_files};
pub use cli::{Cli, OutputFormat, VerbosityLevel};
pub use config::{Config, ConfigManager};
pub use diagnostics::{
    CollectingSink, Diagnostic, DiagnosticSink, LogSink, Severity, SourceLocation,
};
pub use error::{ArxmlError, Result};
pub use file_discovery::FileDiscovery;
pub use model::{
    Element, ElementKind, Kind, Metadata, MultiLanguageText, NodeId, Owner, ReferencePath,
    Workspace,
};
pub use output::Output;
pub use reader::{ReadOutcome, Reader};
pub use registry::{RegistryEntry, TagRegistry};
pub use schema::{SchemaVersion, VersionedTag};
pub use writer::Writer;
pub use xml::XmlElement;
