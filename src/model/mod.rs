//! In-memory model: ownership tree, naming rules and reference paths.

pub mod element;
pub mod naming;
pub mod reference;
mod workspace;

pub use element::{
    Element, ElementKind, Kind, LanguageText, Metadata, MultiLanguageText, describe_kinds,
    downcast,
};
pub use naming::{NamePlan, Named, plan_unique_name, unique_name};
pub use reference::ReferencePath;
pub use workspace::{NodeId, Owner, Workspace};
