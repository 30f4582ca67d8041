//! Sample node-kind catalog: data types, units and sender-receiver
//! interfaces.
//!
//! The core model knows only packages. A catalog contributes concrete kinds
//! and their read/write functions through a [`TagRegistry`].

pub mod data_types;
pub mod port_interface;

pub use data_types::{
    ApplicationPrimitiveDataType, BASE_TYPE_SIZE, ImplementationDataType, SwBaseType, Unit,
};
pub use port_interface::{DATA_ELEMENT_TYPES, SenderReceiverInterface, VariableDataPrototype};

use crate::error::Result;
use crate::registry::TagRegistry;

/// Registry holding every kind of this catalog
pub fn registry() -> Result<TagRegistry> {
    let mut registry = TagRegistry::new();
    for entry in data_types::entries()
        .into_iter()
        .chain(port_interface::entries())
    {
        registry.register(entry)?;
    }
    Ok(registry)
}

/// Install the catalog as the process-wide registry. Repeated calls return
/// the registry installed first.
pub fn install() -> Result<&'static TagRegistry> {
    let registry = registry()?;
    Ok(TagRegistry::install_with(move || registry))
}
