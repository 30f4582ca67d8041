//! Sender-receiver port interfaces.

use super::data_types::{ApplicationPrimitiveDataType, ImplementationDataType};
use crate::error::Result;
use crate::model::{
    Element, ElementKind, Kind, Metadata, Named, ReferencePath, downcast, unique_name,
};
use crate::reader::{ElementCursor, ReadContext, read_identity};
use crate::registry::RegistryEntry;
use crate::writer::{WriteContext, write_metadata};
use crate::xml::XmlElement;

/// Kinds a data element's `TYPE-TREF` may point at
pub const DATA_ELEMENT_TYPES: [Kind; 2] =
    [ApplicationPrimitiveDataType::KIND, ImplementationDataType::KIND];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SenderReceiverInterface {
    pub is_service: Option<bool>,
    pub data_elements: Vec<VariableDataPrototype>,
}

impl ElementKind for SenderReceiverInterface {
    const KIND: Kind = Kind::new("SENDER-RECEIVER-INTERFACE");
}

impl SenderReceiverInterface {
    /// Append a data element under a name derived from `base` and return the
    /// name it received. An existing element named exactly `base` becomes
    /// `<base>_0`.
    pub fn add_data_element(&mut self, base: &str, type_ref: Option<ReferencePath>) -> String {
        let name = unique_name(&mut self.data_elements, base);
        self.data_elements.push(VariableDataPrototype {
            name: name.clone(),
            type_ref,
            ..Default::default()
        });
        name
    }

    pub fn data_element(&self, name: &str) -> Option<&VariableDataPrototype> {
        self.data_elements.iter().find(|element| element.name == name)
    }
}

/// `VARIABLE-DATA-PROTOTYPE`, owned by its interface rather than a package
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariableDataPrototype {
    pub name: String,
    pub metadata: Metadata,
    pub type_ref: Option<ReferencePath>,
}

impl Named for VariableDataPrototype {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

pub(super) fn entries() -> [RegistryEntry; 1] {
    [RegistryEntry {
        tag: "SENDER-RECEIVER-INTERFACE",
        kind: SenderReceiverInterface::KIND,
        read: read_sender_receiver_interface,
        write: write_sender_receiver_interface,
    }]
}

fn read_sender_receiver_interface(
    cursor: &mut ElementCursor<'_>,
    ctx: &mut ReadContext<'_>,
) -> Result<Box<dyn Element>> {
    let is_service = cursor.boolean("IS-SERVICE")?;
    let mut data_elements = Vec::new();
    if let Some(mut wrapper) = cursor.nested("DATA-ELEMENTS") {
        for element in wrapper.children("VARIABLE-DATA-PROTOTYPE") {
            let mut prototype = ElementCursor::new(element);
            let (name, metadata) = read_identity(&mut prototype)?;
            let type_ref = prototype.reference("TYPE-TREF", &DATA_ELEMENT_TYPES, ctx)?;
            prototype.finish(ctx);
            data_elements.push(VariableDataPrototype {
                name,
                metadata,
                type_ref,
            });
        }
        wrapper.finish(ctx);
    }
    Ok(Box::new(SenderReceiverInterface {
        is_service,
        data_elements,
    }))
}

fn write_sender_receiver_interface(
    element: &dyn Element,
    tree: &mut XmlElement,
    _ctx: &WriteContext<'_>,
) -> Result<()> {
    let interface = downcast::<SenderReceiverInterface>(element)?;
    if let Some(is_service) = interface.is_service {
        tree.push_bool("IS-SERVICE", is_service);
    }
    if !interface.data_elements.is_empty() {
        let wrapper = tree.push(XmlElement::new("DATA-ELEMENTS"));
        for prototype in &interface.data_elements {
            let child = wrapper.push(XmlElement::new("VARIABLE-DATA-PROTOTYPE"));
            write_metadata(child, &prototype.name, &prototype.metadata);
            if let Some(type_ref) = &prototype.type_ref {
                child.push_reference("TYPE-TREF", type_ref);
            }
        }
    }
    Ok(())
}
