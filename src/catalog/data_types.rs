//! Base types, data types and units.

use crate::error::Result;
use crate::model::{Element, ElementKind, Kind, ReferencePath, downcast};
use crate::reader::{ElementCursor, ReadContext};
use crate::registry::RegistryEntry;
use crate::schema::VersionedTag;
use crate::writer::WriteContext;
use crate::xml::XmlElement;

/// Renamed in revision 48
pub const BASE_TYPE_SIZE: VersionedTag = VersionedTag::new("BASE-TYPE-SIZE", "SIZE", 48);

const PROPS_PATH: [&str; 3] = [
    "SW-DATA-DEF-PROPS",
    "SW-DATA-DEF-PROPS-VARIANTS",
    "SW-DATA-DEF-PROPS-CONDITIONAL",
];

/// `SW-BASE-TYPE`; its category (`FIXED_LENGTH`, ...) lives in the metadata
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SwBaseType {
    /// Size in bits
    pub size: Option<u32>,
    pub encoding: Option<String>,
    pub native_declaration: Option<String>,
}

impl ElementKind for SwBaseType {
    const KIND: Kind = Kind::new("SW-BASE-TYPE");
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImplementationDataType {
    /// `BASE-TYPE-REF` inside the conditional data-def props
    pub base_type: Option<ReferencePath>,
    pub type_emitter: Option<String>,
}

impl ElementKind for ImplementationDataType {
    const KIND: Kind = Kind::new("IMPLEMENTATION-DATA-TYPE");
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApplicationPrimitiveDataType {
    /// `UNIT-REF` inside the conditional data-def props
    pub unit: Option<ReferencePath>,
}

impl ElementKind for ApplicationPrimitiveDataType {
    const KIND: Kind = Kind::new("APPLICATION-PRIMITIVE-DATA-TYPE");
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Unit {
    pub display_name: Option<String>,
    pub factor_si_to_unit: Option<f64>,
    pub offset_si_to_unit: Option<f64>,
}

impl ElementKind for Unit {
    const KIND: Kind = Kind::new("UNIT");
}

pub(super) fn entries() -> [RegistryEntry; 4] {
    [
        RegistryEntry {
            tag: "SW-BASE-TYPE",
            kind: SwBaseType::KIND,
            read: read_sw_base_type,
            write: write_sw_base_type,
        },
        RegistryEntry {
            tag: "IMPLEMENTATION-DATA-TYPE",
            kind: ImplementationDataType::KIND,
            read: read_implementation_data_type,
            write: write_implementation_data_type,
        },
        RegistryEntry {
            tag: "APPLICATION-PRIMITIVE-DATA-TYPE",
            kind: ApplicationPrimitiveDataType::KIND,
            read: read_application_primitive_data_type,
            write: write_application_primitive_data_type,
        },
        RegistryEntry {
            tag: "UNIT",
            kind: Unit::KIND,
            read: read_unit,
            write: write_unit,
        },
    ]
}

fn read_sw_base_type(
    cursor: &mut ElementCursor<'_>,
    ctx: &mut ReadContext<'_>,
) -> Result<Box<dyn Element>> {
    Ok(Box::new(SwBaseType {
        size: cursor.number(ctx.select(&BASE_TYPE_SIZE))?,
        encoding: cursor.string("BASE-TYPE-ENCODING"),
        native_declaration: cursor.string("NATIVE-DECLARATION"),
    }))
}

fn write_sw_base_type(
    element: &dyn Element,
    tree: &mut XmlElement,
    ctx: &WriteContext<'_>,
) -> Result<()> {
    let base = downcast::<SwBaseType>(element)?;
    tree.push_optional(ctx.select(&BASE_TYPE_SIZE), base.size);
    tree.push_optional("BASE-TYPE-ENCODING", base.encoding.as_deref());
    tree.push_optional("NATIVE-DECLARATION", base.native_declaration.as_deref());
    Ok(())
}

fn read_implementation_data_type(
    cursor: &mut ElementCursor<'_>,
    ctx: &mut ReadContext<'_>,
) -> Result<Box<dyn Element>> {
    let base_type = read_conditional_props(cursor, ctx, |props, ctx| {
        props.reference("BASE-TYPE-REF", &[SwBaseType::KIND], ctx)
    })?;
    Ok(Box::new(ImplementationDataType {
        base_type: base_type.flatten(),
        type_emitter: cursor.string("TYPE-EMITTER"),
    }))
}

fn write_implementation_data_type(
    element: &dyn Element,
    tree: &mut XmlElement,
    _ctx: &WriteContext<'_>,
) -> Result<()> {
    let data_type = downcast::<ImplementationDataType>(element)?;
    if let Some(base_type) = &data_type.base_type {
        conditional_props(tree).push_reference("BASE-TYPE-REF", base_type);
    }
    tree.push_optional("TYPE-EMITTER", data_type.type_emitter.as_deref());
    Ok(())
}

fn read_application_primitive_data_type(
    cursor: &mut ElementCursor<'_>,
    ctx: &mut ReadContext<'_>,
) -> Result<Box<dyn Element>> {
    let unit = read_conditional_props(cursor, ctx, |props, ctx| {
        props.reference("UNIT-REF", &[Unit::KIND], ctx)
    })?;
    Ok(Box::new(ApplicationPrimitiveDataType {
        unit: unit.flatten(),
    }))
}

fn write_application_primitive_data_type(
    element: &dyn Element,
    tree: &mut XmlElement,
    _ctx: &WriteContext<'_>,
) -> Result<()> {
    let data_type = downcast::<ApplicationPrimitiveDataType>(element)?;
    if let Some(unit) = &data_type.unit {
        conditional_props(tree).push_reference("UNIT-REF", unit);
    }
    Ok(())
}

fn read_unit(cursor: &mut ElementCursor<'_>, _ctx: &mut ReadContext<'_>) -> Result<Box<dyn Element>> {
    Ok(Box::new(Unit {
        display_name: cursor.string("DISPLAY-NAME"),
        factor_si_to_unit: cursor.number("FACTOR-SI-TO-UNIT")?,
        offset_si_to_unit: cursor.number("OFFSET-SI-TO-UNIT")?,
    }))
}

fn write_unit(element: &dyn Element, tree: &mut XmlElement, _ctx: &WriteContext<'_>) -> Result<()> {
    let unit = downcast::<Unit>(element)?;
    tree.push_optional("DISPLAY-NAME", unit.display_name.as_deref());
    tree.push_optional("FACTOR-SI-TO-UNIT", unit.factor_si_to_unit);
    tree.push_optional("OFFSET-SI-TO-UNIT", unit.offset_si_to_unit);
    Ok(())
}

/// Descend `SW-DATA-DEF-PROPS/…/SW-DATA-DEF-PROPS-CONDITIONAL` and run
/// `read` there. Every level is finished, so unknown props are reported.
fn read_conditional_props<T>(
    cursor: &mut ElementCursor<'_>,
    ctx: &mut ReadContext<'_>,
    read: impl FnOnce(&mut ElementCursor<'_>, &mut ReadContext<'_>) -> Result<T>,
) -> Result<Option<T>> {
    let Some(mut props) = cursor.nested(PROPS_PATH[0]) else {
        return Ok(None);
    };
    let mut value = None;
    if let Some(mut variants) = props.nested(PROPS_PATH[1]) {
        if let Some(mut conditional) = variants.nested(PROPS_PATH[2]) {
            value = Some(read(&mut conditional, ctx)?);
            conditional.finish(ctx);
        }
        variants.finish(ctx);
    }
    props.finish(ctx);
    Ok(value)
}

/// Create the conditional props chain under `tree` and return its innermost
/// element
fn conditional_props(tree: &mut XmlElement) -> &mut XmlElement {
    PROPS_PATH
        .iter()
        .fold(tree, |parent, tag| parent.push(XmlElement::new(*tag)))
}
