//! Reading documents through the sample catalog

use arxml::catalog::{
    ApplicationPrimitiveDataType, ImplementationDataType, SenderReceiverInterface, SwBaseType, Unit,
};
use arxml::{ArxmlError, CollectingSink, Reader, SchemaVersion, Severity};
use mockall::predicate::{always, eq, function};

use crate::common::mocks::MockSink;
use crate::common::test_helpers::*;

#[test]
fn test_sample_model_reads_cleanly() {
    let registry = registry();
    let outcome = Reader::new(&registry).read_str(&sample_model()).unwrap();

    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
    let workspace = &outcome.workspace;
    assert_eq!(workspace.packages().len(), 3);

    let u8_type = workspace.find("/Types/u8").unwrap();
    let base = workspace
        .element::<ImplementationDataType>(u8_type)
        .and_then(|t| t.base_type.as_ref())
        .unwrap();
    let uint8 = workspace.resolve(base).unwrap();
    assert_eq!(workspace.element::<SwBaseType>(uint8).unwrap().size, Some(8));

    let interface = workspace.find("/Interfaces/Vehicle").unwrap();
    let interface = workspace.element::<SenderReceiverInterface>(interface).unwrap();
    // TYPE-TREF accepts both data type kinds
    let speed = interface.data_element("Speed").unwrap();
    let speed_type = workspace.resolve(speed.type_ref.as_ref().unwrap()).unwrap();
    assert!(workspace
        .element::<ApplicationPrimitiveDataType>(speed_type)
        .is_some());
    let gear = interface.data_element("Gear").unwrap();
    assert_eq!(workspace.resolve(gear.type_ref.as_ref().unwrap()).unwrap(), u8_type);
}

#[test]
fn test_unknown_element_is_one_warning() {
    let registry = registry();
    let text = document(&package(
        "Units",
        &format!(
            "{}<SYSTEM><SHORT-NAME>S</SHORT-NAME></SYSTEM>{}",
            unit("Meter", "m"),
            unit("Second", "s")
        ),
    ));

    let mut sink = MockSink::new();
    sink.expect_unprocessed_element()
        .with(eq("SYSTEM"), always())
        .times(1)
        .return_const(());
    sink.expect_error().never();

    let outcome = Reader::new(&registry).read_str_with_sink(&text, &mut sink).unwrap();
    assert_eq!(outcome.warnings().count(), 1);
    assert_eq!(outcome.diagnostics[0].severity, Severity::Warning);
    let units = outcome.workspace.find("/Units").unwrap();
    assert_eq!(outcome.workspace.elements(units).len(), 2);
}

#[test]
fn test_unknown_fields_are_reported() {
    let registry = registry();
    let text = document(&package(
        "Units",
        "<UNIT><SHORT-NAME>m</SHORT-NAME><ADMIN-DATA/><DISPLAY-NAME>m</DISPLAY-NAME></UNIT>",
    ));
    let outcome = Reader::new(&registry).read_str(&text).unwrap();
    let tags: Vec<_> = outcome.warnings().filter_map(|d| d.tag.as_deref()).collect();
    assert_eq!(tags, vec!["ADMIN-DATA"]);
    assert!(outcome.workspace.find("/Units/m").is_some());
}

#[test]
fn test_repeated_fields_are_silently_ignored() {
    let registry = registry();
    let text = document(&package(
        "Units",
        "<UNIT><SHORT-NAME>m</SHORT-NAME><DISPLAY-NAME>m</DISPLAY-NAME><DISPLAY-NAME>meter</DISPLAY-NAME></UNIT>",
    ));
    let outcome = Reader::new(&registry).read_str(&text).unwrap();
    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);

    let workspace = &outcome.workspace;
    let unit = workspace.find("/Units/m").unwrap();
    let unit = workspace.element::<Unit>(unit).unwrap();
    assert_eq!(unit.display_name.as_deref(), Some("m"));
}

#[test]
fn test_partial_failure_with_sink() {
    let registry = registry();
    let text = document(&package(
        "Types",
        &[
            base_type("a", "BASE-TYPE-SIZE", 8),
            base_type("b", "BASE-TYPE-SIZE", 16),
            "<SW-BASE-TYPE><SHORT-NAME>c</SHORT-NAME><BASE-TYPE-SIZE>wide</BASE-TYPE-SIZE></SW-BASE-TYPE>".to_string(),
            base_type("a", "BASE-TYPE-SIZE", 32),
            base_type("e", "BASE-TYPE-SIZE", 64),
        ]
        .concat(),
    ));

    let mut sink = MockSink::new();
    sink.expect_error()
        .with(
            function(|e: &arxml::ArxmlError| matches!(e, ArxmlError::Parse { .. })),
            eq("SW-BASE-TYPE"),
            always(),
        )
        .times(1)
        .return_const(());
    sink.expect_error()
        .with(
            function(|e: &arxml::ArxmlError| matches!(e, ArxmlError::DuplicateName { .. })),
            eq("SW-BASE-TYPE"),
            always(),
        )
        .times(1)
        .return_const(());

    let outcome = Reader::new(&registry).read_str_with_sink(&text, &mut sink).unwrap();
    let types = outcome.workspace.find("/Types").unwrap();
    assert_eq!(outcome.workspace.elements(types).len(), 3);
    assert_eq!(outcome.errors().count(), 2);

    // the first "a" wins
    let a = outcome.workspace.find("/Types/a").unwrap();
    assert_eq!(outcome.workspace.element::<SwBaseType>(a).unwrap().size, Some(8));
}

#[test]
fn test_stop_on_error_aborts() {
    let registry = registry();
    let text = document(&package(
        "Types",
        &[base_type("a", "BASE-TYPE-SIZE", 8), base_type("a", "BASE-TYPE-SIZE", 8)].concat(),
    ));
    assert!(matches!(
        Reader::new(&registry).stop_on_error(true).read_str(&text),
        Err(ArxmlError::DuplicateName { .. })
    ));
}

#[test]
fn test_legacy_size_tag_by_schema_version() {
    let registry = registry();
    let legacy = document_for_version(46, &package("Types", &base_type("a", "SIZE", 8)));
    let outcome = Reader::new(&registry).read_str(&legacy).unwrap();
    assert_eq!(outcome.schema_version, SchemaVersion(46));
    let a = outcome.workspace.find("/Types/a").unwrap();
    assert_eq!(outcome.workspace.element::<SwBaseType>(a).unwrap().size, Some(8));

    // in a current document the legacy tag is not a known field
    let current = document(&package("Types", &base_type("a", "SIZE", 8)));
    let outcome = Reader::new(&registry).read_str(&current).unwrap();
    let a = outcome.workspace.find("/Types/a").unwrap();
    assert_eq!(outcome.workspace.element::<SwBaseType>(a).unwrap().size, None);
    assert_eq!(outcome.warnings().count(), 1);
}

#[test]
fn test_reference_kind_is_validated() {
    let registry = registry();
    let text = sample_model().replace(
        r#"<UNIT-REF DEST="UNIT">"#,
        r#"<UNIT-REF DEST="SW-BASE-TYPE">"#,
    );

    let mut sink = CollectingSink::new();
    let outcome = Reader::new(&registry).read_str_with_sink(&text, &mut sink).unwrap();
    assert_eq!(sink.errors().count(), 1);
    assert!(sink.diagnostics[0].message.contains("SW-BASE-TYPE"));
    assert_eq!(
        sink.diagnostics[0].tag.as_deref(),
        Some("APPLICATION-PRIMITIVE-DATA-TYPE")
    );
    assert!(outcome.workspace.find("/Types/Speed").is_none());
    assert!(outcome.workspace.find("/Types/u8").is_some());
}

#[test]
fn test_unknown_dest_is_rejected() {
    let registry = registry();
    let text = sample_model().replace(
        r#"<TYPE-TREF DEST="IMPLEMENTATION-DATA-TYPE">"#,
        r#"<TYPE-TREF DEST="NO-SUCH-KIND">"#,
    );
    let outcome = Reader::new(&registry).read_str(&text).unwrap();
    assert_eq!(outcome.errors().count(), 1);
    assert!(outcome.workspace.find("/Interfaces/Vehicle").is_none());
}

#[test]
fn test_malformed_document_is_fatal() {
    let registry = registry();
    assert!(matches!(
        Reader::new(&registry).read_str("<AUTOSAR><AR-PACKAGES></AUTOSAR>"),
        Err(ArxmlError::Xml(_))
    ));
}
