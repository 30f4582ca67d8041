//! Error type tests

use std::path::PathBuf;

use arxml::ArxmlError;
use arxml::catalog::Unit;
use arxml::config::ConfigError;
use arxml::ElementKind;

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
    let error: ArxmlError = io_error.into();
    assert!(matches!(error, ArxmlError::Io(_)));
    assert!(error.to_string().contains("File not found"));
}

#[test]
fn test_messages_name_the_offender() {
    let duplicate = ArxmlError::DuplicateName {
        name: "Meter".to_string(),
        container: "/Units".to_string(),
    };
    assert_eq!(
        duplicate.to_string(),
        "Duplicate name: 'Meter' already exists in '/Units'"
    );

    let parse = ArxmlError::parse("BASE-TYPE-SIZE", "'wide': invalid digit found in string");
    assert!(parse.to_string().contains("<BASE-TYPE-SIZE>"));

    let kind = ArxmlError::UnregisteredKind { kind: Unit::KIND };
    assert!(kind.to_string().contains("UNIT"));

    let document = ArxmlError::Document {
        file: PathBuf::from("model.arxml"),
        details: "permission denied".to_string(),
    };
    assert!(document.to_string().contains("model.arxml"));
}

#[test]
fn test_recoverable_errors() {
    assert!(ArxmlError::parse("X", "y").is_recoverable());
    assert!(
        ArxmlError::InvalidReferenceKind {
            tag: "TYPE-TREF".to_string(),
            found: "UNIT".to_string(),
            expected: "IMPLEMENTATION-DATA-TYPE".to_string(),
        }
        .is_recoverable()
    );
    assert!(!ArxmlError::Xml("unexpected end".to_string()).is_recoverable());
    assert!(!ArxmlError::UnknownNode.is_recoverable());
}

#[test]
fn test_config_error_conversion() {
    let error: ArxmlError = ConfigError::Validation("bad indent".to_string()).into();
    assert!(matches!(error, ArxmlError::Config(ref message) if message.contains("bad indent")));
}
