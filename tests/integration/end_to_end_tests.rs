//! Discovery → read → round trip over a directory of models

use arxml::{CheckStatus, FileDiscovery, Reader, Severity, Writer, check_files};

use crate::common::test_helpers::*;

fn model_tree() -> ModelDir {
    let dir = ModelDir::new();
    dir.write("model.arxml", &sample_model());
    dir.write(
        "legacy/types.arxml",
        &document_for_version(46, &package("Types", &base_type("uint8", "SIZE", 8))),
    );
    dir.write(
        "broken/duplicate.arxml",
        &document(&package(
            "Units",
            &format!("{}{}", unit("m", "m"), unit("m", "meter")),
        )),
    );
    dir.write("notes.txt", "not a model");
    dir
}

#[test]
fn test_check_directory_with_roundtrip() {
    let dir = model_tree();
    let files = FileDiscovery::new().discover_files(dir.path()).unwrap();
    assert_eq!(files.len(), 3);

    let registry = registry();
    let reader = Reader::new(&registry);
    let writer = Writer::new(&registry);
    let results = check_files(&files, &reader, Some(&writer), false);

    assert_eq!(results.total_files, 3);
    assert_eq!(results.clean_files, 2);
    assert_eq!(results.error_files, 1);
    assert_eq!(results.roundtrip_mismatches, 0);
    assert_eq!(results.total_diagnostics(Severity::Error), 1);
    assert!(results.has_failures());

    let broken = results
        .file_results
        .iter()
        .find(|r| r.path.ends_with("broken/duplicate.arxml"))
        .unwrap();
    assert_eq!(broken.status, CheckStatus::Errors { count: 1 });
    // the surviving unit still round-trips
    assert_eq!(broken.roundtrip, Some(true));
}

#[test]
fn test_legacy_document_is_rewritten_for_latest_schema() {
    let dir = model_tree();
    let registry = registry();
    let reader = Reader::new(&registry);
    let outcome = reader
        .read_file(&dir.path().join("legacy/types.arxml"))
        .unwrap();

    let text = Writer::new(&registry)
        .write_workspace(&outcome.workspace)
        .unwrap();
    assert!(text.contains("<BASE-TYPE-SIZE>8</BASE-TYPE-SIZE>"));
    assert!(text.contains("AUTOSAR_00051.xsd"));

    let reread = reader.read_str(&text).unwrap();
    assert!(reread.workspace.content_eq(&outcome.workspace));
}

#[test]
fn test_exclusions_and_fail_fast() {
    let dir = model_tree();
    let files = FileDiscovery::new()
        .with_exclude_patterns(vec!["legacy/**".to_string()])
        .discover_files(dir.path())
        .unwrap();
    assert_eq!(files.len(), 2);

    let registry = registry();
    let reader = Reader::new(&registry);
    // sorted order puts broken/ first
    let results = check_files(&files, &reader, None, true);
    assert_eq!(results.total_files, 1);
    assert_eq!(results.error_files, 1);
}
