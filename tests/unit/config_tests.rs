//! Configuration loading as the binary performs it

use std::collections::HashMap;

use arxml::config::{ConfigManager, EnvProvider, OutputFormatConfig};
use arxml::{Cli, Reader, SchemaVersion};
use clap::Parser;

use crate::common::test_helpers::*;

struct MapEnv(HashMap<&'static str, &'static str>);

impl EnvProvider for MapEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).map(|v| v.to_string())
    }
}

const CONFIG: &str = r#"
[reader]
stop_on_error = false
report_unprocessed = false

[writer]
schema_version = 46
indent = 4

[workspace.package_map]
units = "/Units"

[output]
format = "summary"
"#;

#[test]
fn test_load_config_from_cli_path() {
    let dir = ModelDir::new();
    let config_path = dir.write("settings.toml", CONFIG);
    let model = dir.write("model.arxml", &sample_model());

    let cli = Cli::try_parse_from([
        "arxml-check",
        model.to_str().unwrap(),
        "--config",
        config_path.to_str().unwrap(),
        "--stop-on-error",
    ])
    .unwrap();
    let config = ConfigManager::load_config(&cli).unwrap();

    assert!(config.reader.stop_on_error);
    assert!(!config.reader.report_unprocessed);
    assert_eq!(config.writer.schema_version, SchemaVersion(46));
    assert_eq!(config.writer.indent, 4);
    assert_eq!(config.output.format, OutputFormatConfig::Summary);
    assert_eq!(config.files.extensions, vec!["arxml"]);
}

#[test]
fn test_config_drives_reader() {
    let dir = ModelDir::new();
    let config = ConfigManager::load_from_file(&dir.write("arxml.toml", CONFIG)).unwrap();
    let registry = registry();

    let mut outcome = Reader::with_config(&registry, config.reader.clone())
        .package_map(config.workspace.package_map.clone())
        .read_str(&sample_model())
        .unwrap();
    let units = outcome.workspace.package_for("units").unwrap();
    assert_eq!(outcome.workspace.find("/Units"), Some(units));
    assert!(outcome.workspace.find_element("units", "KmPerHour").is_some());
}

#[test]
fn test_environment_then_cli_precedence() {
    let env = MapEnv(HashMap::from([
        ("ARXML_FORMAT", "json"),
        ("ARXML_SCHEMA_VERSION", "47"),
        ("ARXML_EXTENSIONS", "arxml, xml"),
    ]));
    let config = ConfigManager::apply_environment_overrides_with(&env, Default::default()).unwrap();
    assert_eq!(config.output.format, OutputFormatConfig::Json);
    assert_eq!(config.files.extensions, vec!["arxml", "xml"]);

    let cli = Cli::try_parse_from(["arxml-check", ".", "--format", "human", "--schema-version", "49"])
        .unwrap();
    let config = ConfigManager::merge_with_cli(config, &cli);
    assert_eq!(config.output.format, OutputFormatConfig::Human);
    assert_eq!(config.writer.schema_version, SchemaVersion(49));
}

#[test]
fn test_relative_package_path_is_rejected() {
    let dir = ModelDir::new();
    let path = dir.write(
        "arxml.toml",
        "[workspace.package_map]\nunits = \"Units\"\n",
    );
    let config = ConfigManager::load_from_file(&path).unwrap();
    assert!(ConfigManager::validate_config(&config).is_err());
}
