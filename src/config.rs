use crate::cli::{Cli, OutputFormat, VerbosityLevel};
use crate::schema::{AUTOSAR_NAMESPACE, SchemaVersion};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Trait for abstracting environment variable access
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// System environment variable provider for production use
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable error: {0}")]
    Environment(String),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub reader: ReaderConfig,
    pub writer: WriterConfig,
    pub workspace: WorkspaceConfig,
    pub output: OutputConfig,
    pub files: FileConfig,
}

/// Reader settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReaderConfig {
    /// Return the first package-local error instead of recording it
    pub stop_on_error: bool,
    /// Namespace stripped from every tag before dispatch
    pub namespace: String,
    /// Used when the document names no recognizable schema file
    pub default_schema_version: SchemaVersion,
    /// Report child elements that no field access consumed
    pub report_unprocessed: bool,
}

/// Writer settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WriterConfig {
    /// Schema revision written to `xsi:schemaLocation` and used for
    /// versioned tags
    pub schema_version: SchemaVersion,
    /// Spaces per nesting level, 0 for a single line
    pub indent: usize,
    pub namespace: String,
}

/// Naming configuration for application-built workspaces
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Role key to absolute package path, e.g. `BaseType = "/DataTypes/BaseTypes"`
    pub package_map: BTreeMap<String, String>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormatConfig,
    /// Verbose output
    pub verbose: bool,
    /// Quiet mode (errors only)
    pub quiet: bool,
}

/// File processing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    /// File extensions to process
    pub extensions: Vec<String>,
    /// Include patterns (glob syntax)
    pub include_patterns: Vec<String>,
    /// Exclude patterns (glob syntax)
    pub exclude_patterns: Vec<String>,
}

/// Output format configuration (serializable version of CLI OutputFormat)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormatConfig {
    Human,
    Json,
    Summary,
}

impl From<OutputFormat> for OutputFormatConfig {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => OutputFormatConfig::Human,
            OutputFormat::Json => OutputFormatConfig::Json,
            OutputFormat::Summary => OutputFormatConfig::Summary,
        }
    }
}

impl From<OutputFormatConfig> for OutputFormat {
    fn from(format: OutputFormatConfig) -> Self {
        match format {
            OutputFormatConfig::Human => OutputFormat::Human,
            OutputFormatConfig::Json => OutputFormat::Json,
            OutputFormatConfig::Summary => OutputFormat::Summary,
        }
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            stop_on_error: false,
            namespace: AUTOSAR_NAMESPACE.to_string(),
            default_schema_version: SchemaVersion::default(),
            report_unprocessed: true,
        }
    }
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            schema_version: SchemaVersion::default(),
            indent: 2,
            namespace: AUTOSAR_NAMESPACE.to_string(),
        }
    }
}

impl OutputConfig {
    pub fn verbosity(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormatConfig::Human,
            verbose: false,
            quiet: false,
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["arxml".to_string()],
            include_patterns: vec![],
            exclude_patterns: vec![],
        }
    }
}

/// Configuration manager for loading and merging configurations
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration with precedence: file -> environment -> CLI
    pub fn load_config(cli: &Cli) -> Result<Config> {
        let mut config = Config::default();

        if let Some(config_path) = &cli.config {
            config = Self::load_from_file(config_path)?;
        } else if let Some(found_config) = Self::find_config_file()? {
            config = found_config;
        }

        config = Self::apply_environment_overrides(config)?;
        config = Self::merge_with_cli(config, cli);
        Self::validate_config(&config)?;

        Ok(config)
    }

    /// Load configuration from a file (TOML or JSON)
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => {
                // Try to parse as TOML first, then JSON
                if let Ok(config) = toml::from_str::<Config>(&content) {
                    Ok(config)
                } else {
                    Ok(serde_json::from_str(&content)?)
                }
            }
        }
    }

    /// Find configuration file in standard locations
    pub fn find_config_file() -> Result<Option<Config>> {
        Self::find_config_file_in(Path::new("."))
    }

    /// Like [`ConfigManager::find_config_file`], starting from `dir` instead
    /// of the working directory
    pub fn find_config_file_in(dir: &Path) -> Result<Option<Config>> {
        let config_names = [
            "arxml.toml",
            "arxml.json",
            ".arxml.toml",
            ".arxml.json",
        ];

        for name in &config_names {
            let path = dir.join(name);
            if path.exists() {
                return Ok(Some(Self::load_from_file(&path)?));
            }
        }

        // Check user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let app_config_dir = config_dir.join("arxml");
            for name in &config_names {
                let path = app_config_dir.join(name);
                if path.exists() {
                    return Ok(Some(Self::load_from_file(&path)?));
                }
            }
        }

        Ok(None)
    }

    /// Apply environment variable overrides using the system environment
    pub fn apply_environment_overrides(config: Config) -> Result<Config> {
        Self::apply_environment_overrides_with(&SystemEnvProvider, config)
    }

    /// Apply environment variable overrides with a custom environment provider
    pub fn apply_environment_overrides_with(
        env: &impl EnvProvider,
        mut config: Config,
    ) -> Result<Config> {
        // Reader settings
        if let Some(stop) = env.get("ARXML_STOP_ON_ERROR") {
            config.reader.stop_on_error = parse_env("ARXML_STOP_ON_ERROR", &stop)?;
        }

        if let Some(namespace) = env.get("ARXML_NAMESPACE") {
            config.reader.namespace = namespace.clone();
            config.writer.namespace = namespace;
        }

        if let Some(report) = env.get("ARXML_REPORT_UNPROCESSED") {
            config.reader.report_unprocessed = parse_env("ARXML_REPORT_UNPROCESSED", &report)?;
        }

        // Writer settings
        if let Some(version) = env.get("ARXML_SCHEMA_VERSION") {
            config.writer.schema_version =
                SchemaVersion(parse_env("ARXML_SCHEMA_VERSION", &version)?);
        }

        if let Some(indent) = env.get("ARXML_INDENT") {
            config.writer.indent = parse_env("ARXML_INDENT", &indent)?;
        }

        // Output settings
        if let Some(verbose) = env.get("ARXML_VERBOSE") {
            config.output.verbose = parse_env("ARXML_VERBOSE", &verbose)?;
        }

        if let Some(quiet) = env.get("ARXML_QUIET") {
            config.output.quiet = parse_env("ARXML_QUIET", &quiet)?;
        }

        if let Some(format) = env.get("ARXML_FORMAT") {
            config.output.format = match format.to_lowercase().as_str() {
                "human" => OutputFormatConfig::Human,
                "json" => OutputFormatConfig::Json,
                "summary" => OutputFormatConfig::Summary,
                _ => {
                    return Err(ConfigError::Environment(format!(
                        "Invalid ARXML_FORMAT value: {}",
                        format
                    )));
                }
            };
        }

        // File settings
        if let Some(extensions) = env.get("ARXML_EXTENSIONS") {
            config.files.extensions = split_list(&extensions);
        }

        Ok(config)
    }

    /// Merge CLI arguments with configuration (CLI takes precedence)
    pub fn merge_with_cli(mut config: Config, cli: &Cli) -> Config {
        if cli.stop_on_error {
            config.reader.stop_on_error = true;
        }
        if cli.no_unprocessed {
            config.reader.report_unprocessed = false;
        }
        if let Some(version) = cli.schema_version {
            config.writer.schema_version = SchemaVersion(version);
        }

        if let Some(format) = &cli.output_format {
            config.output.format = format.clone().into();
        }
        if cli.verbose > 0 {
            config.output.verbose = true;
            config.output.quiet = false;
        }
        if cli.quiet {
            config.output.quiet = true;
            config.output.verbose = false;
        }

        if let Some(extensions) = &cli.extensions {
            config.files.extensions = split_list(extensions);
        }
        if !cli.include_patterns.is_empty() {
            config.files.include_patterns = cli.include_patterns.clone();
        }
        if !cli.exclude_patterns.is_empty() {
            config.files.exclude_patterns = cli.exclude_patterns.clone();
        }

        config
    }

    /// Validate configuration values
    pub fn validate_config(config: &Config) -> Result<()> {
        if config.reader.namespace.is_empty() || config.writer.namespace.is_empty() {
            return Err(ConfigError::Validation(
                "Namespace must not be empty".to_string(),
            ));
        }

        if config.writer.schema_version.0 == 0 {
            return Err(ConfigError::Validation(
                "Schema version must be greater than 0".to_string(),
            ));
        }

        if config.writer.indent > 16 {
            return Err(ConfigError::Validation(
                "Indent cannot exceed 16 spaces".to_string(),
            ));
        }

        for (role, path) in &config.workspace.package_map {
            if crate::model::ReferencePath::untyped(path.as_str()).is_err() {
                return Err(ConfigError::Validation(format!(
                    "Package path for '{}' must be absolute: {}",
                    role, path
                )));
            }
        }

        // Validate output settings
        if config.output.verbose && config.output.quiet {
            return Err(ConfigError::Validation(
                "Cannot enable both verbose and quiet modes".to_string(),
            ));
        }

        // Validate file settings
        if config.files.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "At least one file extension must be specified".to_string(),
            ));
        }

        for ext in &config.files.extensions {
            if ext.contains('/') || ext.contains('\\') || ext.contains('.') {
                return Err(ConfigError::Validation(format!(
                    "Invalid file extension: {}",
                    ext
                )));
            }
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Environment(format!("Invalid {} value: {}", key, value)))
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
