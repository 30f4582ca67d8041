use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Default ARXML namespace
pub const AUTOSAR_NAMESPACE: &str = "http://autosar.org/schema/r4.0";

/// XML Schema instance namespace
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Cached regex for the schema file named in xsi:schemaLocation
static SCHEMA_FILE_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_schema_file_regex() -> &'static Regex {
    SCHEMA_FILE_REGEX.get_or_init(|| {
        Regex::new(r"AUTOSAR_(\d+)\.xsd").expect("Failed to compile schema file regex")
    })
}

/// Numeric AUTOSAR schema revision, e.g. 51 for `AUTOSAR_00051.xsd`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaVersion(pub u32);

impl SchemaVersion {
    pub const LATEST: SchemaVersion = SchemaVersion(51);

    /// Version named by an `xsi:schemaLocation` value such as
    /// `http://autosar.org/schema/r4.0 AUTOSAR_00049.xsd`
    pub fn from_schema_location(location: &str) -> Option<Self> {
        get_schema_file_regex()
            .captures(location)
            .and_then(|caps| caps[1].parse().ok())
            .map(SchemaVersion)
    }

    /// Schema file name, zero-padded to five digits
    pub fn schema_file(&self) -> String {
        format!("AUTOSAR_{:05}.xsd", self.0)
    }

    /// Full `xsi:schemaLocation` value for the given namespace
    pub fn schema_location(&self, namespace: &str) -> String {
        format!("{} {}", namespace, self.schema_file())
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::LATEST
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Field tag that was renamed between schema revisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionedTag {
    /// Current tag
    pub tag: &'static str,
    /// Tag used by documents older than `since`
    pub legacy: &'static str,
    pub since: SchemaVersion,
}

impl VersionedTag {
    pub const fn new(tag: &'static str, legacy: &'static str, since: u32) -> Self {
        Self {
            tag,
            legacy,
            since: SchemaVersion(since),
        }
    }

    pub fn select(&self, version: SchemaVersion) -> &'static str {
        if version >= self.since {
            self.tag
        } else {
            self.legacy
        }
    }
}
