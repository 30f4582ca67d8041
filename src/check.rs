//! Per-file checking: read a document, optionally write it back and re-read
//! it, and aggregate the outcome over many files.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::diagnostics::{Diagnostic, Severity, SourceLocation};
use crate::error::ArxmlError;
use crate::reader::Reader;
use crate::schema::SchemaVersion;
use crate::writer::Writer;

/// Outcome of checking a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CheckStatus {
    /// Read without findings
    Clean,
    /// Read, with warnings only
    Warnings { count: usize },
    /// Read, but some elements or packages were dropped
    Errors { count: usize },
    /// The document could not be read at all
    Failed { message: String },
}

impl CheckStatus {
    pub fn is_clean(&self) -> bool {
        matches!(self, CheckStatus::Clean)
    }

    /// Whether the file should make the run fail
    pub fn is_failure(&self) -> bool {
        matches!(self, CheckStatus::Errors { .. } | CheckStatus::Failed { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileCheckResult {
    pub path: PathBuf,
    pub status: CheckStatus,
    pub schema_version: Option<SchemaVersion>,
    /// Packages and elements in the read workspace
    pub nodes: usize,
    pub diagnostics: Vec<Diagnostic>,
    /// `Some(true)` when the re-read document matched the original
    pub roundtrip: Option<bool>,
    pub duration: Duration,
}

impl FileCheckResult {
    pub fn failed(path: PathBuf, error: &ArxmlError, duration: Duration) -> Self {
        Self {
            path,
            status: CheckStatus::Failed {
                message: error.to_string(),
            },
            schema_version: None,
            nodes: 0,
            diagnostics: vec![Diagnostic::from_error(error, None, SourceLocation::default())],
            roundtrip: None,
            duration,
        }
    }
}

/// Aggregated results over every checked file
#[derive(Debug, Clone, Serialize)]
pub struct CheckResults {
    pub total_files: usize,
    pub clean_files: usize,
    pub warning_files: usize,
    pub error_files: usize,
    pub failed_files: usize,
    /// Files whose round trip did not reproduce the workspace
    pub roundtrip_mismatches: usize,
    pub total_duration: Duration,
    pub average_duration: Duration,
    pub started_at: DateTime<Utc>,
    pub file_results: Vec<FileCheckResult>,
}

impl CheckResults {
    pub fn aggregate(file_results: Vec<FileCheckResult>, started_at: DateTime<Utc>) -> Self {
        let total_files = file_results.len();
        let mut clean_files = 0;
        let mut warning_files = 0;
        let mut error_files = 0;
        let mut failed_files = 0;
        let mut roundtrip_mismatches = 0;
        let mut total_duration = Duration::ZERO;

        for result in &file_results {
            match result.status {
                CheckStatus::Clean => clean_files += 1,
                CheckStatus::Warnings { .. } => warning_files += 1,
                CheckStatus::Errors { .. } => error_files += 1,
                CheckStatus::Failed { .. } => failed_files += 1,
            }
            if result.roundtrip == Some(false) {
                roundtrip_mismatches += 1;
            }
            total_duration += result.duration;
        }

        let average_duration = if total_files > 0 {
            total_duration / total_files as u32
        } else {
            Duration::ZERO
        };

        Self {
            total_files,
            clean_files,
            warning_files,
            error_files,
            failed_files,
            roundtrip_mismatches,
            total_duration,
            average_duration,
            started_at,
            file_results,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.error_files > 0 || self.failed_files > 0 || self.roundtrip_mismatches > 0
    }

    pub fn total_diagnostics(&self, severity: Severity) -> usize {
        self.file_results
            .iter()
            .flat_map(|result| &result.diagnostics)
            .filter(|diagnostic| diagnostic.severity == severity)
            .count()
    }

    /// Percentage of files read without errors
    pub fn success_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            ((self.clean_files + self.warning_files) as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Check one document. With `writer`, the read workspace is written back and
/// re-read, and the result compared with the original.
pub fn check_file(path: &Path, reader: &Reader<'_>, writer: Option<&Writer<'_>>) -> FileCheckResult {
    let start = Instant::now();
    let outcome = match reader.read_file(path) {
        Ok(outcome) => outcome,
        Err(err) => {
            debug!(file = %path.display(), error = %err, "document unreadable");
            return FileCheckResult::failed(path.to_path_buf(), &err, start.elapsed());
        }
    };

    let mut diagnostics = outcome.diagnostics.clone();
    let roundtrip = writer.map(|writer| {
        match roundtrip_matches(&outcome.workspace, reader, writer) {
            Ok(matches) => matches,
            Err(err) => {
                diagnostics.push(Diagnostic::from_error(&err, None, SourceLocation::default()));
                false
            }
        }
    });

    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    let warnings = diagnostics.len() - errors;
    let status = if errors > 0 {
        CheckStatus::Errors { count: errors }
    } else if warnings > 0 {
        CheckStatus::Warnings { count: warnings }
    } else {
        CheckStatus::Clean
    };
    info!(file = %path.display(), ?status, "checked");

    FileCheckResult {
        path: path.to_path_buf(),
        status,
        schema_version: Some(outcome.schema_version),
        nodes: outcome.workspace.len(),
        diagnostics,
        roundtrip,
        duration: start.elapsed(),
    }
}

fn roundtrip_matches(
    workspace: &crate::model::Workspace,
    reader: &Reader<'_>,
    writer: &Writer<'_>,
) -> crate::error::Result<bool> {
    let text = writer.write_workspace(workspace)?;
    let reread = reader.read_str(&text)?;
    Ok(reread.workspace.content_eq(workspace))
}

/// Check every file in order; with `fail_fast`, stop after the first file
/// that fails
pub fn check_files(
    paths: &[PathBuf],
    reader: &Reader<'_>,
    writer: Option<&Writer<'_>>,
    fail_fast: bool,
) -> CheckResults {
    let started_at = Utc::now();
    let mut results = Vec::with_capacity(paths.len());
    for path in paths {
        let result = check_file(path, reader, writer);
        let failed = result.status.is_failure() || result.roundtrip == Some(false);
        results.push(result);
        if failed && fail_fast {
            debug!(file = %path.display(), "stopping after first failure");
            break;
        }
    }
    CheckResults::aggregate(results, started_at)
}
