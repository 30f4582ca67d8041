//! Output and reporting for check runs.

use std::time::Duration;

use chrono::{Local, SecondsFormat};

use crate::check::{CheckResults, CheckStatus, FileCheckResult};
use crate::cli::{OutputFormat, VerbosityLevel};
use crate::diagnostics::Severity;

/// Formats [`CheckResults`] for the terminal or as JSON
pub struct Output {
    format: OutputFormat,
    verbosity: VerbosityLevel,
    show_colors: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbosity: VerbosityLevel) -> Self {
        Self {
            format,
            verbosity,
            show_colors: atty::is(atty::Stream::Stdout),
        }
    }

    pub fn with_colors(mut self, show_colors: bool) -> Self {
        self.show_colors = show_colors;
        self
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.show_colors {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    pub fn format_results(&self, results: &CheckResults) -> String {
        match self.format {
            OutputFormat::Json => format_json(results),
            OutputFormat::Summary => self.format_summary(results),
            OutputFormat::Human => self.format_human(results),
        }
    }

    fn format_human(&self, results: &CheckResults) -> String {
        let mut output = String::new();

        if self.verbosity == VerbosityLevel::Quiet {
            for result in results.file_results.iter().filter(|r| r.status.is_failure()) {
                output.push_str(&self.format_file_result(result));
                output.push('\n');
            }
            return output;
        }

        for result in &results.file_results {
            if self.verbosity >= VerbosityLevel::Verbose || !result.status.is_clean() {
                output.push_str(&self.format_file_result(result));
                output.push('\n');
            }
        }
        output.push_str(&self.format_summary(results));
        output
    }

    pub fn format_file_result(&self, result: &FileCheckResult) -> String {
        let path_display = result.path.display();
        let duration_str = format_duration(result.duration);

        let mut output = match &result.status {
            CheckStatus::Clean => format!(
                "{}  {} ({})",
                self.colorize("✓ CLEAN", "32"),
                path_display,
                duration_str
            ),
            CheckStatus::Warnings { count } => format!(
                "{}  {} ({}) - {} warning{}",
                self.colorize("! WARN", "36"),
                path_display,
                duration_str,
                count,
                plural(*count)
            ),
            CheckStatus::Errors { count } => format!(
                "{}  {} ({}) - {} error{}",
                self.colorize("✗ ERRORS", "31"),
                path_display,
                duration_str,
                count,
                plural(*count)
            ),
            CheckStatus::Failed { message } => format!(
                "{}  {} ({}) - {}",
                self.colorize("⚠ FAILED", "33"),
                path_display,
                duration_str,
                message
            ),
        };

        if result.roundtrip == Some(false) {
            output.push_str(&format!(" {}", self.colorize("[round trip mismatch]", "31")));
        }

        if self.verbosity >= VerbosityLevel::Verbose
            && !matches!(result.status, CheckStatus::Failed { .. })
        {
            for diagnostic in &result.diagnostics {
                output.push_str(&format!("\n    {}", diagnostic));
            }
        }
        output
    }

    fn format_summary(&self, results: &CheckResults) -> String {
        let mut output = String::new();
        output.push_str("Check Summary:\n");
        output.push_str(&format!("  Total files: {}\n", results.total_files));
        output.push_str(&format!(
            "  {} {}\n",
            self.colorize("Clean:", "32"),
            results.clean_files
        ));

        if results.warning_files > 0 {
            output.push_str(&format!(
                "  {} {} ({} warnings)\n",
                self.colorize("With warnings:", "36"),
                results.warning_files,
                results.total_diagnostics(Severity::Warning)
            ));
        }
        if results.error_files > 0 {
            output.push_str(&format!(
                "  {} {} ({} errors)\n",
                self.colorize("With errors:", "31"),
                results.error_files,
                results.total_diagnostics(Severity::Error)
            ));
        }
        if results.failed_files > 0 {
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize("Unreadable:", "33"),
                results.failed_files
            ));
        }
        if results.roundtrip_mismatches > 0 {
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize("Round trip mismatches:", "31"),
                results.roundtrip_mismatches
            ));
        }

        output.push_str(&format!("  Success rate: {:.1}%\n", results.success_rate()));
        output.push_str(&format!(
            "  Duration: {}\n",
            format_duration(results.total_duration)
        ));

        if self.verbosity >= VerbosityLevel::Verbose {
            output.push_str(&format!(
                "  Started: {}\n",
                results
                    .started_at
                    .with_timezone(&Local)
                    .to_rfc3339_opts(SecondsFormat::Secs, false)
            ));
            output.push_str(&format!(
                "  Average per file: {}\n",
                format_duration(results.average_duration)
            ));
        }

        output
    }
}

fn format_json(results: &CheckResults) -> String {
    serde_json::to_string_pretty(results)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize results: {}\"}}", e))
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs_f64();
    if total_secs < 1.0 {
        format!("{:.0}ms", duration.as_millis())
    } else if total_secs < 60.0 {
        format!("{:.2}s", total_secs)
    } else {
        let mins = (total_secs / 60.0) as u64;
        let secs = total_secs % 60.0;
        format!("{}m{:.1}s", mins, secs)
    }
}
