//! Output formatting.

use crate::cli::OutputFormat;
use camino::Utf8PathBuf;
use serde::Serialize;
use vue_common::{MergeWarning, RenameBundle};

/// The result of one `merge` run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    /// The host component.
    pub host: Utf8PathBuf,
    /// The merged fragment.
    pub fragment: Utf8PathBuf,
    /// Renames applied to fragment names, by category.
    pub renames: RenameBundle,
    /// Parts the merge could not combine cleanly.
    pub warnings: Vec<MergeWarning>,
}

/// A component that failed to load or parse.
#[derive(Debug, Serialize)]
pub struct CheckFailure {
    /// The component path.
    pub filename: Utf8PathBuf,
    /// The error message.
    pub message: String,
}

/// Formats reports for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a merge report.
    pub fn format_merge(&self, report: &MergeReport) -> String {
        match self.format {
            OutputFormat::Human => Self::merge_human(report),
            OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
        }
    }

    fn merge_human(report: &MergeReport) -> String {
        let mut output = format!("Merged {} into {}\n", report.fragment, report.host);
        if report.renames.is_empty() {
            output.push_str("No renames\n");
        }
        for (category, map) in report.renames.iter() {
            for (old, new) in map.iter() {
                output.push_str(&format!("  {}: {} -> {}\n", category, old, new));
            }
        }
        for warning in &report.warnings {
            output.push_str(&format!("Warning: {}\n", warning));
        }
        output
    }

    /// Formats the failures of a `check` run.
    pub fn format_failures(&self, failures: &[CheckFailure]) -> String {
        match self.format {
            OutputFormat::Human => failures
                .iter()
                .map(|failure| format!("{}\nError: {}\n\n", failure.filename, failure.message))
                .collect(),
            OutputFormat::Json => serde_json::to_string_pretty(failures).unwrap_or_default(),
        }
    }
}

/// Summary of a `check` run.
#[derive(Debug, Clone, Copy)]
pub struct CheckSummary {
    /// Number of components checked.
    pub file_count: usize,
    /// Number of components that failed.
    pub error_count: usize,
}

impl CheckSummary {
    /// Formats the summary line.
    pub fn format(&self) -> String {
        let error_word = if self.error_count == 1 {
            "error"
        } else {
            "errors"
        };
        let file_word = if self.file_count == 1 {
            "component"
        } else {
            "components"
        };

        format!(
            "====================================\nvue-kit found {} {} in {} {}",
            self.error_count, error_word, self.file_count, file_word
        )
    }

    /// Returns true if the run should exit with a failure code.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}
