//! Conversion statistics and reporting.
//!
//! Every successful run returns a [`ConversionSummary`]. The multi-file
//! runner gathers one [`FileOutcome`] per input into a [`RunReport`], which can
//! be printed or saved as JSON at the end of execution.
//!
//! # Example
//!
//! ```no_run
//! use statcsv::metrics::RunReport;
//! # fn main() -> anyhow::Result<()> {
//! let report = RunReport::default();
//! report.print();
//! report.save_to_file("metrics.json")?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Why a conversion stopped pulling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The decoder reported end of data (or returned an empty batch).
    EndOfData,
    /// The last batch held fewer rows than requested.
    ShortBatch,
}

/// Statistics for one completed conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionSummary {
    /// Row width, equal to the header length.
    pub columns: usize,
    /// Data rows written, header excluded.
    pub rows: u64,
    /// Non-empty batches consumed.
    pub batches: u64,
    pub termination: Termination,
    pub elapsed_ms: u64,
}

/// Result of converting one input file.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub input: PathBuf,
    /// Destination path, `None` when writing to standard output.
    pub output: Option<PathBuf>,
    /// Summary on success, the rendered error chain on failure.
    #[serde(flatten)]
    pub status: FileStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Converted(ConversionSummary),
    Failed(String),
}

impl FileOutcome {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self.status, FileStatus::Converted(_))
    }
}

/// Outcomes of a whole CLI invocation, in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub files: Vec<FileOutcome>,
}

impl RunReport {
    /// Number of inputs that failed.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.files.iter().filter(|f| !f.is_ok()).count()
    }

    /// Total data rows written across all successful inputs.
    #[must_use]
    pub fn total_rows(&self) -> u64 {
        self.files
            .iter()
            .filter_map(|f| match &f.status {
                FileStatus::Converted(s) => Some(s.rows),
                FileStatus::Failed(_) => None,
            })
            .sum()
    }

    /// Get the report as a JSON value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Print a human-readable report to stderr, keeping stdout free for CSV.
    pub fn print(&self) {
        eprintln!("\n========== Conversion Report ==========");
        for f in &self.files {
            match &f.status {
                FileStatus::Converted(s) => eprintln!(
                    "{}: {} rows, {} batches, {:?} ({} ms)",
                    f.input.display(),
                    s.rows,
                    s.batches,
                    s.termination,
                    s.elapsed_ms
                ),
                FileStatus::Failed(e) => eprintln!("{}: FAILED: {e}", f.input.display()),
            }
        }
        eprintln!("---------------------------------------");
        eprintln!(
            "{} files, {} failed, {} rows",
            self.files.len(),
            self.failures(),
            self.total_rows()
        );
        eprintln!("=======================================\n");
    }

    /// Save the report to a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        let formatted = serde_json::to_string_pretty(self).context("serialize report")?;
        file.write_all(formatted.as_bytes())
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}
