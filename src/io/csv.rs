//! CSV sink construction.
//!
//! The conversion loop writes through [`csv::Writer`], which implements
//! [`RowSink`](crate::sink::RowSink); quoting and escaping are the writer's
//! job. This module builds writers for files (optionally compressed) and
//! standard output.

use crate::io::compression::{EncodedWriter, auto_detect_writer};
use anyhow::{Context, Result, anyhow, bail};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::fs::{File, create_dir_all};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Output text format settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvOptions {
    /// Field delimiter byte, `,` by default.
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvOptions {
    /// Parse a delimiter given on the command line: a single ASCII character
    /// or the escape `\t`.
    ///
    /// # Errors
    /// Returns an error for anything else.
    pub fn with_delimiter_str(mut self, delimiter: &str) -> Result<Self> {
        self.delimiter = match delimiter {
            "\\t" | "\t" => b'\t',
            d if d.len() == 1 && d.is_ascii() => d.as_bytes()[0],
            d => bail!("delimiter must be a single ASCII character, got {d:?}"),
        };
        Ok(self)
    }
}

/// Wrap any writer as a CSV sink. Every record, header included, is written
/// as given; the writer does not derive headers on its own.
pub fn csv_writer<W: Write>(writer: W, options: &CsvOptions) -> csv::Writer<W> {
    WriterBuilder::new()
        .has_headers(false)
        .delimiter(options.delimiter)
        .from_writer(writer)
}

/// A CSV sink on a file, possibly compressed.
pub type CsvFile = csv::Writer<EncodedWriter<BufWriter<File>>>;

/// Create `path` (and missing parent directories) as a CSV sink, compressing
/// by extension (`.gz`, `.zst`, `.bz2`, `.xz`). Pass the writer to
/// [`finish_csv_file`] when done; dropping it loses trailer errors.
///
/// # Errors
/// Returns an error if directories or the file cannot be created.
pub fn create_csv_file(path: impl AsRef<Path>, options: &CsvOptions) -> Result<CsvFile> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
    }
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let w = auto_detect_writer(f, path)
        .with_context(|| format!("setup compression for {}", path.display()))?;
    Ok(csv_writer(w, options))
}

/// Flush `writer`, write the compression trailer and flush the file.
///
/// # Errors
/// Returns the I/O error that stopped any of those steps.
pub fn finish_csv_file(writer: CsvFile) -> Result<()> {
    let encoded = writer
        .into_inner()
        .map_err(|e| anyhow!("flush CSV writer: {}", e.error()))?;
    encoded.finish().context("finish output stream")?;
    Ok(())
}

/// CSV sink on the process's standard output.
pub fn stdout_csv(options: &CsvOptions) -> csv::Writer<std::io::StdoutLock<'static>> {
    csv_writer(std::io::stdout().lock(), options)
}
