//! The row-oriented text sink the conversion loop writes to.

use anyhow::{Context, Result};
use std::io::Write;

/// Destination for converted rows.
///
/// Fields arrive unescaped; quoting and delimiting belong to the sink.
/// [`flush`](RowSink::flush) is called exactly once, after the last row.
pub trait RowSink {
    /// Append one row.
    ///
    /// # Errors
    /// Returns an error when the row cannot be written downstream.
    fn write_row(&mut self, fields: &[String]) -> Result<()>;

    /// Push buffered rows downstream.
    ///
    /// # Errors
    /// Returns an error when buffered data cannot be written.
    fn flush(&mut self) -> Result<()>;
}

impl<W: Write> RowSink for csv::Writer<W> {
    fn write_row(&mut self, fields: &[String]) -> Result<()> {
        self.write_record(fields).context("write CSV record")
    }

    fn flush(&mut self) -> Result<()> {
        csv::Writer::flush(self).context("flush CSV writer")
    }
}

impl<S: RowSink + ?Sized> RowSink for &mut S {
    fn write_row(&mut self, fields: &[String]) -> Result<()> {
        (**self).write_row(fields)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

impl<S: RowSink + ?Sized> RowSink for Box<S> {
    fn write_row(&mut self, fields: &[String]) -> Result<()> {
        (**self).write_row(fields)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}
