//! The decoder capability the conversion loop pulls from.

use crate::series::Batch;
use anyhow::Result;

/// A streaming typed-column data source.
///
/// Implementations wrap a concrete file format; the conversion loop only
/// depends on this contract:
///
/// * [`column_names`](Decoder::column_names) is fixed for the lifetime of the
///   decoder and defines the row width.
/// * [`pull`](Decoder::pull) returns up to `max_rows` rows. `Ok(None)` (or a
///   batch with no rows) means end of data. A batch with fewer rows than
///   requested is valid and tells the caller not to pull again.
///
/// Batches are handed over by value, so decoders are free to reuse their
/// internal buffers between pulls.
pub trait Decoder {
    /// Output column names, used verbatim as the header row.
    fn column_names(&self) -> &[String];

    /// Decode the next batch of at most `max_rows` rows (`max_rows >= 1`).
    ///
    /// # Errors
    /// Any failure other than reaching the end of the data.
    fn pull(&mut self, max_rows: usize) -> Result<Option<Batch>>;
}

impl<D: Decoder + ?Sized> Decoder for Box<D> {
    fn column_names(&self) -> &[String] {
        (**self).column_names()
    }

    fn pull(&mut self, max_rows: usize) -> Result<Option<Batch>> {
        (**self).pull(max_rows)
    }
}

impl<D: Decoder + ?Sized> Decoder for &mut D {
    fn column_names(&self) -> &[String] {
        (**self).column_names()
    }

    fn pull(&mut self, max_rows: usize) -> Result<Option<Batch>> {
        (**self).pull(max_rows)
    }
}
