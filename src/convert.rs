//! Chunked conversion loop: decoder batches in, delimited rows out.
//!
//! The loop moves through three states:
//!
//! 1. **Start**: write the header row (the decoder's column names) and size
//!    the row buffer to the column count.
//! 2. **Streaming**: pull up to `batch_size` rows, unify numeric columns,
//!    dispatch every column once, then write one row per row index. A batch
//!    that comes back shorter than requested is written in full and ends the
//!    stream, even when the decoder never reported end of data. This keeps
//!    every row a decoder salvaged from a truncated source.
//! 3. **Done**: flush the sink once and report a [`ConversionSummary`].
//!
//! Any decoder, shape, type or sink failure aborts the run. Rows already
//! written stay written.

use crate::dispatch::{BoundColumn, dispatch};
use crate::error::{ConvertError, Result};
use crate::metrics::{ConversionSummary, Termination};
use crate::series::{Batch, Series};
use crate::sink::RowSink;
use crate::source::Decoder;
use crate::upcast::upcast_numeric;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::time::Instant;
use tracing::{debug, info};

/// Rows requested per pull when nothing else is configured.
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = NonZeroUsize::new(1000).unwrap();

/// Tuning knobs for a conversion run.
///
/// The batch size trades memory for throughput; it never changes the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertOptions {
    pub batch_size: NonZeroUsize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ConvertOptions {
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// Convert everything `decoder` yields into rows on `sink`.
///
/// The sink receives the header row first, then one row per decoded row in
/// source order, then a single flush.
///
/// # Errors
/// See [`ConvertError`]; a short final batch is a successful outcome.
pub fn convert<D, S>(decoder: &mut D, sink: &mut S, options: &ConvertOptions) -> Result<ConversionSummary>
where
    D: Decoder + ?Sized,
    S: RowSink + ?Sized,
{
    let started = Instant::now();
    let names: Vec<String> = decoder.column_names().to_vec();
    let batch_size = options.batch_size.get();

    // Start
    sink.write_row(&names).map_err(ConvertError::SinkWrite)?;
    let mut row: Vec<String> = vec![String::new(); names.len()];

    // Streaming
    let mut rows: u64 = 0;
    let mut batches: u64 = 0;
    let termination = loop {
        let batch = match decoder.pull(batch_size).map_err(ConvertError::Decoder)? {
            Some(batch) if !batch.is_empty() => batch,
            _ => break Termination::EndOfData,
        };

        let nrow = batch.num_rows();
        check_shape(&batch, names.len())?;

        let unified = batch
            .into_columns()
            .into_iter()
            .zip(&names)
            .map(|(series, name)| upcast_numeric(name, series))
            .collect::<Result<Vec<Series>>>()?;
        let bound = unified
            .iter()
            .zip(&names)
            .map(|(series, name)| dispatch(name, series))
            .collect::<Result<Vec<BoundColumn<'_>>>>()?;

        write_rows(&bound, nrow, &mut row, sink)?;

        rows += nrow as u64;
        batches += 1;
        debug!(batch = batches, rows = nrow, total = rows, "converted batch");

        if nrow < batch_size {
            break Termination::ShortBatch;
        }
    };

    // Done
    sink.flush().map_err(ConvertError::SinkWrite)?;

    let summary = ConversionSummary {
        columns: names.len(),
        rows,
        batches,
        termination,
        elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    };
    info!(
        rows = summary.rows,
        batches = summary.batches,
        termination = ?summary.termination,
        "conversion finished"
    );
    Ok(summary)
}

/// Write `nrow` rows through the reusable `row` buffer.
fn write_rows<S: RowSink + ?Sized>(
    columns: &[BoundColumn<'_>],
    nrow: usize,
    row: &mut [String],
    sink: &mut S,
) -> Result<()> {
    for i in 0..nrow {
        for (field, column) in row.iter_mut().zip(columns) {
            column.write_cell(i, field);
        }
        sink.write_row(row).map_err(ConvertError::SinkWrite)?;
    }
    Ok(())
}

/// Check the batch against the header width and its own row count.
///
/// O(columns); cells are never re-validated.
fn check_shape(batch: &Batch, width: usize) -> Result<()> {
    if batch.num_columns() != width {
        return Err(ConvertError::MalformedBatch(format!(
            "expected {width} columns, decoder returned {}",
            batch.num_columns()
        )));
    }
    let nrow = batch.num_rows();
    for (j, series) in batch.columns().iter().enumerate() {
        if series.len() != nrow {
            return Err(ConvertError::MalformedBatch(format!(
                "column {j} has {} rows, expected {nrow}",
                series.len()
            )));
        }
        if let Some(mask) = series.missing()
            && mask.len() != nrow
        {
            return Err(ConvertError::MalformedBatch(format!(
                "column {j} missing mask has {} entries, expected {nrow}",
                mask.len()
            )));
        }
    }
    Ok(())
}

/// Convert into a CSV writer, the common case.
///
/// Equivalent to [`convert`] with `batch_size` rows per pull.
///
/// # Errors
/// See [`convert`].
pub fn to_csv<D, W>(decoder: &mut D, batch_size: NonZeroUsize, writer: &mut csv::Writer<W>) -> Result<ConversionSummary>
where
    D: Decoder + ?Sized,
    W: std::io::Write,
{
    convert(decoder, writer, &ConvertOptions::default().with_batch_size(batch_size))
}
