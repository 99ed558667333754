//! # statcsv
//!
//! Streaming conversion of **chunked columnar data sources** into delimited
//! text. A decoder hands over typed, possibly-missing columns in bounded
//! batches; statcsv unifies numeric widths to `f64`, interleaves the columns
//! into rows and writes them to a CSV sink one row at a time, so memory stays
//! bounded by one batch no matter how large the source is.
//!
//! ## Key Features
//!
//! - **Decoder abstraction** - any source implementing [`Decoder`] can be converted
//! - **Numeric unification** - `i8`/`i16`/`i32`/`i64`/`f32` become `f64` ([`upcast_numeric`])
//! - **Exhaustive column dispatch** - numeric, text and temporal formatting ([`dispatch`])
//! - **Missing values** - per-column masks, rendered as empty fields
//! - **Truncation tolerant** - a short batch ends the run successfully, keeping every
//!   row the decoder could read
//! - **Arrow-backed sources** - Parquet and Arrow IPC decoders (feature flags)
//! - **Parallel multi-file runs** - one pipeline per file on a rayon pool
//!
//! ## Quick Start
//!
//! ```no_run
//! use statcsv::convert::{convert, ConvertOptions};
//! use statcsv::io::{csv::{stdout_csv, CsvOptions}, open_decoder};
//! # fn main() -> anyhow::Result<()> {
//! let mut decoder = open_decoder("survey.parquet")?;
//! let mut sink = stdout_csv(&CsvOptions::default());
//! let summary = convert(&mut decoder, &mut sink, &ConvertOptions::default())?;
//! eprintln!("{} rows", summary.rows);
//! # Ok(())
//! # }
//! ```
//!
//! ## Output format
//!
//! - header row: the decoder's column names, verbatim
//! - numeric cells: fixed point with six fractional digits (`1500.000000`)
//! - text cells: verbatim
//! - temporal cells: ISO-8601 (`2024-03-09T13:05:00`)
//! - missing cells: empty
//!
//! ## Feature Flags
//!
//! - `io-arrow` - Arrow IPC file and stream decoders
//! - `io-parquet` - Parquet decoder (implies `io-arrow`)
//! - `compression-gzip`, `compression-zstd`, `compression-bzip2`, `compression-xz` -
//!   compressed CSV output and compressed IPC stream input

pub mod convert;
pub mod dispatch;
pub mod error;
pub mod io;
pub mod metrics;
pub mod missing;
pub mod runner;
pub mod series;
pub mod sink;
pub mod source;
pub mod testing;
pub mod upcast;

pub use convert::{ConvertOptions, DEFAULT_BATCH_SIZE, convert, to_csv};
pub use dispatch::{BoundColumn, CellValues, dispatch};
pub use error::ConvertError;
pub use metrics::{ConversionSummary, RunReport, Termination};
pub use missing::MissingMask;
pub use series::{Batch, ColumnData, Series};
pub use sink::RowSink;
pub use source::Decoder;
pub use upcast::upcast_numeric;
