//! Parquet decoder.
//!
//! Reads row groups through `ParquetRecordBatchReaderBuilder` and adapts the
//! resulting Arrow batches with [`RecordBatchDecoder`]. Rows are streamed;
//! memory stays bounded by the reader batch size plus one pull.

use crate::io::arrow::RecordBatchDecoder;
use crate::series::Batch;
use crate::source::Decoder;
use anyhow::{Context, Result};
use parquet::arrow::arrow_reader::{ParquetRecordBatchReader, ParquetRecordBatchReaderBuilder};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Rows per batch requested from the Parquet reader itself.
const READER_BATCH_SIZE: usize = 8 * 1024;

/// Streaming [`Decoder`] over a Parquet file.
pub struct ParquetDecoder {
    inner: RecordBatchDecoder<ParquetRecordBatchReader>,
}

impl ParquetDecoder {
    /// Open `path` and prepare a streaming reader.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or its footer is invalid.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        Self::from_file(file).with_context(|| format!("read parquet metadata of {}", path.display()))
    }

    /// Build a decoder over an already open file.
    ///
    /// # Errors
    /// Returns an error if the Parquet footer cannot be read.
    pub fn from_file(file: File) -> Result<Self> {
        let builder =
            ParquetRecordBatchReaderBuilder::try_new(file).context("open ParquetRecordBatchReader")?;
        let metadata = builder.metadata();
        debug!(
            rows = metadata.file_metadata().num_rows(),
            row_groups = metadata.num_row_groups(),
            "opened parquet file"
        );
        let schema = builder.schema().clone();
        let reader = builder
            .with_batch_size(READER_BATCH_SIZE)
            .build()
            .context("build ParquetRecordBatchReader")?;
        Ok(Self {
            inner: RecordBatchDecoder::new(schema, reader),
        })
    }
}

impl Decoder for ParquetDecoder {
    fn column_names(&self) -> &[String] {
        self.inner.column_names()
    }

    fn pull(&mut self, max_rows: usize) -> Result<Option<Batch>> {
        self.inner.pull(max_rows)
    }
}
