//! Pre-built series and Arrow files for conversion tests.

use crate::series::{Batch, ColumnData, Series};
use chrono::{NaiveDate, NaiveDateTime};

pub fn int8(values: &[i8]) -> Series {
    Series::new(ColumnData::Int8(values.to_vec()))
}

pub fn int16(values: &[i16]) -> Series {
    Series::new(ColumnData::Int16(values.to_vec()))
}

pub fn int32(values: &[i32]) -> Series {
    Series::new(ColumnData::Int32(values.to_vec()))
}

pub fn int64(values: &[i64]) -> Series {
    Series::new(ColumnData::Int64(values.to_vec()))
}

pub fn float32(values: &[f32]) -> Series {
    Series::new(ColumnData::Float32(values.to_vec()))
}

pub fn float64(values: &[f64]) -> Series {
    Series::new(ColumnData::Float64(values.to_vec()))
}

pub fn text(values: &[&str]) -> Series {
    Series::new(ColumnData::Text(values.iter().map(|s| (*s).to_string()).collect()))
}

pub fn temporal(values: &[NaiveDateTime]) -> Series {
    Series::new(ColumnData::Temporal(values.to_vec()))
}

pub fn batch(columns: Vec<Series>) -> Batch {
    Batch::new(columns)
}

/// Midnight on the given day.
///
/// # Panics
/// Panics on an invalid calendar date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid calendar date")
}

/// A three-column slice (`id` int32, `score` float64 with every fifth value
/// missing, `label` text) covering rows `start..start + len`.
pub fn numbered_batch(start: usize, len: usize) -> Batch {
    let ids: Vec<i32> = (start..start + len).map(|i| i as i32).collect();
    let scores: Vec<f64> = (start..start + len).map(|i| i as f64 / 4.0).collect();
    let mask: Vec<bool> = (start..start + len).map(|i| i % 5 == 4).collect();
    let labels: Vec<String> = (start..start + len).map(|i| format!("row-{i}")).collect();
    Batch::new(vec![
        Series::new(ColumnData::Int32(ids)),
        Series::new(ColumnData::Float64(scores)).with_missing(mask),
        Series::new(ColumnData::Text(labels)),
    ])
}

#[cfg(feature = "io-arrow")]
pub use arrow_files::*;

#[cfg(feature = "io-arrow")]
mod arrow_files {
    use crate::io::compression::auto_detect_writer;
    use anyhow::{Context, Result};
    use arrow::array::{
        ArrayRef, Date32Array, Float64Array, Int32Array, StringArray, TimestampMillisecondArray,
    };
    use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
    use arrow::ipc::writer::{FileWriter, StreamWriter};
    use arrow::record_batch::RecordBatch;
    use std::fs::File;
    use std::path::Path;
    use std::sync::Arc;

    /// Record batch with `id` (int32), `score` (float64, null on every fifth
    /// row), `label` (utf8), `day` (date32) and `seen` (timestamp ms, UTC).
    ///
    /// # Panics
    /// Panics if Arrow rejects the hand-built columns, which would be a bug here.
    pub fn sample_record_batch(start: usize, len: usize) -> RecordBatch {
        let rows = start..start + len;
        let ids: Int32Array = rows.clone().map(|i| Some(i as i32)).collect();
        let scores: Float64Array = rows
            .clone()
            .map(|i| (i % 5 != 4).then_some(i as f64 / 4.0))
            .collect();
        let labels: StringArray = rows.clone().map(|i| Some(format!("row-{i}"))).collect();
        let days: Date32Array = rows.clone().map(|i| Some(i as i32)).collect();
        let seen = TimestampMillisecondArray::from(
            rows.map(|i| Some(i as i64 * 1_500)).collect::<Vec<_>>(),
        )
        .with_timezone("UTC");

        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int32, false),
            Field::new("score", DataType::Float64, true),
            Field::new("label", DataType::Utf8, false),
            Field::new("day", DataType::Date32, false),
            Field::new(
                "seen",
                DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into())),
                false,
            ),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(ids),
            Arc::new(scores),
            Arc::new(labels),
            Arc::new(days),
            Arc::new(seen),
        ];
        RecordBatch::try_new(schema, columns).expect("sample batch matches its schema")
    }

    /// Write `batches` as an Arrow IPC file.
    ///
    /// # Errors
    /// Returns an error on I/O or encoding failures.
    pub fn write_ipc_file(path: impl AsRef<Path>, batches: &[RecordBatch]) -> Result<()> {
        let path = path.as_ref();
        let schema = batches.first().context("at least one batch")?.schema();
        let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        let mut writer = FileWriter::try_new(file, &schema).context("create ipc FileWriter")?;
        for b in batches {
            writer.write(b).context("write ipc batch")?;
        }
        writer.finish().context("finish ipc file")?;
        Ok(())
    }

    /// Write `batches` as an Arrow IPC stream, compressed by extension.
    ///
    /// # Errors
    /// Returns an error on I/O or encoding failures.
    pub fn write_ipc_stream(path: impl AsRef<Path>, batches: &[RecordBatch]) -> Result<()> {
        let path = path.as_ref();
        let schema = batches.first().context("at least one batch")?.schema();
        let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        let out = auto_detect_writer(file, path)?;
        let mut writer = StreamWriter::try_new(out, &schema).context("create ipc StreamWriter")?;
        for b in batches {
            writer.write(b).context("write ipc batch")?;
        }
        writer.finish().context("finish ipc stream")?;
        let out = writer.into_inner().context("release ipc stream writer")?;
        out.finish().context("finish compressed stream")?;
        Ok(())
    }

    /// Write `batches` as a Parquet file with one row group per batch.
    ///
    /// # Errors
    /// Returns an error on I/O or encoding failures.
    #[cfg(feature = "io-parquet")]
    pub fn write_parquet(path: impl AsRef<Path>, batches: &[RecordBatch]) -> Result<()> {
        use parquet::arrow::ArrowWriter;

        let path = path.as_ref();
        let schema = batches.first().context("at least one batch")?.schema();
        let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        let mut writer = ArrowWriter::try_new(file, schema, None).context("create ArrowWriter")?;
        for b in batches {
            writer.write(b).context("write parquet batch")?;
            writer.flush().context("close row group")?;
        }
        writer.close().context("close ArrowWriter")?;
        Ok(())
    }
}
