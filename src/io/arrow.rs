//! Arrow `RecordBatch` adapter shared by the Parquet and IPC decoders.
//!
//! This module provides:
//! - **Type mapping** from Arrow arrays to [`Series`]: [`series_from_array`]
//! - **Batch conversion**: [`batch_from_record_batch`]
//! - **Re-chunking decoder**: [`RecordBatchDecoder`] turns any iterator of
//!   record batches into a [`Decoder`] that honours the requested row count
//!
//! # Type mapping
//!
//! | Arrow                                   | Series                        |
//! |-----------------------------------------|-------------------------------|
//! | `Int8`/`Int16`/`Int32`/`Int64`          | same width                    |
//! | `UInt8`/`UInt16`/`UInt32`               | next wider signed integer     |
//! | `UInt64`, `Decimal*`                    | `Float64`                     |
//! | `Float16`/`Float32`                     | `Float32`                     |
//! | `Float64`                               | `Float64`                     |
//! | `Boolean`                               | `Int8` (0/1)                  |
//! | `Utf8`/`LargeUtf8`/`Utf8View`/dictionary| `Text` (dictionary resolved)  |
//! | `Date32`/`Date64`/`Timestamp(_, _)`     | `Temporal` (UTC wall clock)   |
//! | `Null`                                  | all-missing `Text`            |
//! | anything else                           | `Other`                       |
//!
//! Arrow null buffers become the missing mask; arrays without nulls carry no
//! mask at all.
//!
//! # Salvage
//!
//! When the underlying reader fails after part of the current pull has been
//! decoded, [`RecordBatchDecoder`] hands back those rows as a short batch and
//! keeps the error for the next pull. The conversion loop stops at the short
//! batch, so a truncated file yields every row before the damage.

use crate::series::{Batch, ColumnData, Series};
use crate::source::Decoder;
use anyhow::{Context, Result, anyhow};
use arrow::array::{Array, ArrayRef, AsArray, PrimitiveArray};
use arrow::compute::{cast, concat_batches};
use arrow::datatypes::{
    ArrowPrimitiveType, DataType, Date32Type, Date64Type, Float32Type, Float64Type, Int8Type,
    Int16Type, Int32Type, Int64Type, SchemaRef, TimeUnit, TimestampMicrosecondType,
    TimestampMillisecondType, TimestampNanosecondType, TimestampSecondType,
};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use arrow::temporal_conversions::{
    date32_to_datetime, date64_to_datetime, timestamp_ms_to_datetime, timestamp_ns_to_datetime,
    timestamp_s_to_datetime, timestamp_us_to_datetime,
};
use chrono::NaiveDateTime;
use tracing::warn;

/// Missing mask from the array's null buffer, `None` when nothing is null.
fn missing_mask(array: &dyn Array) -> Option<Vec<bool>> {
    let nulls = array.logical_nulls()?;
    if nulls.null_count() == 0 {
        return None;
    }
    Some((0..array.len()).map(|i| nulls.is_null(i)).collect())
}

fn primitive_values<T: ArrowPrimitiveType>(array: &dyn Array) -> Vec<T::Native> {
    array.as_primitive::<T>().values().to_vec()
}

fn cast_to(array: &ArrayRef, to: &DataType) -> Result<ArrayRef> {
    cast(array, to).with_context(|| format!("cast {} to {to}", array.data_type()))
}

fn temporal_values<T, F>(array: &dyn Array, convert: F) -> Result<Vec<NaiveDateTime>>
where
    T: ArrowPrimitiveType,
    F: Fn(T::Native) -> Option<NaiveDateTime>,
{
    let values: &PrimitiveArray<T> = array.as_primitive::<T>();
    let epoch = NaiveDateTime::default();
    values
        .iter()
        .map(|v| match v {
            // Null slots hold arbitrary values; keep them out of range checks.
            None => Ok(epoch),
            Some(raw) => convert(raw).ok_or_else(|| anyhow!("timestamp out of range")),
        })
        .collect()
}

fn text_values(array: &ArrayRef) -> Result<Vec<String>> {
    let utf8 = match array.data_type() {
        DataType::Utf8 => array.clone(),
        _ => cast_to(array, &DataType::Utf8)?,
    };
    Ok(utf8
        .as_string::<i32>()
        .iter()
        .map(|v| v.map(str::to_owned).unwrap_or_default())
        .collect())
}

/// Map one Arrow array onto the batch model.
///
/// # Errors
/// Returns an error when a cast fails or a temporal value cannot be
/// represented as a calendar timestamp.
pub fn series_from_array(array: &ArrayRef) -> Result<Series> {
    let missing = missing_mask(array.as_ref());
    let data = match array.data_type() {
        DataType::Int8 => ColumnData::Int8(primitive_values::<Int8Type>(array)),
        DataType::Int16 => ColumnData::Int16(primitive_values::<Int16Type>(array)),
        DataType::Int32 => ColumnData::Int32(primitive_values::<Int32Type>(array)),
        DataType::Int64 => ColumnData::Int64(primitive_values::<Int64Type>(array)),
        DataType::UInt8 => {
            ColumnData::Int16(primitive_values::<Int16Type>(&cast_to(array, &DataType::Int16)?))
        }
        DataType::UInt16 => {
            ColumnData::Int32(primitive_values::<Int32Type>(&cast_to(array, &DataType::Int32)?))
        }
        DataType::UInt32 => {
            ColumnData::Int64(primitive_values::<Int64Type>(&cast_to(array, &DataType::Int64)?))
        }
        DataType::UInt64
        | DataType::Decimal128(_, _)
        | DataType::Decimal256(_, _) => ColumnData::Float64(primitive_values::<Float64Type>(
            &cast_to(array, &DataType::Float64)?,
        )),
        DataType::Float16 => ColumnData::Float32(primitive_values::<Float32Type>(&cast_to(
            array,
            &DataType::Float32,
        )?)),
        DataType::Float32 => ColumnData::Float32(primitive_values::<Float32Type>(array)),
        DataType::Float64 => ColumnData::Float64(primitive_values::<Float64Type>(array)),
        DataType::Boolean => ColumnData::Int8(
            array
                .as_boolean()
                .values()
                .iter()
                .map(i8::from)
                .collect(),
        ),
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            ColumnData::Text(text_values(array)?)
        }
        DataType::Dictionary(_, value) if is_string(value) => ColumnData::Text(text_values(array)?),
        DataType::Date32 => ColumnData::Temporal(temporal_values::<Date32Type, _>(
            array,
            date32_to_datetime,
        )?),
        DataType::Date64 => ColumnData::Temporal(temporal_values::<Date64Type, _>(
            array,
            date64_to_datetime,
        )?),
        DataType::Timestamp(unit, _) => ColumnData::Temporal(match unit {
            TimeUnit::Second => {
                temporal_values::<TimestampSecondType, _>(array, timestamp_s_to_datetime)?
            }
            TimeUnit::Millisecond => {
                temporal_values::<TimestampMillisecondType, _>(array, timestamp_ms_to_datetime)?
            }
            TimeUnit::Microsecond => {
                temporal_values::<TimestampMicrosecondType, _>(array, timestamp_us_to_datetime)?
            }
            TimeUnit::Nanosecond => {
                temporal_values::<TimestampNanosecondType, _>(array, timestamp_ns_to_datetime)?
            }
        }),
        DataType::Null => {
            return Ok(Series::new(ColumnData::Text(vec![String::new(); array.len()]))
                .with_missing(vec![true; array.len()]));
        }
        other => ColumnData::Other {
            type_name: other.to_string(),
            len: array.len(),
        },
    };
    Ok(Series::from_parts(data, missing))
}

fn is_string(dt: &DataType) -> bool {
    matches!(dt, DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View)
}

/// Convert every column of a record batch.
///
/// # Errors
/// See [`series_from_array`]; the failing column is named in the context.
pub fn batch_from_record_batch(batch: &RecordBatch) -> Result<Batch> {
    let schema = batch.schema();
    batch
        .columns()
        .iter()
        .zip(schema.fields())
        .map(|(array, field)| {
            series_from_array(array).with_context(|| format!("decode column {:?}", field.name()))
        })
        .collect()
}

/// Column names of an Arrow schema, in order.
pub fn column_names(schema: &SchemaRef) -> Vec<String> {
    schema.fields().iter().map(|f| f.name().clone()).collect()
}

/// [`Decoder`] over any iterator of Arrow record batches.
///
/// Source batches are sliced and concatenated so each pull returns exactly
/// `max_rows` rows until the source runs dry.
pub struct RecordBatchDecoder<I> {
    names: Vec<String>,
    batches: I,
    /// Unconsumed tail of the last source batch.
    pending: Option<RecordBatch>,
    /// Read failure held back while salvaged rows are delivered.
    deferred: Option<anyhow::Error>,
    exhausted: bool,
}

impl<I> RecordBatchDecoder<I>
where
    I: Iterator<Item = std::result::Result<RecordBatch, ArrowError>>,
{
    pub fn new(schema: SchemaRef, batches: I) -> Self {
        Self {
            names: column_names(&schema),
            batches,
            pending: None,
            deferred: None,
            exhausted: false,
        }
    }

    /// Next source batch, `Ok(None)` once the source is exhausted.
    fn next_source(&mut self) -> std::result::Result<Option<RecordBatch>, ArrowError> {
        if let Some(batch) = self.pending.take() {
            return Ok(Some(batch));
        }
        if self.exhausted {
            return Ok(None);
        }
        match self.batches.next() {
            None => {
                self.exhausted = true;
                Ok(None)
            }
            Some(Ok(batch)) => Ok(Some(batch)),
            Some(Err(e)) => {
                self.exhausted = true;
                Err(e)
            }
        }
    }
}

impl<I> Decoder for RecordBatchDecoder<I>
where
    I: Iterator<Item = std::result::Result<RecordBatch, ArrowError>>,
{
    fn column_names(&self) -> &[String] {
        &self.names
    }

    fn pull(&mut self, max_rows: usize) -> Result<Option<Batch>> {
        if let Some(err) = self.deferred.take() {
            return Err(err);
        }

        let mut parts: Vec<RecordBatch> = Vec::new();
        let mut rows = 0usize;
        while rows < max_rows {
            let next = match self.next_source() {
                Ok(Some(batch)) => batch,
                Ok(None) => break,
                Err(e) => {
                    let err = anyhow::Error::new(e).context("read record batch");
                    if rows == 0 {
                        return Err(err);
                    }
                    warn!(rows, error = %format!("{err:#}"), "source failed mid-batch; returning rows decoded so far");
                    self.deferred = Some(err);
                    break;
                }
            };
            let take = (max_rows - rows).min(next.num_rows());
            if take < next.num_rows() {
                self.pending = Some(next.slice(take, next.num_rows() - take));
            }
            if take > 0 {
                parts.push(next.slice(0, take));
                rows += take;
            }
        }

        if rows == 0 {
            return Ok(None);
        }
        let merged = if parts.len() == 1 {
            parts.swap_remove(0)
        } else {
            let schema = parts[0].schema();
            concat_batches(&schema, &parts).context("concatenate record batches")?
        };
        batch_from_record_batch(&merged).map(Some)
    }
}
