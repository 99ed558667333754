//! Columnar batch model exchanged between decoders and the conversion loop.
//!
//! A [`Batch`] is one bounded slice of rows across all output columns. Each
//! column is a [`Series`]: a [`ColumnData`] payload of exactly one
//! representation plus an optional missing-value mask.
//!
//! # Design
//!
//! - **Closed representation set**: [`ColumnData`] enumerates every width a
//!   decoder may hand over, so dispatch is an exhaustive `match`.
//! - **Mask is optional**: `None` means no value in the column is missing and
//!   costs nothing to check.
//! - **Owned per pull**: a batch is moved into the loop and dropped once its
//!   rows are written; nothing borrows from it across pulls.

use chrono::NaiveDateTime;

/// Typed values of one column batch.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Text(Vec<String>),
    /// Calendar timestamps. Epoch and unit interpretation happen in the decoder.
    Temporal(Vec<NaiveDateTime>),
    /// A representation the decoder could not map onto any of the above.
    ///
    /// The pipeline rejects it; it exists so decoders can report the source
    /// type instead of guessing a conversion.
    Other { type_name: String, len: usize },
}

impl ColumnData {
    /// Number of values in the column.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::Int8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::Text(v) => v.len(),
            Self::Temporal(v) => v.len(),
            Self::Other { len, .. } => *len,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name of the representation, used in errors and logs.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Int8(_) => "int8",
            Self::Int16(_) => "int16",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::Float32(_) => "float32",
            Self::Float64(_) => "float64",
            Self::Text(_) => "text",
            Self::Temporal(_) => "temporal",
            Self::Other { type_name, .. } => type_name,
        }
    }
}

/// One column of a batch: values plus an optional missing-value mask.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    data: ColumnData,
    missing: Option<Vec<bool>>,
}

impl Series {
    /// Create a series with no missing values.
    pub fn new(data: ColumnData) -> Self {
        Self {
            data,
            missing: None,
        }
    }

    /// Attach a missing-value mask (`true` = missing).
    ///
    /// The mask length is checked against the data when the batch is consumed.
    #[must_use]
    pub fn with_missing(mut self, mask: Vec<bool>) -> Self {
        self.missing = Some(mask);
        self
    }

    #[inline]
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    #[inline]
    pub fn missing(&self) -> Option<&[bool]> {
        self.missing.as_deref()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Split into the value payload and the mask.
    pub fn into_parts(self) -> (ColumnData, Option<Vec<bool>>) {
        (self.data, self.missing)
    }

    /// Reassemble from parts, keeping the mask untouched.
    pub fn from_parts(data: ColumnData, missing: Option<Vec<bool>>) -> Self {
        Self { data, missing }
    }
}

impl From<ColumnData> for Series {
    fn from(data: ColumnData) -> Self {
        Self::new(data)
    }
}

/// One bounded group of rows, one [`Series`] per output column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    columns: Vec<Series>,
}

impl Batch {
    pub fn new(columns: Vec<Series>) -> Self {
        Self { columns }
    }

    /// Row count, taken from the first column. Zero for a column-less batch.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Series::len)
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// `true` when the batch carries no rows, which signals end of data.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    pub fn columns(&self) -> &[Series] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Series> {
        self.columns
    }
}

impl FromIterator<Series> for Batch {
    fn from_iter<I: IntoIterator<Item = Series>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
