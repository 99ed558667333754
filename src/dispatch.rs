//! Column dispatch: bind each unified column to its text formatting rule.
//!
//! Dispatch happens once per column per batch. The resulting [`BoundColumn`]
//! borrows the batch's values and writes one cell at a time into a reusable
//! `String`, so formatting a row allocates nothing once the row buffer has
//! grown to fit.
//!
//! Output forms are fixed:
//! - numeric: fixed-point with six fractional digits (`1.500000`); non-finite
//!   values print as `NaN`, `+Inf` and `-Inf`
//! - text: verbatim
//! - temporal: `YYYY-MM-DDTHH:MM:SS`, followed by a 3, 6 or 9 digit fraction
//!   only when the sub-second part is non-zero
//! - missing: empty, whatever the branch

use crate::error::{ConvertError, Result};
use crate::missing::MissingMask;
use crate::series::{ColumnData, Series};
use chrono::NaiveDateTime;
use std::fmt::Write;

/// `strftime` pattern for temporal cells.
pub const TEMPORAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// The three formattable dispositions of a column.
#[derive(Debug, Clone, Copy)]
pub enum CellValues<'a> {
    Numeric(&'a [f64]),
    Text(&'a [String]),
    Temporal(&'a [NaiveDateTime]),
}

/// A column bound to its formatting rule and missing mask for one batch.
#[derive(Debug, Clone, Copy)]
pub struct BoundColumn<'a> {
    values: CellValues<'a>,
    missing: MissingMask<'a>,
}

impl BoundColumn<'_> {
    /// Overwrite `out` with the text form of cell `row`.
    #[inline]
    pub fn write_cell(&self, row: usize, out: &mut String) {
        out.clear();
        if self.missing.is_missing(row) {
            return;
        }
        match self.values {
            CellValues::Numeric(v) => format_numeric(v[row], out),
            CellValues::Text(v) => out.push_str(&v[row]),
            CellValues::Temporal(v) => format_temporal(&v[row], out),
        }
    }
}

/// Classify a unified column and bind it for formatting.
///
/// # Errors
/// Returns [`ConvertError::UnknownColumnRepresentation`] for anything other
/// than `Float64`, `Text` or `Temporal`, which includes integer and `f32`
/// columns that skipped [`upcast_numeric`](crate::upcast::upcast_numeric).
pub fn dispatch<'a>(column: &str, series: &'a Series) -> Result<BoundColumn<'a>> {
    let values = match series.data() {
        ColumnData::Float64(v) => CellValues::Numeric(v),
        ColumnData::Text(v) => CellValues::Text(v),
        ColumnData::Temporal(v) => CellValues::Temporal(v),
        other @ (ColumnData::Int8(_)
        | ColumnData::Int16(_)
        | ColumnData::Int32(_)
        | ColumnData::Int64(_)
        | ColumnData::Float32(_)
        | ColumnData::Other { .. }) => {
            return Err(ConvertError::UnknownColumnRepresentation {
                column: column.to_string(),
                type_name: other.type_name().to_string(),
            });
        }
    };
    Ok(BoundColumn {
        values,
        missing: MissingMask::new(series.missing()),
    })
}

/// Append the fixed six-digit rendering of `value` to `out`.
pub fn format_numeric(value: f64, out: &mut String) {
    if value.is_nan() {
        out.push_str("NaN");
    } else if value.is_infinite() {
        out.push_str(if value > 0.0 { "+Inf" } else { "-Inf" });
    } else {
        // Writing into a String cannot fail.
        let _ = write!(out, "{value:.6}");
    }
}

/// Append the ISO-8601 rendering of `ts` to `out`.
pub fn format_temporal(ts: &NaiveDateTime, out: &mut String) {
    // Writing into a String cannot fail.
    let _ = write!(out, "{}", ts.format(TEMPORAL_FORMAT));
}
