//! Numeric unification: every supported numeric width becomes `f64`.
//!
//! Integer widths convert exactly (`i64` values beyond 2^53 round to the
//! nearest `f64`, same as any native promotion), `f32` widens by native
//! promotion, and `f64` columns are passed through without copying. Text and
//! temporal columns are left alone. The missing mask is carried over
//! unchanged in every case.

use crate::error::{ConvertError, Result};
use crate::series::{ColumnData, Series};

/// Unify the numeric representation of `series` to `Float64`.
///
/// `column` is only used to name the offending column in errors.
///
/// # Errors
/// Returns [`ConvertError::UnsupportedColumnType`] when the series holds a
/// representation outside the known numeric, text and temporal set.
pub fn upcast_numeric(column: &str, series: Series) -> Result<Series> {
    let (data, missing) = series.into_parts();
    let data = match data {
        ColumnData::Int8(v) => ColumnData::Float64(widen(&v)),
        ColumnData::Int16(v) => ColumnData::Float64(widen(&v)),
        ColumnData::Int32(v) => ColumnData::Float64(widen(&v)),
        ColumnData::Int64(v) => ColumnData::Float64(v.iter().map(|&x| x as f64).collect()),
        ColumnData::Float32(v) => ColumnData::Float64(widen(&v)),
        passthrough @ (ColumnData::Float64(_) | ColumnData::Text(_) | ColumnData::Temporal(_)) => {
            passthrough
        }
        ColumnData::Other { type_name, .. } => {
            return Err(ConvertError::UnsupportedColumnType {
                column: column.to_string(),
                type_name,
            });
        }
    };
    Ok(Series::from_parts(data, missing))
}

#[inline]
fn widen<T: Copy + Into<f64>>(values: &[T]) -> Vec<f64> {
    values.iter().map(|&x| x.into()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_widen_exactly() {
        let s = upcast_numeric("x", Series::new(ColumnData::Int32(vec![1, -2, 3]))).unwrap();
        assert_eq!(s.data(), &ColumnData::Float64(vec![1.0, -2.0, 3.0]));

        let s = upcast_numeric("x", Series::new(ColumnData::Int8(vec![i8::MIN, i8::MAX]))).unwrap();
        assert_eq!(s.data(), &ColumnData::Float64(vec![-128.0, 127.0]));

        let s = upcast_numeric("x", Series::new(ColumnData::Int16(vec![i16::MIN]))).unwrap();
        assert_eq!(s.data(), &ColumnData::Float64(vec![-32768.0]));

        let s = upcast_numeric("x", Series::new(ColumnData::Int64(vec![1 << 40]))).unwrap();
        assert_eq!(s.data(), &ColumnData::Float64(vec![1_099_511_627_776.0]));
    }

    #[test]
    fn float32_uses_native_promotion() {
        let s = upcast_numeric("x", Series::new(ColumnData::Float32(vec![0.1, 2.5]))).unwrap();
        assert_eq!(s.data(), &ColumnData::Float64(vec![f64::from(0.1f32), 2.5]));
    }

    #[test]
    fn mask_survives_unification() {
        let input = Series::new(ColumnData::Int16(vec![7, 0, 9])).with_missing(vec![false, true, false]);
        let s = upcast_numeric("x", input).unwrap();
        assert_eq!(s.missing(), Some(&[false, true, false][..]));
        assert_eq!(s.data(), &ColumnData::Float64(vec![7.0, 0.0, 9.0]));
    }

    #[test]
    fn text_and_temporal_are_untouched() {
        let text = Series::new(ColumnData::Text(vec!["a".into()]));
        assert_eq!(upcast_numeric("t", text.clone()).unwrap(), text);

        let ts = chrono::NaiveDate::from_ymd_opt(1960, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let temporal = Series::new(ColumnData::Temporal(vec![ts]));
        assert_eq!(upcast_numeric("d", temporal.clone()).unwrap(), temporal);
    }

    #[test]
    fn other_representation_is_rejected() {
        let err = upcast_numeric(
            "blob",
            Series::new(ColumnData::Other {
                type_name: "Binary".into(),
                len: 2,
            }),
        )
        .unwrap_err();
        match err {
            ConvertError::UnsupportedColumnType { column, type_name } => {
                assert_eq!(column, "blob");
                assert_eq!(type_name, "Binary");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
