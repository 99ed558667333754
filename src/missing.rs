//! Missing-value overlay consulted before a cell is formatted.

/// Borrowed view of a column's missing mask for one batch.
///
/// A column without a mask never reports a missing cell, and checking it
/// touches no memory beyond the `Option` itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingMask<'a>(Option<&'a [bool]>);

impl<'a> MissingMask<'a> {
    pub fn new(mask: Option<&'a [bool]>) -> Self {
        Self(mask)
    }

    /// `true` when row `row` of the column is logically absent.
    #[inline]
    pub fn is_missing(&self, row: usize) -> bool {
        matches!(self.0, Some(mask) if mask[row])
    }
}
