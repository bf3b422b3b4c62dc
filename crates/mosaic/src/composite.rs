//! Maximum-value compositing with nodata-aware precedence
//!
//! The rule per pixel: missing data never overwrites present data; among
//! valid candidates the numerically larger value wins. The output nodata
//! sentinel acts as the minimum possible value for comparison purposes only,
//! which makes the update commutative and associative — input order cannot
//! change the result.

use crate::transform::is_valid;
use ndarray::{Array2, ArrayView2};

/// Merge one input sub-window into the block buffer.
///
/// `dst_row`/`dst_col` position the window inside the buffer; the caller
/// guarantees it fits (the overlap resolver clamps both sides).
pub fn composite_into(
    buffer: &mut Array2<f64>,
    window: ArrayView2<'_, f64>,
    dst_row: usize,
    dst_col: usize,
    nodata_in: Option<f64>,
    nodata_out: f64,
) {
    for ((r, c), &value) in window.indexed_iter() {
        if !is_valid(value, nodata_in) {
            continue;
        }
        let cell = &mut buffer[[dst_row + r, dst_col + c]];
        if *cell == nodata_out || value > *cell {
            *cell = value;
        }
    }
}
