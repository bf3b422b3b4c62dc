//! Per-input band transforms

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Whether a pixel carries a measurement.
///
/// NaN never counts as valid, and a pixel equal to the input's declared
/// nodata sentinel is excluded from every comparison downstream.
pub(crate) fn is_valid(value: f64, nodata: Option<f64>) -> bool {
    if value.is_nan() {
        return false;
    }
    match nodata {
        Some(nd) => value != nd,
        None => true,
    }
}

/// Pure per-input preprocessing applied to a freshly read sub-window before
/// compositing. Only pixels that are valid under the input's own nodata
/// sentinel are touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandTransform {
    /// Pass values through unchanged
    Identity,
    /// Valid nonzero → 1, valid zero → 0, nodata untouched
    Binarize,
}

impl BandTransform {
    pub fn apply(&self, window: &mut Array2<f64>, nodata: Option<f64>) {
        match self {
            BandTransform::Identity => {}
            BandTransform::Binarize => {
                for value in window.iter_mut() {
                    if is_valid(*value, nodata) {
                        *value = if *value != 0.0 { 1.0 } else { 0.0 };
                    }
                }
            }
        }
    }
}
