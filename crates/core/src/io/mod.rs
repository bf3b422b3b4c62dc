//! I/O boundary for raster datasets
//!
//! Persistent format drivers (GeoTIFF, cloud object stores, ...) live outside
//! this workspace; they plug in by implementing [`RasterSource`] and
//! [`RasterSink`]. The in-memory `Raster<T>` implements the source side
//! directly, and [`MemorySink`] implements the sink side, which is what the
//! test suite runs against.

mod memory;

pub use memory::MemorySink;

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use ndarray::{s, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// A rectangular pixel-space sub-window of a source raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub col_off: usize,
    pub row_off: usize,
    pub cols: usize,
    pub rows: usize,
}

impl Window {
    pub fn new(col_off: usize, row_off: usize, cols: usize, rows: usize) -> Self {
        Self {
            col_off,
            row_off,
            cols,
            rows,
        }
    }
}

/// Output sample type of a mosaic destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleType {
    /// Unsigned byte, used for binary extent outputs
    UInt8,
    /// 32-bit float, used for continuous depth outputs
    Float32,
}

/// On-disk compression of a mosaic destination.
///
/// Advisory for sinks without a persistent representation (memory sinks
/// ignore it); file-backed drivers honor it when creating the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compression {
    None,
    /// LZW with horizontal differencing predictor
    Lzw,
}

/// Destination metadata, finalized once when the sink is opened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterProfile {
    pub rows: usize,
    pub cols: usize,
    pub transform: GeoTransform,
    pub crs: Option<Crs>,
    pub nodata: f64,
    pub sample_type: SampleType,
    pub compression: Compression,
    /// Block-aligned layout edge size
    pub block_size: usize,
}

/// Read side of the raster I/O boundary.
///
/// Pixel values surface as f64 regardless of the stored sample type (the
/// GDAL `ReadAsArray` convention); compositing narrows back to the output
/// sample type at write time.
pub trait RasterSource: Send + Sync {
    /// Width in pixels
    fn width(&self) -> usize;

    /// Height in pixels
    fn height(&self) -> usize;

    /// Affine geotransform
    fn transform(&self) -> GeoTransform;

    /// Coordinate reference system, if georeferenced
    fn crs(&self) -> Option<Crs>;

    /// Nodata sentinel, if declared
    fn nodata(&self) -> Option<f64>;

    /// Read a sub-window of the single band as f64
    fn read_window(&self, window: Window) -> Result<Array2<f64>>;
}

impl<T: RasterElement> RasterSource for Raster<T> {
    fn width(&self) -> usize {
        self.cols()
    }

    fn height(&self) -> usize {
        self.rows()
    }

    fn transform(&self) -> GeoTransform {
        *Raster::transform(self)
    }

    fn crs(&self) -> Option<Crs> {
        Raster::crs(self).cloned()
    }

    fn nodata(&self) -> Option<f64> {
        Raster::nodata(self).map(|nd| nd.to_f64())
    }

    fn read_window(&self, window: Window) -> Result<Array2<f64>> {
        let (rows, cols) = self.shape();
        let row_end = window.row_off + window.rows;
        let col_end = window.col_off + window.cols;
        if row_end > rows || col_end > cols {
            return Err(Error::WindowOutOfBounds {
                col_off: window.col_off,
                row_off: window.row_off,
                win_cols: window.cols,
                win_rows: window.rows,
                rows,
                cols,
            });
        }

        let view = self
            .view()
            .slice_move(s![window.row_off..row_end, window.col_off..col_end]);
        // Qualified so the by-value cast is picked over ToPrimitive::to_f64,
        // which also applies through the NumCast supertrait and returns Option
        Ok(view.map(|v| RasterElement::to_f64(*v)))
    }
}

/// Write side of the raster I/O boundary.
///
/// The engine opens the sink once with the finalized profile, streams
/// non-overlapping blocks, then calls `finish`. On any failure it calls
/// `discard` instead, so a partial destination never claims success.
pub trait RasterSink {
    /// Create the destination with its finalized metadata
    fn open(&mut self, profile: &RasterProfile) -> Result<()>;

    /// Write one block at the given pixel offset
    fn write_block(&mut self, row_off: usize, col_off: usize, data: ArrayView2<'_, f64>)
        -> Result<()>;

    /// Flush and mark the destination complete
    fn finish(&mut self) -> Result<()>;

    /// Drop any partially written destination
    fn discard(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_source_reads_window_as_f64() {
        let mut r: Raster<u8> = Raster::from_vec((0..12).collect(), 3, 4).unwrap();
        r.set_nodata(Some(255));

        let win = r.read_window(Window::new(1, 1, 2, 2)).unwrap();
        assert_eq!(win.shape(), &[2, 2]);
        assert_eq!(win[[0, 0]], 5.0);
        assert_eq!(win[[1, 1]], 10.0);
        assert_eq!(RasterSource::nodata(&r), Some(255.0));
    }

    #[test]
    fn out_of_bounds_window_is_rejected() {
        let r: Raster<u8> = Raster::new(3, 4);
        let err = r.read_window(Window::new(2, 0, 3, 1)).unwrap_err();
        assert!(matches!(err, Error::WindowOutOfBounds { .. }));
    }
}
