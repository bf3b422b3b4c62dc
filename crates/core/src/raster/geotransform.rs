//! Affine geotransformation for rasters

use crate::raster::Extent;
use serde::{Deserialize, Serialize};

/// Affine transformation coefficients for georeferencing rasters.
///
/// Maps pixel coordinates (col, row) to geographic coordinates (x, y):
/// ```text
/// x = origin_x + col * pixel_width + row * row_rotation
/// y = origin_y + col * col_rotation + row * pixel_height
/// ```
///
/// The engine only handles north-up grids: both rotation terms zero and
/// `pixel_height` negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Cell size in the X direction
    pub pixel_width: f64,
    /// Cell size in the Y direction (negative for north-up)
    pub pixel_height: f64,
    /// Rotation about the X axis (zero for north-up)
    pub row_rotation: f64,
    /// Rotation about the Y axis (zero for north-up)
    pub col_rotation: f64,
}

impl GeoTransform {
    /// Create a north-up transform (no rotation)
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            row_rotation: 0.0,
            col_rotation: 0.0,
        }
    }

    /// Create from a GDAL-style coefficient array
    /// `[origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height]`
    pub fn from_gdal(coeffs: [f64; 6]) -> Self {
        Self {
            origin_x: coeffs[0],
            pixel_width: coeffs[1],
            row_rotation: coeffs[2],
            origin_y: coeffs[3],
            col_rotation: coeffs[4],
            pixel_height: coeffs[5],
        }
    }

    /// Convert to a GDAL-style coefficient array
    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.col_rotation,
            self.pixel_height,
        ]
    }

    /// Geographic coordinates of a pixel's top-left corner
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        let col = col as f64;
        let row = row as f64;
        (
            self.origin_x + col * self.pixel_width + row * self.row_rotation,
            self.origin_y + col * self.col_rotation + row * self.pixel_height,
        )
    }

    /// Convert geographic coordinates to fractional pixel coordinates.
    ///
    /// Returns `(col, row)`; NaN for a degenerate transform.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let det = self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation;
        if det.abs() < 1e-12 {
            return (f64::NAN, f64::NAN);
        }

        let dx = x - self.origin_x;
        let dy = y - self.origin_y;
        (
            (self.pixel_height * dx - self.row_rotation * dy) / det,
            (-self.col_rotation * dx + self.pixel_width * dy) / det,
        )
    }

    /// Whether this is a north-up transform (no rotation, negative pixel height)
    pub fn is_north_up(&self) -> bool {
        self.row_rotation.abs() < 1e-12
            && self.col_rotation.abs() < 1e-12
            && self.pixel_height < 0.0
    }

    /// Cell size magnitude in the X direction
    pub fn cell_size(&self) -> f64 {
        self.pixel_width.abs()
    }

    /// Georeferenced extent of a raster of `cols` x `rows` pixels.
    ///
    /// Assumes a north-up transform: the origin is the top-left corner,
    /// `min_y` lies `rows * pixel_height` below it.
    pub fn extent(&self, cols: usize, rows: usize) -> Extent {
        let max_x = self.origin_x + self.pixel_width * cols as f64;
        let min_y = self.origin_y + self.pixel_height * rows as f64;
        Extent {
            min_x: self.origin_x,
            min_y,
            max_x,
            max_y: self.origin_y,
        }
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn geo_to_pixel_roundtrip() {
        let gt = GeoTransform::new(100.0, 200.0, 10.0, -10.0);
        let (x, y) = gt.pixel_to_geo(5, 10);
        let (col, row) = gt.geo_to_pixel(x, y);

        assert_relative_eq!(col, 5.0, epsilon = 1e-10);
        assert_relative_eq!(row, 10.0, epsilon = 1e-10);
    }

    #[test]
    fn extent_of_north_up_grid() {
        let gt = GeoTransform::new(0.0, 45.0, 0.001, -0.001);
        let e = gt.extent(768, 768);

        assert_relative_eq!(e.min_x, 0.0);
        assert_relative_eq!(e.max_x, 0.768, epsilon = 1e-12);
        assert_relative_eq!(e.max_y, 45.0);
        assert_relative_eq!(e.min_y, 44.232, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_transform_yields_nan() {
        let gt = GeoTransform::new(0.0, 0.0, 0.0, 0.0);
        let (col, row) = gt.geo_to_pixel(1.0, 1.0);
        assert!(col.is_nan() && row.is_nan());
    }
}
