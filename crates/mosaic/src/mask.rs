//! Vector clip mask
//!
//! Rasterizes a polygonal geometry at each block's exact grid alignment and
//! suppresses pixels outside the footprint. A strict intersection with the
//! composited values: the mask can only remove data, never add it.

use fimkit_core::{Error, GeoTransform, Result};
use geo::{Geometry, LineString, Polygon};
use ndarray::Array2;
use std::cmp::Ordering;

/// A polygonal clip mask shared by every block of a run.
#[derive(Debug, Clone)]
pub struct ClipMask {
    polygons: Vec<Polygon<f64>>,
}

impl ClipMask {
    /// Build a mask from a geometry.
    ///
    /// Fails with `MaskOpen` when the geometry carries no polygonal
    /// component; points and lines have no area to clip against.
    pub fn new(geometry: Geometry<f64>) -> Result<Self> {
        let polygons = collect_polygons(geometry);
        if polygons.is_empty() {
            return Err(Error::MaskOpen(
                "mask geometry has no polygonal component".to_string(),
            ));
        }
        Ok(Self { polygons })
    }

    /// Rasterize the mask at a block's transform and dimensions.
    ///
    /// Scanline even-odd fill with the pixel-center rule: a pixel is inside
    /// when its center falls within the polygon, matching the convention of
    /// standard vector burners.
    pub fn footprint(&self, transform: &GeoTransform, rows: usize, cols: usize) -> Array2<bool> {
        let mut footprint = Array2::from_elem((rows, cols), false);
        let mut crossings: Vec<f64> = Vec::new();

        for row in 0..rows {
            let y = transform.origin_y + (row as f64 + 0.5) * transform.pixel_height;

            crossings.clear();
            for ring in self.rings() {
                collect_crossings(ring, y, &mut crossings);
            }
            crossings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

            for span in crossings.chunks_exact(2) {
                let start = col_on_or_after(span[0], transform).min(cols);
                let end = col_on_or_after(span[1], transform).min(cols);
                for col in start..end {
                    footprint[[row, col]] = true;
                }
            }
        }

        footprint
    }

    /// Overwrite every pixel outside the footprint with the nodata sentinel.
    pub fn apply(&self, buffer: &mut Array2<f64>, transform: &GeoTransform, nodata: f64) {
        let (rows, cols) = buffer.dim();
        let footprint = self.footprint(transform, rows, cols);
        for ((r, c), &inside) in footprint.indexed_iter() {
            if !inside {
                buffer[[r, c]] = nodata;
            }
        }
    }

    fn rings(&self) -> impl Iterator<Item = &LineString<f64>> {
        self.polygons
            .iter()
            .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors().iter()))
    }
}

/// First column whose center x-coordinate is >= `x`
fn col_on_or_after(x: f64, transform: &GeoTransform) -> usize {
    let frac = (x - transform.origin_x) / transform.pixel_width - 0.5;
    frac.ceil().max(0.0) as usize
}

fn collect_polygons(geometry: Geometry<f64>) -> Vec<Polygon<f64>> {
    match geometry {
        Geometry::Polygon(p) => vec![p],
        Geometry::MultiPolygon(mp) => mp.0,
        Geometry::GeometryCollection(gc) => {
            gc.0.into_iter().flat_map(collect_polygons).collect()
        }
        _ => Vec::new(),
    }
}

/// X-coordinates where ring edges cross the horizontal line at `y`.
///
/// The half-open `(p.y > y) != (q.y > y)` rule counts each vertex crossing
/// exactly once, so spans pair up under even-odd filling.
fn collect_crossings(ring: &LineString<f64>, y: f64, out: &mut Vec<f64>) {
    for segment in ring.0.windows(2) {
        let (p, q) = (segment[0], segment[1]);
        if (p.y > y) != (q.y > y) {
            out.push(p.x + (y - p.y) * (q.x - p.x) / (q.y - p.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon, Point};

    fn unit_transform(rows: usize) -> GeoTransform {
        GeoTransform::new(0.0, rows as f64, 1.0, -1.0)
    }

    #[test]
    fn non_polygonal_geometry_is_rejected() {
        let err = ClipMask::new(Geometry::Point(Point::new(1.0, 1.0))).unwrap_err();
        assert!(matches!(err, Error::MaskOpen(_)));
    }

    #[test]
    fn square_footprint_burns_interior_centers() {
        let square = polygon![
            (x: 2.0, y: 2.0),
            (x: 6.0, y: 2.0),
            (x: 6.0, y: 6.0),
            (x: 2.0, y: 6.0),
            (x: 2.0, y: 2.0),
        ];
        let mask = ClipMask::new(Geometry::Polygon(square)).unwrap();
        let footprint = mask.footprint(&unit_transform(8), 8, 8);

        // rows 0..8 run north to south: y centers 7.5, 6.5, ..., 0.5
        let inside = |row: usize, col: usize| footprint[[row, col]];
        assert!(inside(2, 2) && inside(5, 5));
        assert!(!inside(1, 4) && !inside(6, 4));
        assert!(!inside(4, 1) && !inside(4, 6));

        let burned = footprint.iter().filter(|&&b| b).count();
        assert_eq!(burned, 16);
    }

    #[test]
    fn hole_is_left_out() {
        let donut = polygon![
            exterior: [
                (x: 0.0, y: 0.0),
                (x: 8.0, y: 0.0),
                (x: 8.0, y: 8.0),
                (x: 0.0, y: 8.0),
            ],
            interiors: [[
                (x: 3.0, y: 3.0),
                (x: 5.0, y: 3.0),
                (x: 5.0, y: 5.0),
                (x: 3.0, y: 5.0),
            ]],
        ];
        let mask = ClipMask::new(Geometry::Polygon(donut)).unwrap();
        let footprint = mask.footprint(&unit_transform(8), 8, 8);

        assert!(footprint[[0, 0]]);
        assert!(!footprint[[4, 4]], "hole center must stay unburned");
    }

    #[test]
    fn multipolygon_burns_each_part() {
        let left = polygon![
            (x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0),
        ];
        let right = polygon![
            (x: 6.0, y: 6.0), (x: 8.0, y: 6.0), (x: 8.0, y: 8.0), (x: 6.0, y: 8.0),
        ];
        let mask =
            ClipMask::new(Geometry::MultiPolygon(MultiPolygon(vec![left, right]))).unwrap();
        let footprint = mask.footprint(&unit_transform(8), 8, 8);

        assert!(footprint[[7, 0]]);
        assert!(footprint[[0, 7]]);
        assert!(!footprint[[4, 4]]);
    }

    #[test]
    fn apply_only_removes_data() {
        let square = polygon![
            (x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0),
        ];
        let mask = ClipMask::new(Geometry::Polygon(square)).unwrap();

        let mut buffer = Array2::from_elem((8, 8), 1.0);
        mask.apply(&mut buffer, &unit_transform(8), -9999.0);

        for ((r, c), &v) in buffer.indexed_iter() {
            let inside = r >= 4 && c < 4;
            if inside {
                assert_eq!(v, 1.0, "pixel ({r}, {c}) should survive the clip");
            } else {
                assert_eq!(v, -9999.0, "pixel ({r}, {c}) should be suppressed");
            }
        }
    }
}
