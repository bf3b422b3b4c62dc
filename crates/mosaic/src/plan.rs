//! Output grid planning

use crate::descriptor::RasterDescriptor;
use crate::tiler::Block;
use fimkit_core::{Crs, Error, Extent, GeoTransform, Result};
use serde::{Deserialize, Serialize};

/// Coordinate-to-pixel rounding: add 0.5, truncate.
///
/// This is a contract, not a free choice: the same rule is applied to output
/// dimensions and to both sides of every sub-window conversion, and changing
/// it shifts block boundaries by up to one pixel.
pub(crate) fn round_half_up(value: f64) -> usize {
    (value + 0.5) as usize
}

/// The planned output raster: union extent, reference resolution, dimensions
/// and affine transform. Created once per run, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputGrid {
    pub extent: Extent,
    pub res_x: f64,
    /// Always negative: the output is forced north-up
    pub res_y: f64,
    pub rows: usize,
    pub cols: usize,
    pub transform: GeoTransform,
    pub crs: Option<Crs>,
}

impl OutputGrid {
    /// Plan the output grid over a set of validated descriptors.
    ///
    /// The extent is the union of all input extents; the resolution is taken
    /// from the first descriptor (caller-supplied order) with the vertical
    /// pixel size forced negative.
    pub fn plan(descriptors: &[RasterDescriptor]) -> Result<Self> {
        let first = descriptors.first().ok_or(Error::EmptyInputSet)?;

        let extent = descriptors
            .iter()
            .skip(1)
            .fold(first.extent, |acc, d| acc.union(&d.extent));

        let res_x = first.res_x;
        let mut res_y = first.res_y;
        if res_y > 0.0 {
            res_y = -res_y;
        }

        let cols = round_half_up(extent.width() / res_x);
        let rows = round_half_up(extent.height() / res_y.abs());
        let transform = GeoTransform::new(extent.min_x, extent.max_y, res_x, res_y);

        Ok(Self {
            extent,
            res_x,
            res_y,
            rows,
            cols,
            transform,
            crs: first.crs.clone(),
        })
    }

    /// Georeferenced rectangle covered by a block of this grid
    pub fn block_extent(&self, block: &Block) -> Extent {
        let x0 = self.extent.min_x + block.col_off as f64 * self.res_x;
        let y0 = self.extent.max_y + block.row_off as f64 * self.res_y;
        let x1 = x0 + block.cols as f64 * self.res_x;
        let y1 = y0 + block.rows as f64 * self.res_y;
        Extent::new(x0, y1, x1, y0)
    }

    /// Affine transform of a block, aligned exactly with the output grid
    pub fn block_transform(&self, block: &Block) -> GeoTransform {
        let extent = self.block_extent(block);
        GeoTransform::new(extent.min_x, extent.max_y, self.res_x, self.res_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fimkit_core::Raster;

    fn descriptor(origin_x: f64, origin_y: f64, res: f64, size: usize) -> RasterDescriptor {
        let mut raster: Raster<f32> = Raster::new(size, size);
        raster.set_transform(GeoTransform::new(origin_x, origin_y, res, -res));
        raster.set_crs(Some(Crs::Epsg(4326)));
        RasterDescriptor::describe(&raster).unwrap()
    }

    #[test]
    fn rounding_is_half_up_truncate() {
        assert_eq!(round_half_up(10.4), 10);
        assert_eq!(round_half_up(10.5), 11);
        assert_eq!(round_half_up(10.6), 11);
        assert_eq!(round_half_up(0.0), 0);
    }

    #[test]
    fn plan_unions_extents() {
        let a = descriptor(0.0, 10.0, 1.0, 10);
        let b = descriptor(5.0, 15.0, 1.0, 10);
        let grid = OutputGrid::plan(&[a, b]).unwrap();

        assert_eq!(grid.extent, Extent::new(0.0, 0.0, 15.0, 15.0));
        assert_eq!(grid.cols, 15);
        assert_eq!(grid.rows, 15);
        assert_eq!(grid.transform.origin_x, 0.0);
        assert_eq!(grid.transform.origin_y, 15.0);
    }

    #[test]
    fn fractional_remainder_follows_rounding_contract() {
        // width 10.6 at res 1 picks up an extra edge column; 10.4 does not
        let mut wide = descriptor(0.0, 10.0, 1.0, 10);
        wide.extent.max_x = 10.6;
        let grid = OutputGrid::plan(&[wide.clone()]).unwrap();
        assert_eq!(grid.cols, 11);

        wide.extent.max_x = 10.4;
        let grid = OutputGrid::plan(&[wide]).unwrap();
        assert_eq!(grid.cols, 10);
    }

    #[test]
    fn vertical_resolution_forced_negative() {
        let mut desc = descriptor(0.0, 10.0, 1.0, 10);
        desc.res_y = 1.0;
        let grid = OutputGrid::plan(&[desc]).unwrap();
        assert_eq!(grid.res_y, -1.0);
        assert!(grid.transform.is_north_up());
    }

    #[test]
    fn empty_descriptor_set_is_rejected() {
        assert!(matches!(
            OutputGrid::plan(&[]),
            Err(Error::EmptyInputSet)
        ));
    }

    #[test]
    fn block_extent_alignment() {
        let grid = OutputGrid::plan(&[descriptor(0.0, 20.0, 1.0, 20)]).unwrap();
        let block = Block {
            row_off: 4,
            col_off: 8,
            rows: 6,
            cols: 5,
        };
        let e = grid.block_extent(&block);
        assert_eq!(e, Extent::new(8.0, 10.0, 13.0, 16.0));

        let t = grid.block_transform(&block);
        assert_eq!(t.origin_x, 8.0);
        assert_eq!(t.origin_y, 16.0);
        assert_eq!(t.pixel_height, -1.0);
    }
}
