//! Overlap resolution between output blocks and input rasters
//!
//! Maps the georeferenced intersection of a block and an input extent into an
//! input-space read window and the block-local offset where it lands. Both
//! conversions use the same +0.5 truncating rounding rule; that symmetry is
//! what keeps the sub-window shape identical on both sides.

use crate::descriptor::RasterDescriptor;
use crate::plan::{round_half_up, OutputGrid};
use crate::tiler::Block;
use fimkit_core::Window;

/// Where an input raster's pixels land within one output block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    /// Input-space sub-window to read
    pub src: Window,
    /// Row within the block where the window's first row lands
    pub dst_row: usize,
    /// Column within the block where the window's first column lands
    pub dst_col: usize,
}

/// Resolve the overlap of `block` with one input raster.
///
/// Returns `None` when the block's rectangle is disjoint from the input's
/// extent; the test is strict, so extents that only share an edge do not
/// overlap. Window sizes are clamped to what both the input and the block can
/// hold.
pub fn resolve(grid: &OutputGrid, block: &Block, desc: &RasterDescriptor) -> Option<Overlap> {
    let block_extent = grid.block_extent(block);
    let isect = block_extent.intersection(&desc.extent)?;

    // Input-space window via the input's own transform
    let src_col = round_half_up((isect.min_x - desc.extent.min_x) / desc.res_x);
    let src_row = round_half_up((desc.extent.max_y - isect.max_y) / desc.res_y.abs());
    let src_cols = round_half_up(isect.width() / desc.res_x);
    let src_rows = round_half_up(isect.height() / desc.res_y.abs());

    // Block-local landing offset via the output transform, same rounding
    let dst_col = round_half_up((isect.min_x - block_extent.min_x) / grid.res_x);
    let dst_row = round_half_up((block_extent.max_y - isect.max_y) / grid.res_y.abs());

    if src_col >= desc.width
        || src_row >= desc.height
        || dst_col >= block.cols
        || dst_row >= block.rows
    {
        return None;
    }

    let cols = src_cols
        .min(desc.width - src_col)
        .min(block.cols - dst_col);
    let rows = src_rows
        .min(desc.height - src_row)
        .min(block.rows - dst_row);
    if cols == 0 || rows == 0 {
        return None;
    }

    Some(Overlap {
        src: Window::new(src_col, src_row, cols, rows),
        dst_row,
        dst_col,
    })
}
