//! Block tiling for bounded-memory processing

use fimkit_core::{Error, Result};

/// Default block edge size in pixels
pub const DEFAULT_BLOCK_SIZE: usize = 256;

/// A rectangular sub-region of the output grid.
///
/// Blocks are non-overlapping and cover the full grid when enumerated in
/// row-major order; edge blocks are truncated to the grid bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Row offset in the output grid
    pub row_off: usize,
    /// Column offset in the output grid
    pub col_off: usize,
    /// Number of rows in this block
    pub rows: usize,
    /// Number of columns in this block
    pub cols: usize,
}

/// Lazy row-major iterator over the blocks of a grid.
///
/// Finite and restartable: cloning yields a fresh pass over the same
/// tiling. Pure function of grid dimensions and edge size.
#[derive(Debug, Clone)]
pub struct Blocks {
    grid_rows: usize,
    grid_cols: usize,
    block_size: usize,
    next_row: usize,
    next_col: usize,
}

impl Blocks {
    /// Tile a `grid_cols` x `grid_rows` grid with square blocks of
    /// `block_size` pixels. Fails with `InvalidBlockSize` when the edge size
    /// is zero.
    pub fn new(grid_rows: usize, grid_cols: usize, block_size: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(Error::InvalidBlockSize(block_size));
        }
        Ok(Self {
            grid_rows,
            grid_cols,
            block_size,
            next_row: 0,
            next_col: 0,
        })
    }

    /// Total number of blocks in the tiling
    pub fn count_blocks(&self) -> usize {
        let per_axis = |len: usize| len.div_ceil(self.block_size);
        per_axis(self.grid_rows) * per_axis(self.grid_cols)
    }
}

impl Iterator for Blocks {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        if self.next_row >= self.grid_rows || self.grid_cols == 0 {
            return None;
        }

        let block = Block {
            row_off: self.next_row,
            col_off: self.next_col,
            rows: self.block_size.min(self.grid_rows - self.next_row),
            cols: self.block_size.min(self.grid_cols - self.next_col),
        };

        self.next_col += self.block_size;
        if self.next_col >= self.grid_cols {
            self.next_col = 0;
            self.next_row += self.block_size;
        }

        Some(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_block_size_is_rejected() {
        assert!(matches!(
            Blocks::new(10, 10, 0),
            Err(Error::InvalidBlockSize(0))
        ));
    }

    #[test]
    fn blocks_cover_grid_exactly_once() {
        let rows = 100;
        let cols = 70;
        let mut covered = vec![vec![0u8; cols]; rows];

        for block in Blocks::new(rows, cols, 32).unwrap() {
            for r in block.row_off..block.row_off + block.rows {
                for c in block.col_off..block.col_off + block.cols {
                    covered[r][c] += 1;
                }
            }
        }

        for r in 0..rows {
            for c in 0..cols {
                assert_eq!(covered[r][c], 1, "cell ({r}, {c}) covered {} times", covered[r][c]);
            }
        }
    }

    #[test]
    fn edge_blocks_are_truncated() {
        let blocks: Vec<Block> = Blocks::new(70, 100, 32).unwrap().collect();
        let last = blocks.last().unwrap();
        assert_eq!(last.row_off, 64);
        assert_eq!(last.col_off, 96);
        assert_eq!(last.rows, 6);
        assert_eq!(last.cols, 4);
    }

    #[test]
    fn row_major_order() {
        let blocks: Vec<Block> = Blocks::new(64, 64, 32).unwrap().collect();
        let offsets: Vec<(usize, usize)> =
            blocks.iter().map(|b| (b.row_off, b.col_off)).collect();
        assert_eq!(offsets, vec![(0, 0), (0, 32), (32, 0), (32, 32)]);
    }

    #[test]
    fn clone_restarts_the_sequence() {
        let mut blocks = Blocks::new(64, 64, 32).unwrap();
        let restart = blocks.clone();
        blocks.by_ref().for_each(drop);
        assert_eq!(blocks.next(), None);
        assert_eq!(restart.count(), 4);
    }

    #[test]
    fn count_matches_iteration() {
        let blocks = Blocks::new(768, 768, 256).unwrap();
        assert_eq!(blocks.count_blocks(), 9);
        assert_eq!(blocks.count(), 9);
    }

    #[test]
    fn empty_grid_yields_no_blocks() {
        assert_eq!(Blocks::new(0, 10, 32).unwrap().count(), 0);
        assert_eq!(Blocks::new(10, 0, 32).unwrap().count(), 0);
    }
}
