//! The mosaic engine
//!
//! Drives the pipeline: load descriptors → plan the output grid → tile into
//! blocks; per block resolve overlaps, transform, composite, clip, write.
//! Exactly one terminal outcome is observable: either every block is written
//! and the sink finishes, or the sink is discarded and the error surfaces.

use crate::composite::composite_into;
use crate::descriptor::{load_descriptors, RasterDescriptor};
use crate::mask::ClipMask;
use crate::plan::OutputGrid;
use crate::tiler::{Block, Blocks, DEFAULT_BLOCK_SIZE};
use crate::transform::BandTransform;
use crate::window::resolve;
use fimkit_core::io::{Compression, RasterProfile, SampleType};
use fimkit_core::{RasterSink, RasterSource, Result};
use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Output flavor of a FIM mosaic.
///
/// Selects the destination sample type, the nodata sentinel and the default
/// band transform in one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FimType {
    /// Continuous water depth: Float32, nodata −9999, values pass through
    Depth,
    /// Binary inundation extent: UInt8, nodata 255, inputs binarized
    Extent,
}

impl FimType {
    /// Output nodata sentinel
    pub fn nodata(self) -> f64 {
        match self {
            FimType::Depth => -9999.0,
            FimType::Extent => 255.0,
        }
    }

    /// Output sample type
    pub fn sample_type(self) -> SampleType {
        match self {
            FimType::Depth => SampleType::Float32,
            FimType::Extent => SampleType::UInt8,
        }
    }

    /// Default per-input band transform
    pub fn band_transform(self) -> BandTransform {
        match self {
            FimType::Depth => BandTransform::Identity,
            FimType::Extent => BandTransform::Binarize,
        }
    }
}

/// Configuration of one mosaic run
#[derive(Debug, Clone)]
pub struct MosaicParams {
    pub fim_type: FimType,
    /// Block edge size in pixels
    pub block_size: usize,
    /// Override the fim-type default band transform
    pub transform: Option<BandTransform>,
    /// Optional polygonal clip applied per block
    pub mask: Option<ClipMask>,
    /// Destination compression
    pub compression: Compression,
}

impl Default for MosaicParams {
    fn default() -> Self {
        Self {
            fim_type: FimType::Depth,
            block_size: DEFAULT_BLOCK_SIZE,
            transform: None,
            mask: None,
            compression: Compression::Lzw,
        }
    }
}

/// Block-wise maximum-value mosaicking engine
#[derive(Debug, Clone, Default)]
pub struct Mosaicker {
    params: MosaicParams,
}

impl Mosaicker {
    pub fn new(params: MosaicParams) -> Self {
        Self { params }
    }

    /// Run the mosaic block-sequentially.
    ///
    /// Validates all inputs before the sink is opened; on any later failure
    /// the sink is discarded so no partial output claims success.
    pub fn run(
        &self,
        sources: &[Box<dyn RasterSource>],
        sink: &mut dyn RasterSink,
    ) -> Result<()> {
        let (descriptors, grid, blocks) = self.prepare(sources)?;
        sink.open(&self.profile(&grid))?;

        let outcome = (|| {
            let mut written = 0usize;
            for block in blocks {
                let buffer = self.fill_block(sources, &descriptors, &grid, &block)?;
                sink.write_block(block.row_off, block.col_off, buffer.view())?;
                written += 1;
            }
            sink.finish()?;
            Ok(written)
        })();

        match outcome {
            Ok(written) => {
                info!(blocks = written, "mosaic complete");
                Ok(())
            }
            Err(err) => {
                sink.discard();
                Err(err)
            }
        }
    }

    /// Run the mosaic with block buffers computed across rayon workers.
    ///
    /// Per-block work is independent, so buffers are filled in parallel in
    /// bounded batches while writes stay serialized on the caller's thread.
    /// Sources are read through shared references; a source whose read handle
    /// cannot be shared across threads should go through [`Mosaicker::run`].
    pub fn run_parallel(
        &self,
        sources: &[Box<dyn RasterSource>],
        sink: &mut dyn RasterSink,
    ) -> Result<()> {
        let (descriptors, grid, blocks) = self.prepare(sources)?;
        sink.open(&self.profile(&grid))?;

        let batch = rayon::current_num_threads().max(1) * 4;
        let blocks: Vec<Block> = blocks.collect();

        let outcome = (|| {
            for chunk in blocks.chunks(batch) {
                let buffers: Vec<(Block, Array2<f64>)> = chunk
                    .par_iter()
                    .map(|block| {
                        self.fill_block(sources, &descriptors, &grid, block)
                            .map(|buffer| (*block, buffer))
                    })
                    .collect::<Result<_>>()?;

                for (block, buffer) in buffers {
                    sink.write_block(block.row_off, block.col_off, buffer.view())?;
                }
            }
            sink.finish()
        })();

        if let Err(err) = outcome {
            sink.discard();
            return Err(err);
        }
        info!(blocks = blocks.len(), "mosaic complete");
        Ok(())
    }

    /// Validate inputs and plan the run. No output I/O happens in here.
    fn prepare(
        &self,
        sources: &[Box<dyn RasterSource>],
    ) -> Result<(Vec<RasterDescriptor>, OutputGrid, Blocks)> {
        let descriptors = load_descriptors(sources)?;
        let grid = OutputGrid::plan(&descriptors)?;
        let blocks = Blocks::new(grid.rows, grid.cols, self.params.block_size)?;
        debug!(
            inputs = descriptors.len(),
            rows = grid.rows,
            cols = grid.cols,
            blocks = blocks.count_blocks(),
            "planned mosaic grid"
        );
        Ok((descriptors, grid, blocks))
    }

    fn profile(&self, grid: &OutputGrid) -> RasterProfile {
        RasterProfile {
            rows: grid.rows,
            cols: grid.cols,
            transform: grid.transform,
            crs: grid.crs.clone(),
            nodata: self.params.fim_type.nodata(),
            sample_type: self.params.fim_type.sample_type(),
            compression: self.params.compression,
            block_size: self.params.block_size,
        }
    }

    fn band_transform(&self) -> BandTransform {
        self.params
            .transform
            .unwrap_or_else(|| self.params.fim_type.band_transform())
    }

    /// Composite every overlapping input into one block buffer and clip it.
    fn fill_block(
        &self,
        sources: &[Box<dyn RasterSource>],
        descriptors: &[RasterDescriptor],
        grid: &OutputGrid,
        block: &Block,
    ) -> Result<Array2<f64>> {
        let nodata_out = self.params.fim_type.nodata();
        let mut buffer = Array2::from_elem((block.rows, block.cols), nodata_out);

        for (descriptor, source) in descriptors.iter().zip(sources) {
            let Some(overlap) = resolve(grid, block, descriptor) else {
                continue;
            };

            let mut window = source.read_window(overlap.src)?;
            self.band_transform().apply(&mut window, descriptor.nodata);
            composite_into(
                &mut buffer,
                window.view(),
                overlap.dst_row,
                overlap.dst_col,
                descriptor.nodata,
                nodata_out,
            );
        }

        if let Some(mask) = &self.params.mask {
            mask.apply(&mut buffer, &grid.block_transform(block), nodata_out);
        }

        Ok(buffer)
    }
}
