//! # fimkit-mosaic
//!
//! Composites many georeferenced single-band rasters that share one CRS and
//! one pixel resolution into a single output raster, using bounded memory via
//! block-wise processing, maximum-value compositing with nodata-aware
//! precedence, and an optional vector clip mask.
//!
//! The engine never reprojects or resamples: inputs are assumed pre-aligned.
//! Pipeline: descriptor loading → output grid planning → block tiling; per
//! block: overlap resolution → band transform → compositing → optional clip →
//! write.
//!
//! ```ignore
//! use fimkit_core::io::MemorySink;
//! use fimkit_mosaic::{FimType, MosaicParams, Mosaicker};
//!
//! let params = MosaicParams { fim_type: FimType::Depth, ..Default::default() };
//! let mut sink = MemorySink::<f32>::new();
//! Mosaicker::new(params).run(&sources, &mut sink)?;
//! let depth = sink.into_raster().expect("finished run");
//! ```

pub mod composite;
pub mod descriptor;
pub mod engine;
pub mod mask;
pub mod plan;
pub mod tiler;
pub mod transform;
pub mod window;

pub use descriptor::{load_descriptors, RasterDescriptor};
pub use engine::{FimType, MosaicParams, Mosaicker};
pub use mask::ClipMask;
pub use plan::OutputGrid;
pub use tiler::{Block, Blocks, DEFAULT_BLOCK_SIZE};
pub use transform::BandTransform;
pub use window::{resolve, Overlap};
