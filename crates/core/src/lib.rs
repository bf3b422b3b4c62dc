//! # fimkit-core
//!
//! Core raster primitives for the fimkit flood-inundation-mapping toolkit.
//!
//! This crate provides:
//! - `Raster<T>`: generic in-memory raster grid
//! - `GeoTransform`: affine transformation for georeferencing
//! - `Extent`: georeferenced bounding rectangle
//! - `Crs`: coordinate reference system identifier
//! - The I/O boundary traits (`RasterSource`, `RasterSink`) that persistent
//!   format drivers implement

pub mod crs;
pub mod error;
pub mod io;
pub mod raster;

pub use crs::Crs;
pub use error::{Error, Result};
pub use io::{RasterProfile, RasterSink, RasterSource, Window};
pub use raster::{Extent, GeoTransform, Raster, RasterElement};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::Crs;
    pub use crate::error::{Error, Result};
    pub use crate::io::{RasterProfile, RasterSink, RasterSource, Window};
    pub use crate::raster::{Extent, GeoTransform, Raster, RasterElement};
}
