//! Input raster descriptors and mutual-consistency validation

use fimkit_core::{Crs, Error, Extent, GeoTransform, RasterSource, Result};

/// Relative tolerance for resolution equality across inputs. Wide enough to
/// absorb floating round-off in geotransforms, far too tight to hide a real
/// resolution difference.
const RES_REL_TOL: f64 = 1e-7;

/// Pixel sizes below this magnitude are degenerate
const MIN_RES: f64 = 1e-10;

/// Georeferencing metadata of one input raster, extracted once at load.
///
/// Immutable for the duration of a run; the backing source stays open and is
/// released with the run, success or failure.
#[derive(Debug, Clone)]
pub struct RasterDescriptor {
    pub width: usize,
    pub height: usize,
    pub transform: GeoTransform,
    pub res_x: f64,
    pub res_y: f64,
    pub crs: Option<Crs>,
    pub nodata: Option<f64>,
    pub extent: Extent,
}

impl RasterDescriptor {
    /// Extract the descriptor of a single source.
    ///
    /// Fails with `DegenerateResolution` if either pixel size is effectively
    /// zero.
    pub fn describe(source: &dyn RasterSource) -> Result<Self> {
        let transform = source.transform();
        let width = source.width();
        let height = source.height();
        let res_x = transform.pixel_width;
        let res_y = transform.pixel_height;

        if res_x.abs() < MIN_RES || res_y.abs() < MIN_RES {
            return Err(Error::DegenerateResolution { res_x, res_y });
        }

        Ok(Self {
            width,
            height,
            transform,
            res_x,
            res_y,
            crs: source.crs(),
            nodata: source.nodata(),
            extent: transform.extent(width, height),
        })
    }
}

/// Extract descriptors for every source and validate mutual consistency.
///
/// All inputs must match the first input's per-axis resolution (within
/// [`RES_REL_TOL`] relative) and its CRS. Fails before any output I/O with
/// `EmptyInputSet`, `DegenerateResolution`, `ResolutionMismatch` or
/// `CrsMismatch`.
pub fn load_descriptors(sources: &[Box<dyn RasterSource>]) -> Result<Vec<RasterDescriptor>> {
    if sources.is_empty() {
        return Err(Error::EmptyInputSet);
    }

    let mut descriptors: Vec<RasterDescriptor> = Vec::with_capacity(sources.len());
    for source in sources {
        let descriptor = RasterDescriptor::describe(source.as_ref())?;

        if let Some(reference) = descriptors.first() {
            if !res_close(descriptor.res_x, reference.res_x)
                || !res_close(descriptor.res_y, reference.res_y)
            {
                return Err(Error::ResolutionMismatch {
                    base_x: reference.res_x,
                    base_y: reference.res_y,
                    found_x: descriptor.res_x,
                    found_y: descriptor.res_y,
                });
            }
            if !crs_equivalent(&descriptor.crs, &reference.crs) {
                return Err(Error::CrsMismatch(
                    crs_identifier(&reference.crs),
                    crs_identifier(&descriptor.crs),
                ));
            }
        }

        descriptors.push(descriptor);
    }

    Ok(descriptors)
}

fn res_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= RES_REL_TOL * a.abs().max(b.abs())
}

fn crs_equivalent(a: &Option<Crs>, b: &Option<Crs>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.is_equivalent(b),
        (None, None) => true,
        _ => false,
    }
}

fn crs_identifier(crs: &Option<Crs>) -> String {
    crs.as_ref()
        .map(Crs::identifier)
        .unwrap_or_else(|| "unknown".to_string())
}
