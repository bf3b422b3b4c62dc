//! Raster element trait for generic cell values

use num_traits::{NumCast, Zero};
use std::fmt::Debug;

/// Trait for types that can be stored in a raster cell.
///
/// Compositing runs in f64 (the widest sample type any supported input
/// uses), so elements must cast losslessly to f64 and fallibly back.
pub trait RasterElement:
    Copy + Clone + Debug + PartialOrd + PartialEq + NumCast + Zero + Send + Sync + 'static
{
    /// Cast to f64. All supported element types fit in an f64 mantissa.
    fn to_f64(self) -> f64 {
        num_traits::cast(self).unwrap_or(f64::NAN)
    }

    /// Cast from f64; `None` when the value is not representable.
    fn from_f64(value: f64) -> Option<Self> {
        num_traits::cast(value)
    }
}

impl RasterElement for u8 {}
impl RasterElement for u16 {}
impl RasterElement for u32 {}
impl RasterElement for i16 {}
impl RasterElement for i32 {}
impl RasterElement for f32 {}
impl RasterElement for f64 {}
