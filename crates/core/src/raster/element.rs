//! Raster element trait for generic cell values

use num_traits::{NumCast, Zero};
use std::fmt::{Debug, Display};

/// Trait for types that can be stored in a raster cell.
///
/// Elevation, direction and accumulation grids are all integer rasters,
/// but the container stays generic so collaborators can load other sample
/// types and cast them.
pub trait RasterElement:
    Copy + Debug + Display + PartialOrd + PartialEq + NumCast + Zero + Send + Sync + 'static
{
    /// Whether this type is a floating point type
    fn is_float() -> bool;

    /// Cast an arbitrary numeric sample into this type.
    ///
    /// Floating point samples are rounded down before the cast so that
    /// fractional elevations land in the integer bucket below them.
    fn from_sample<S: NumCast + Copy>(sample: S) -> Option<Self> {
        let value: f64 = NumCast::from(sample)?;
        if Self::is_float() {
            NumCast::from(value)
        } else {
            NumCast::from(value.floor())
        }
    }
}

macro_rules! impl_raster_element {
    ($t:ty, $float:expr) => {
        impl RasterElement for $t {
            fn is_float() -> bool {
                $float
            }
        }
    };
}

impl_raster_element!(i8, false);
impl_raster_element!(i16, false);
impl_raster_element!(i32, false);
impl_raster_element!(i64, false);
impl_raster_element!(u8, false);
impl_raster_element!(u16, false);
impl_raster_element!(u32, false);
impl_raster_element!(u64, false);
impl_raster_element!(f32, true);
impl_raster_element!(f64, true);
