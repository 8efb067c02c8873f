//! Concrete geographic point type.

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use crate::geo::traits::{GeoPoint, NewGeoPoint};

/// 2d point on the surface of the Earth. Stored in `(longitude, latitude)` order.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct GeoPoint2d {
    lon: f64,
    lat: f64,
}

impl GeoPoint for GeoPoint2d {
    type Num = f64;

    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }
}

impl NewGeoPoint<f64> for GeoPoint2d {
    fn latlon(lat: f64, lon: f64) -> Self {
        Self { lon, lat }
    }
}

impl GeoPoint2d {
    /// Creates a new point from another one.
    pub fn from(other: &impl GeoPoint<Num = f64>) -> Self {
        Self {
            lon: other.lon(),
            lat: other.lat(),
        }
    }

    /// Coordinates as `[lon, lat]`.
    pub fn to_lonlat(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    /// Coordinates as `[lat, lon]`.
    pub fn to_latlon(&self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}

/// Formats the point for display as `lat°, lon°` with 6 decimal places.
impl std::fmt::Display for GeoPoint2d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}°, {:.6}°", self.lat, self.lon)
    }
}

impl AbsDiffEq for GeoPoint2d {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.lon.abs_diff_eq(&other.lon, epsilon) && self.lat.abs_diff_eq(&other.lat, epsilon)
    }
}

impl RelativeEq for GeoPoint2d {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.lon.relative_eq(&other.lon, epsilon, max_relative)
            && self.lat.relative_eq(&other.lat, epsilon, max_relative)
    }
}

/// Creates a new [`GeoPoint2d`] from latitude and longitude values (in degrees).
///
/// ```
/// use fieldgeom_types::geo::GeoPoint;
/// use fieldgeom_types::latlon;
///
/// let point = latlon!(-20.2, 57.6);
/// assert_eq!(point.lat(), -20.2);
/// ```
#[macro_export]
macro_rules! latlon {
    ($lat:expr, $lon:expr) => {
        <$crate::geo::impls::GeoPoint2d as $crate::geo::NewGeoPoint<f64>>::latlon($lat, $lon)
    };
}

/// Creates a new [`GeoPoint2d`] from longitude and latitude values (in degrees).
///
/// ```
/// use fieldgeom_types::geo::GeoPoint;
/// use fieldgeom_types::lonlat;
///
/// let point = lonlat!(57.6, -20.2);
/// assert_eq!(point.lon(), 57.6);
/// ```
#[macro_export]
macro_rules! lonlat {
    ($lon:expr, $lat:expr) => {
        <$crate::geo::impls::GeoPoint2d as $crate::geo::NewGeoPoint<f64>>::lonlat($lon, $lat)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_lat_first() {
        let p = GeoPoint2d::lonlat(57.652557, -20.437995);
        assert_eq!(p.to_string(), "-20.437995°, 57.652557°");
    }

    #[test]
    fn macros_agree() {
        assert_eq!(latlon!(-20.0, 57.0), lonlat!(57.0, -20.0));
    }

    #[test]
    fn coord_eq_rejects_nan() {
        let p = GeoPoint2d::lonlat(f64::NAN, 1.0);
        assert!(!p.coord_eq(&p));
        assert!(lonlat!(1.0, 2.0).coord_eq(&lonlat!(1.0, 2.0)));
    }
}
