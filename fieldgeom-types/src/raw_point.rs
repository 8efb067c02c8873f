use serde::{Deserialize, Serialize};

use crate::axis_order::AxisOrder;
use crate::geo::impls::GeoPoint2d;
use crate::geo::NewGeoPoint;

/// Coordinate pair as it was read from an encoding, before any axis meaning is assigned to its components.
///
/// Decoders produce raw points because the encodings themselves cannot be trusted to follow one axis convention.
/// Use [`RawPoint::resolve`] to turn a raw point into a geographic one once the order is known.
#[derive(Debug, Copy, Clone, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct RawPoint {
    /// First component as written by the producer.
    pub first: f64,
    /// Second component as written by the producer.
    pub second: f64,
}

impl RawPoint {
    /// Creates a new raw point.
    pub const fn new(first: f64, second: f64) -> Self {
        Self { first, second }
    }

    /// Both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.first.is_finite() && self.second.is_finite()
    }

    /// Same point with the components swapped.
    pub fn swapped(&self) -> Self {
        Self {
            first: self.second,
            second: self.first,
        }
    }

    /// Interprets the point with the given axis order.
    pub fn resolve(&self, order: AxisOrder) -> GeoPoint2d {
        match order {
            AxisOrder::LonLat => GeoPoint2d::lonlat(self.first, self.second),
            AxisOrder::LatLon => GeoPoint2d::latlon(self.first, self.second),
        }
    }
}

impl From<[f64; 2]> for RawPoint {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<(f64, f64)> for RawPoint {
    fn from((first, second): (f64, f64)) -> Self {
        Self::new(first, second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;

    #[test]
    fn resolve_respects_order() {
        let raw = RawPoint::new(57.6, -20.4);

        let p = raw.resolve(AxisOrder::LonLat);
        assert_eq!(p.lon(), 57.6);
        assert_eq!(p.lat(), -20.4);

        let p = raw.resolve(AxisOrder::LatLon);
        assert_eq!(p.lat(), 57.6);
        assert_eq!(p.lon(), -20.4);
    }

    #[test]
    fn swapped_resolves_to_same_point() {
        let raw = RawPoint::new(57.6, -20.4);
        assert_eq!(
            raw.resolve(AxisOrder::LonLat),
            raw.swapped().resolve(AxisOrder::LatLon)
        );
    }

    #[test]
    fn finiteness() {
        assert!(RawPoint::new(1.0, 2.0).is_finite());
        assert!(!RawPoint::new(f64::NAN, 2.0).is_finite());
        assert!(!RawPoint::new(1.0, f64::NEG_INFINITY).is_finite());
    }
}
