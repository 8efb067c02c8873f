use serde::{Deserialize, Serialize};

use crate::error::FieldGeomTypesError;
use crate::geo::GeoPoint;

/// Geographic bounding region, inclusive on all sides.
///
/// Used both as a plausibility region (where the data is expected to be) and as the extent of a ring.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoBounds {
    min_lon: f64,
    max_lon: f64,
    min_lat: f64,
    max_lat: f64,
}

impl GeoBounds {
    /// The island of Mauritius.
    pub const MAURITIUS: GeoBounds = GeoBounds {
        min_lon: 57.0,
        max_lon: 58.0,
        min_lat: -21.0,
        max_lat: -19.0,
    };

    /// The whole valid range of geographic coordinates.
    pub const WORLD: GeoBounds = GeoBounds {
        min_lon: -180.0,
        max_lon: 180.0,
        min_lat: -90.0,
        max_lat: 90.0,
    };

    /// Creates new bounds. Returns an error if any limit is not finite or a minimum exceeds its maximum.
    pub fn new(
        min_lon: f64,
        max_lon: f64,
        min_lat: f64,
        max_lat: f64,
    ) -> Result<Self, FieldGeomTypesError> {
        let bounds = Self {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        };

        if bounds.is_valid() {
            Ok(bounds)
        } else {
            Err(FieldGeomTypesError::InvalidBounds {
                min_lon,
                max_lon,
                min_lat,
                max_lat,
            })
        }
    }

    /// Bounds deserialized from untrusted configuration may be inverted, this checks them.
    pub fn is_valid(&self) -> bool {
        [self.min_lon, self.max_lon, self.min_lat, self.max_lat]
            .iter()
            .all(|v| v.is_finite())
            && self.min_lon <= self.max_lon
            && self.min_lat <= self.max_lat
    }

    /// Minimum longitude.
    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    /// Maximum longitude.
    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    /// Minimum latitude.
    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    /// Maximum latitude.
    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    /// Checks if the given coordinates are inside the bounds. NaN is never inside.
    pub fn contains_lonlat(&self, lon: f64, lat: f64) -> bool {
        self.min_lon <= lon && self.max_lon >= lon && self.min_lat <= lat && self.max_lat >= lat
    }

    /// Checks if the point is inside the bounds.
    pub fn contains(&self, point: &impl GeoPoint<Num = f64>) -> bool {
        self.contains_lonlat(point.lon(), point.lat())
    }

    /// Smallest bounds containing all the given points. Returns `None` for an empty iterator.
    pub fn from_points<'a, P: GeoPoint<Num = f64> + 'a>(
        mut points: impl Iterator<Item = &'a P>,
    ) -> Option<Self> {
        let first = points.next()?;
        let mut bounds = Self {
            min_lon: first.lon(),
            max_lon: first.lon(),
            min_lat: first.lat(),
            max_lat: first.lat(),
        };

        for p in points {
            bounds.min_lon = bounds.min_lon.min(p.lon());
            bounds.max_lon = bounds.max_lon.max(p.lon());
            bounds.min_lat = bounds.min_lat.min(p.lat());
            bounds.max_lat = bounds.max_lat.max(p.lat());
        }

        Some(bounds)
    }

    /// Width of the bounds in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Height of the bounds in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }
}
