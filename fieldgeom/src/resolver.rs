//! Decides which component of a decoded point is longitude.
//!
//! Producers of the stored geometries do not agree on the axis order: the binary encoding says `x` is easting, but
//! some rows were written with latitude in `x`. The resolver interprets the points both ways and picks the
//! interpretation that puts more points inside the region where the data is expected to be.

use std::cmp::Ordering;

use fieldgeom_types::{AxisOrder, GeoBounds, GeoPoint2d, RawPoint};

use crate::error::AxisOrderError;

/// Points with a decided axis order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRing {
    /// Points in input order, as `(lon, lat)`.
    pub points: Vec<GeoPoint2d>,
    /// Axis order the input turned out to use.
    pub order: AxisOrder,
    /// Number of points inside the bounds with this order.
    pub in_bounds: usize,
}

/// Picks the axis order of raw points using a plausibility region.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AxisOrderResolver {
    bounds: GeoBounds,
}

impl AxisOrderResolver {
    /// Creates a new resolver for data expected inside `bounds`.
    pub fn new(bounds: GeoBounds) -> Self {
        Self { bounds }
    }

    /// Plausibility region.
    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    /// Number of points that fall inside the bounds when read with the given order.
    pub fn count_in_bounds(&self, points: &[RawPoint], order: AxisOrder) -> usize {
        points
            .iter()
            .filter(|p| self.bounds.contains(&p.resolve(order)))
            .count()
    }

    /// Resolves the axis order. A tie between the two orders is an error.
    pub fn resolve(&self, points: &[RawPoint]) -> Result<ResolvedRing, AxisOrderError> {
        self.resolve_with_hint(points, None)
    }

    /// Resolves the axis order, using `hint` only if both orders are equally plausible.
    pub fn resolve_with_hint(
        &self,
        points: &[RawPoint],
        hint: Option<AxisOrder>,
    ) -> Result<ResolvedRing, AxisOrderError> {
        let lon_lat = self.count_in_bounds(points, AxisOrder::LonLat);
        let lat_lon = self.count_in_bounds(points, AxisOrder::LatLon);

        if lon_lat == 0 && lat_lon == 0 {
            return Err(AxisOrderError::NoPlausibleOrdering);
        }

        let (order, in_bounds) = match lon_lat.cmp(&lat_lon) {
            Ordering::Greater => (AxisOrder::LonLat, lon_lat),
            Ordering::Less => (AxisOrder::LatLon, lat_lon),
            Ordering::Equal => match hint {
                Some(order) => {
                    log::debug!("Both axis orders fit {lon_lat} points, using hint {order}");
                    (order, lon_lat)
                }
                None => return Err(AxisOrderError::Ambiguous { in_bounds: lon_lat }),
            },
        };

        log::debug!(
            "Resolved axis order {order}: {lon_lat} points fit as lon-lat, {lat_lon} as lat-lon, of {}",
            points.len()
        );

        Ok(ResolvedRing {
            points: points.iter().map(|p| p.resolve(order)).collect(),
            order,
            in_bounds,
        })
    }
}
