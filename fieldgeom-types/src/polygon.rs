use std::collections::HashSet;

use serde::Serialize;

use crate::bounds::GeoBounds;
use crate::error::FieldGeomTypesError;
use crate::geo::impls::GeoPoint2d;
use crate::geo::GeoPoint;
use crate::ring::ClosedRing;

/// Single-ring polygon in canonical `(longitude, latitude)` order.
///
/// The ring is stored closed: the last point is coordinate-equal to the first one. A value of this type always has
/// at least three distinct vertices, and every point is finite and inside the bounds the polygon was built with, so
/// metrics computed from it never hit a degenerate case. The polygon is immutable; operations that change it return
/// a new value.
///
/// Field data is normally turned into a polygon by the `BoundsValidator` of the `fieldgeom` crate, which also drops
/// the offending points and closes open rings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "Vec<GeoPoint2d>")]
pub struct CanonicalPolygon {
    points: Vec<GeoPoint2d>,
}

impl CanonicalPolygon {
    /// Creates a polygon from an already closed ring of points, all of which must lie inside `bounds`.
    pub fn new(points: Vec<GeoPoint2d>, bounds: &GeoBounds) -> Result<Self, FieldGeomTypesError> {
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(FieldGeomTypesError::NonFinite { index });
        }
        if let Some(index) = points.iter().position(|p| !bounds.contains(p)) {
            return Err(FieldGeomTypesError::OutOfBounds { index });
        }

        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Err(FieldGeomTypesError::TooFewVertices { distinct: 0 });
        };
        if !first.coord_eq(last) {
            return Err(FieldGeomTypesError::NotClosed);
        }

        let distinct = count_distinct(&points);
        if distinct < 3 {
            return Err(FieldGeomTypesError::TooFewVertices { distinct });
        }

        Ok(Self { points })
    }

    /// All points of the ring, including the closing one.
    pub fn points(&self) -> &[GeoPoint2d] {
        &self.points
    }

    /// Points of the ring without the closing one.
    pub fn vertices(&self) -> &[GeoPoint2d] {
        &self.points[..self.points.len() - 1]
    }

    /// Number of stored points, including the closing one.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`, present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consumes the polygon and returns its closed ring.
    pub fn into_points(self) -> Vec<GeoPoint2d> {
        self.points
    }

    /// New polygon with the opposite winding. The starting vertex is kept.
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Smallest bounds containing the ring.
    pub fn extent(&self) -> GeoBounds {
        // The ring is never empty.
        GeoBounds::from_points(self.points.iter()).unwrap_or(GeoBounds::WORLD)
    }
}

impl ClosedRing for CanonicalPolygon {
    type Point = GeoPoint2d;

    fn iter_vertices(&self) -> impl Iterator<Item = &'_ GeoPoint2d> {
        self.vertices().iter()
    }
}

impl From<CanonicalPolygon> for Vec<GeoPoint2d> {
    fn from(value: CanonicalPolygon) -> Self {
        value.points
    }
}

/// Number of coordinate-distinct points in the slice. `-0.0` and `0.0` are the same coordinate.
pub fn count_distinct(points: &[impl GeoPoint<Num = f64>]) -> usize {
    points
        .iter()
        .map(|p| ((p.lon() + 0.0).to_bits(), (p.lat() + 0.0).to_bits()))
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lonlat;
    use crate::ring::Winding;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    fn square() -> Vec<GeoPoint2d> {
        vec![
            lonlat!(57.0, -20.0),
            lonlat!(57.1, -20.0),
            lonlat!(57.1, -19.9),
            lonlat!(57.0, -19.9),
            lonlat!(57.0, -20.0),
        ]
    }

    #[test]
    fn accepts_closed_ring() {
        let polygon = CanonicalPolygon::new(square(), &GeoBounds::MAURITIUS).unwrap();
        assert_eq!(polygon.len(), 5);
        assert_eq!(polygon.vertices().len(), 4);
        assert_eq!(polygon.iter_points_closing().count(), 5);
    }

    #[test]
    fn rejects_open_ring() {
        let mut points = square();
        points.pop();
        assert_matches!(
            CanonicalPolygon::new(points, &GeoBounds::MAURITIUS),
            Err(FieldGeomTypesError::NotClosed)
        );
    }

    #[test]
    fn rejects_degenerate_ring() {
        let points = vec![
            lonlat!(57.0, -20.0),
            lonlat!(57.1, -20.0),
            lonlat!(57.1, -20.0),
            lonlat!(57.0, -20.0),
        ];
        assert_matches!(
            CanonicalPolygon::new(points, &GeoBounds::MAURITIUS),
            Err(FieldGeomTypesError::TooFewVertices { distinct: 2 })
        );
        assert_matches!(
            CanonicalPolygon::new(vec![], &GeoBounds::MAURITIUS),
            Err(FieldGeomTypesError::TooFewVertices { distinct: 0 })
        );
    }

    #[test]
    fn rejects_non_finite() {
        let mut points = square();
        points[2] = lonlat!(f64::INFINITY, -19.9);
        assert_matches!(
            CanonicalPolygon::new(points, &GeoBounds::MAURITIUS),
            Err(FieldGeomTypesError::NonFinite { index: 2 })
        );
    }

    #[test]
    fn rejects_points_outside_bounds() {
        let paris = vec![
            lonlat!(2.35, 48.85),
            lonlat!(2.36, 48.85),
            lonlat!(2.36, 48.86),
            lonlat!(2.35, 48.85),
        ];
        assert_matches!(
            CanonicalPolygon::new(paris.clone(), &GeoBounds::MAURITIUS),
            Err(FieldGeomTypesError::OutOfBounds { index: 0 })
        );
        assert!(CanonicalPolygon::new(paris, &GeoBounds::WORLD).is_ok());

        let mut points = square();
        points[2] = lonlat!(57.1, -18.5);
        assert_matches!(
            CanonicalPolygon::new(points, &GeoBounds::MAURITIUS),
            Err(FieldGeomTypesError::OutOfBounds { index: 2 })
        );
    }

    #[test]
    fn serializes_as_point_list() {
        let polygon = CanonicalPolygon::new(square(), &GeoBounds::MAURITIUS).unwrap();
        let json = serde_json::to_value(&polygon).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 5);
    }

    #[test]
    fn reversed_flips_winding() {
        let polygon = CanonicalPolygon::new(square(), &GeoBounds::MAURITIUS).unwrap();
        let reversed = polygon.reversed();

        assert_eq!(polygon.winding(), Winding::CounterClockwise);
        assert_eq!(reversed.winding(), Winding::Clockwise);
        assert_eq!(polygon.points()[0], reversed.points()[0]);
        assert_abs_diff_eq!(polygon.area_signed(), -reversed.area_signed(), epsilon = 1e-12);
    }

    #[test]
    fn extent() {
        let polygon = CanonicalPolygon::new(square(), &GeoBounds::MAURITIUS).unwrap();
        let extent = polygon.extent();
        assert_eq!(extent.min_lon(), 57.0);
        assert_eq!(extent.max_lat(), -19.9);
    }

    #[test]
    fn distinct_treats_signed_zero_as_equal() {
        let points = [lonlat!(0.0, 0.0), lonlat!(-0.0, 0.0), lonlat!(1.0, 0.0)];
        assert_eq!(count_distinct(&points), 2);
    }
}
