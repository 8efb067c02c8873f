//! Area, centroid and perimeter of field polygons.
//!
//! All values use a local flat-Earth approximation: a degree of latitude is [`METERS_PER_DEGREE`] long, and a degree
//! of longitude is that times the cosine of the polygon's mean latitude. This is accurate enough for fields a few
//! kilometres across, and meaningless for polygons spanning large parts of the globe.

use fieldgeom_types::geo::{GeoPoint, NewGeoPoint};
use fieldgeom_types::{CanonicalPolygon, ClosedRing, GeoBounds, GeoPoint2d, Segment};
use serde::Serialize;

/// Length of one degree of latitude in metres.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

/// Derived values of a polygon.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryMetrics {
    /// Unsigned area in hectares.
    pub area_hectares: f64,
    /// Mean of the stored ring points.
    pub centroid: GeoPoint2d,
    /// Length of the ring in metres.
    pub perimeter_meters: f64,
    /// Bounding box of the ring.
    pub extent: GeoBounds,
}

/// Metric calculations on a field polygon.
pub trait FieldMetrics {
    /// Unsigned area in hectares. Does not depend on the ring winding.
    fn area_hectares(&self) -> f64;

    /// Arithmetic mean of all stored ring points, the closing point included.
    fn centroid(&self) -> GeoPoint2d;

    /// Centroid of the area bounded by the ring. For a ring with zero area, same as [`FieldMetrics::centroid`].
    fn area_weighted_centroid(&self) -> GeoPoint2d;

    /// Length of the ring including the closing segment, in metres.
    fn perimeter_meters(&self) -> f64;

    /// All metrics at once.
    fn metrics(&self) -> GeometryMetrics;
}

impl FieldMetrics for CanonicalPolygon {
    fn area_hectares(&self) -> f64 {
        let meters_per_lon_degree = meters_per_lon_degree(self);
        self.area_signed().abs() * meters_per_lon_degree * meters_per_lon_degree
            / SQUARE_METERS_PER_HECTARE
    }

    fn centroid(&self) -> GeoPoint2d {
        let points = self.points();
        let count = points.len() as f64;
        let (lon, lat) = points
            .iter()
            .fold((0.0, 0.0), |(lon, lat), p| (lon + p.lon(), lat + p.lat()));

        GeoPoint2d::lonlat(lon / count, lat / count)
    }

    fn area_weighted_centroid(&self) -> GeoPoint2d {
        let area = self.area_signed();
        if area.abs() <= f64::EPSILON * f64::EPSILON {
            return self.centroid();
        }

        // Relative to the first vertex to keep the cross products small.
        let origin = self.points()[0];
        let (mut lon, mut lat) = (0.0, 0.0);
        for Segment(a, b) in self.iter_segments() {
            let (ax, ay) = (a.lon() - origin.lon(), a.lat() - origin.lat());
            let (bx, by) = (b.lon() - origin.lon(), b.lat() - origin.lat());
            let cross = ax * by - bx * ay;
            lon += (ax + bx) * cross;
            lat += (ay + by) * cross;
        }

        GeoPoint2d::lonlat(
            origin.lon() + lon / (6.0 * area),
            origin.lat() + lat / (6.0 * area),
        )
    }

    fn perimeter_meters(&self) -> f64 {
        let meters_per_lon_degree = meters_per_lon_degree(self);
        self.iter_segments()
            .map(|Segment(a, b)| {
                let dx = (b.lon() - a.lon()) * meters_per_lon_degree;
                let dy = (b.lat() - a.lat()) * METERS_PER_DEGREE;
                dx.hypot(dy)
            })
            .sum()
    }

    fn metrics(&self) -> GeometryMetrics {
        GeometryMetrics {
            area_hectares: self.area_hectares(),
            centroid: self.centroid(),
            perimeter_meters: self.perimeter_meters(),
            extent: self.extent(),
        }
    }
}

fn meters_per_lon_degree(polygon: &CanonicalPolygon) -> f64 {
    METERS_PER_DEGREE * polygon.centroid().lat_rad().cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use fieldgeom_types::lonlat;

    fn polygon(points: &[GeoPoint2d]) -> CanonicalPolygon {
        let mut points = points.to_vec();
        points.push(points[0]);
        CanonicalPolygon::new(points, &GeoBounds::WORLD).unwrap()
    }

    fn field() -> CanonicalPolygon {
        polygon(&[
            lonlat!(57.0, -20.0),
            lonlat!(57.01, -20.0),
            lonlat!(57.01, -19.99),
            lonlat!(57.0, -19.99),
        ])
    }

    #[test]
    fn area_of_small_square() {
        let scale = METERS_PER_DEGREE * (-19.996f64).to_radians().cos();
        let expected = 0.01 * 0.01 * scale * scale / 10_000.0;

        assert_relative_eq!(field().area_hectares(), expected, max_relative = 1e-6);
        assert!(field().area_hectares() > 100.0);
    }

    #[test]
    fn area_does_not_depend_on_winding() {
        let polygon = field();
        assert_relative_eq!(
            polygon.area_hectares(),
            polygon.reversed().area_hectares(),
            max_relative = 1e-6
        );
        assert!(polygon.area_signed() > 0.0);
        assert!(polygon.reversed().area_signed() < 0.0);
    }

    #[test]
    fn centroid_counts_closing_point() {
        let centroid = field().centroid();
        assert_abs_diff_eq!(centroid.lon(), 57.004, epsilon = 1e-12);
        assert_abs_diff_eq!(centroid.lat(), -19.996, epsilon = 1e-12);
    }

    #[test]
    fn area_weighted_centroid_differs_from_vertex_mean() {
        let polygon = polygon(&[
            lonlat!(0.0, 0.0),
            lonlat!(2.0, 0.0),
            lonlat!(4.0, 0.0),
            lonlat!(4.0, 4.0),
            lonlat!(0.0, 4.0),
        ]);

        let mean = polygon.centroid();
        assert_abs_diff_eq!(mean, lonlat!(10.0 / 6.0, 8.0 / 6.0), epsilon = 1e-12);

        let weighted = polygon.area_weighted_centroid();
        assert_abs_diff_eq!(weighted, lonlat!(2.0, 2.0), epsilon = 1e-12);
        assert_abs_diff_eq!(
            polygon.reversed().area_weighted_centroid(),
            weighted,
            epsilon = 1e-12
        );
    }

    #[test]
    fn zero_area_ring() {
        let polygon = polygon(&[lonlat!(0.0, 0.0), lonlat!(1.0, 1.0), lonlat!(2.0, 2.0)]);

        assert_eq!(polygon.area_hectares(), 0.0);
        assert_abs_diff_eq!(
            polygon.area_weighted_centroid(),
            lonlat!(0.75, 0.75),
            epsilon = 1e-12
        );
    }

    #[test]
    fn perimeter() {
        let polygon = polygon(&[
            lonlat!(0.0, 0.0),
            lonlat!(0.01, 0.0),
            lonlat!(0.01, 0.01),
            lonlat!(0.0, 0.01),
        ]);
        let lon_side = 0.01 * METERS_PER_DEGREE * 0.004f64.to_radians().cos();
        let lat_side = 0.01 * METERS_PER_DEGREE;

        assert_relative_eq!(
            polygon.perimeter_meters(),
            2.0 * (lon_side + lat_side),
            max_relative = 1e-9
        );
    }

    #[test]
    fn metrics_bundle() {
        let polygon = field();
        let metrics = polygon.metrics();

        assert_eq!(metrics.area_hectares, polygon.area_hectares());
        assert_eq!(metrics.centroid, polygon.centroid());
        assert_eq!(metrics.extent.min_lat(), -20.0);
        assert!(metrics.perimeter_meters > 4000.0);
    }
}
