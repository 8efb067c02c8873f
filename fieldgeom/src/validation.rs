//! Bounds and sanity checks that turn resolved points into a [`CanonicalPolygon`].

use fieldgeom_types::geo::GeoPoint;
use fieldgeom_types::{count_distinct, CanonicalPolygon, GeoBounds, GeoPoint2d};
use serde::Serialize;

use crate::error::ValidationError;

/// Why a point was left out of the polygon.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RejectionReason {
    /// Coordinate is NaN or infinite.
    NonFinite,
    /// Point lies outside the configured bounds.
    OutOfBounds,
}

/// Point left out of the polygon.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedPoint {
    /// Position of the point in the validated list.
    pub index: usize,
    /// The point itself.
    pub point: GeoPoint2d,
    /// Reason for rejection.
    pub reason: RejectionReason,
}

/// Result of a successful validation.
///
/// The geometry may still be partial: `rejected` lists the points that were dropped. Whether a partial geometry is
/// acceptable is up to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    /// Closed polygon built from the valid points.
    pub polygon: CanonicalPolygon,
    /// Points that were dropped.
    pub rejected: Vec<RejectedPoint>,
    /// `true` if the closing point was added by the validator.
    pub ring_closed: bool,
}

impl ValidationOutcome {
    /// Some points were dropped.
    pub fn is_partial(&self) -> bool {
        !self.rejected.is_empty()
    }
}

/// Checks points against a bounding region and closes the ring.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundsValidator {
    bounds: GeoBounds,
}

impl BoundsValidator {
    /// Creates a validator accepting points inside `bounds`.
    pub fn new(bounds: GeoBounds) -> Self {
        Self { bounds }
    }

    /// Accepted region.
    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    /// Validates `(lon, lat)` points, either freshly resolved or taken from an existing polygon.
    ///
    /// Invalid points are dropped and reported. If fewer than 3 distinct points remain, the whole geometry is
    /// rejected; it is never padded. An open ring is closed by repeating its first valid point.
    pub fn validate(&self, points: &[GeoPoint2d]) -> Result<ValidationOutcome, ValidationError> {
        let mut valid = Vec::with_capacity(points.len() + 1);
        let mut rejected = vec![];

        for (index, point) in points.iter().enumerate() {
            let reason = if !point.is_finite() {
                RejectionReason::NonFinite
            } else if !self.bounds.contains(point) {
                RejectionReason::OutOfBounds
            } else {
                valid.push(*point);
                continue;
            };

            log::warn!("Rejecting point {index} ({point}): {reason:?}");
            rejected.push(RejectedPoint {
                index,
                point: *point,
                reason,
            });
        }

        let distinct = count_distinct(&valid);
        if distinct < 3 {
            return Err(ValidationError::InsufficientVertices { distinct });
        }

        let ring_closed = match (valid.first().copied(), valid.last().copied()) {
            (Some(first), Some(last)) if !first.coord_eq(&last) => {
                valid.push(first);
                true
            }
            _ => false,
        };

        let polygon = CanonicalPolygon::new(valid, &self.bounds)
            .map_err(|_| ValidationError::InsufficientVertices { distinct })?;

        Ok(ValidationOutcome {
            polygon,
            rejected,
            ring_closed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use fieldgeom_types::lonlat;

    fn validator() -> BoundsValidator {
        BoundsValidator::new(GeoBounds::MAURITIUS)
    }

    fn open_ring() -> Vec<GeoPoint2d> {
        vec![
            lonlat!(57.65, -20.44),
            lonlat!(57.66, -20.44),
            lonlat!(57.66, -20.43),
        ]
    }

    #[test]
    fn closes_open_ring() {
        let outcome = validator().validate(&open_ring()).unwrap();
        assert!(outcome.ring_closed);
        assert!(!outcome.is_partial());
        assert_eq!(outcome.polygon.len(), 4);
        assert_eq!(outcome.polygon.points()[3], lonlat!(57.65, -20.44));
    }

    #[test]
    fn closing_is_idempotent() {
        let first = validator().validate(&open_ring()).unwrap();
        let second = validator().validate(first.polygon.points()).unwrap();

        assert!(!second.ring_closed);
        assert_eq!(second.polygon, first.polygon);
    }

    #[test]
    fn rejects_out_of_bounds_and_non_finite() {
        let mut points = open_ring();
        points.insert(1, lonlat!(2.35, 48.85));
        points.push(lonlat!(f64::NAN, -20.43));
        points.push(lonlat!(57.65, -20.43));

        let outcome = validator().validate(&points).unwrap();

        assert_eq!(outcome.rejected.len(), 2);
        assert_eq!(outcome.rejected[0].index, 1);
        assert_eq!(outcome.rejected[0].reason, RejectionReason::OutOfBounds);
        assert_eq!(outcome.rejected[1].index, 4);
        assert_eq!(outcome.rejected[1].reason, RejectionReason::NonFinite);
        assert!(outcome.is_partial());
        assert_eq!(outcome.polygon.len(), 5);
    }

    #[test]
    fn two_valid_points_are_never_padded() {
        let points = [
            lonlat!(57.65, -20.44),
            lonlat!(10.0, 10.0),
            lonlat!(57.66, -20.44),
            lonlat!(f64::INFINITY, 0.0),
            lonlat!(57.65, -20.44),
            lonlat!(-57.0, 20.0),
        ];
        assert_matches!(
            validator().validate(&points),
            Err(ValidationError::InsufficientVertices { distinct: 2 })
        );
    }

    #[test]
    fn empty_input() {
        assert_matches!(
            validator().validate(&[]),
            Err(ValidationError::InsufficientVertices { distinct: 0 })
        );
    }

    #[test]
    fn boundary_points_are_inside() {
        let points = [
            lonlat!(57.0, -21.0),
            lonlat!(58.0, -21.0),
            lonlat!(58.0, -19.0),
        ];
        let outcome = validator().validate(&points).unwrap();
        assert!(outcome.rejected.is_empty());
    }
}
