//! Closed rings of geographic points.
//!
//! A ring bounds a polygon. The [`ClosedRing`] trait is implemented over the *distinct* vertices of the ring: the
//! closing point (equal to the first one) is not part of [`ClosedRing::iter_vertices`], but it is yielded again at
//! the end of [`ClosedRing::iter_points_closing`], and the closing segment is included in
//! [`ClosedRing::iter_segments`].

use num_traits::{One, Zero};

use crate::geo::GeoPoint;

/// A closed sequence of geographic vertices. See module documentation for details.
pub trait ClosedRing {
    /// Type of the vertices.
    type Point: GeoPoint;

    /// Iterate over the distinct vertices of the ring, without the closing point.
    fn iter_vertices(&self) -> impl Iterator<Item = &'_ Self::Point>;

    /// Same as [`ClosedRing::iter_vertices`] but repeats the first vertex at the end.
    fn iter_points_closing(&self) -> impl Iterator<Item = &'_ Self::Point> {
        let mut vertices = self.iter_vertices();
        let first = vertices.next();
        first.into_iter().chain(vertices).chain(first)
    }

    /// Iterates over the segments of the ring, including the one from the last vertex back to the first.
    fn iter_segments(&self) -> impl Iterator<Item = Segment<'_, Self::Point>> {
        let mut points = self.iter_points_closing();
        let mut prev = points.next();
        points.filter_map(move |p| {
            let segment = prev.map(|prev| Segment(prev, p));
            prev = Some(p);
            segment
        })
    }

    /// Signed area of the ring in square degrees, computed with the shoelace formula with longitude as `x` and
    /// latitude as `y`. Positive for counter-clockwise rings.
    fn area_signed(&self) -> <Self::Point as GeoPoint>::Num {
        let mut aggr = <Self::Point as GeoPoint>::Num::zero();
        for Segment(prev, p) in self.iter_segments() {
            aggr = aggr + prev.lon() * p.lat() - p.lon() * prev.lat();
        }

        let two = <Self::Point as GeoPoint>::Num::one() + <Self::Point as GeoPoint>::Num::one();
        aggr / two
    }

    /// Direction in which the ring is traversed.
    fn winding(&self) -> Winding {
        if self.area_signed() <= <Self::Point as GeoPoint>::Num::zero() {
            Winding::Clockwise
        } else {
            Winding::CounterClockwise
        }
    }
}

impl<P: GeoPoint> ClosedRing for [P] {
    type Point = P;

    fn iter_vertices(&self) -> impl Iterator<Item = &'_ P> {
        self.iter()
    }
}

/// Traversal direction of a ring.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Winding {
    /// Clockwise (negative signed area). Degenerate rings are reported as clockwise.
    Clockwise,
    /// Counter-clockwise (positive signed area).
    CounterClockwise,
}

/// Line segment between two ring vertices.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Segment<'a, P>(pub &'a P, pub &'a P);
