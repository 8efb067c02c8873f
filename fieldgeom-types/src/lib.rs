//! Geometry types shared by the `fieldgeom` crates.
//!
//! Coordinates arrive from producers as [`RawPoint`]s: two numbers with no axis meaning attached. An [`AxisOrder`]
//! turns them into [`GeoPoint2d`]s, which always store longitude and latitude explicitly. A validated, closed ring of
//! geographic points is a [`CanonicalPolygon`], the only polygon representation the rest of the system passes
//! around.
//!
//! ```
//! use fieldgeom_types::{AxisOrder, GeoBounds, RawPoint};
//! use fieldgeom_types::geo::GeoPoint;
//!
//! let raw = RawPoint::new(-20.44, 57.64);
//! let point = raw.resolve(AxisOrder::LatLon);
//!
//! assert_eq!(point.lon(), 57.64);
//! assert!(GeoBounds::MAURITIUS.contains(&point));
//! ```

mod axis_order;
pub use axis_order::AxisOrder;

mod bounds;
pub use bounds::GeoBounds;

pub mod error;

pub mod geo;
pub use geo::impls::GeoPoint2d;

mod polygon;
pub use polygon::{count_distinct, CanonicalPolygon};

mod raw_point;
pub use raw_point::RawPoint;

pub mod ring;
pub use ring::{ClosedRing, Segment, Winding};
