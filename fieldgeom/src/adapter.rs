//! Hand-off of canonical polygons to consumers with their own axis order.

use fieldgeom_types::{AxisOrder, CanonicalPolygon};

/// Coordinates of the polygon's closed ring in the requested order. The polygon is not changed.
pub fn to_axis_order(polygon: &CanonicalPolygon, order: AxisOrder) -> Vec<[f64; 2]> {
    match order {
        AxisOrder::LonLat => polygon.points().iter().map(|p| p.to_lonlat()).collect(),
        AxisOrder::LatLon => polygon.points().iter().map(|p| p.to_latlon()).collect(),
    }
}

/// Consumer of polygon coordinates, such as a map renderer.
pub trait RenderTarget {
    /// Axis order the consumer expects.
    fn axis_order(&self) -> AxisOrder;
}

/// Conversion of a polygon into coordinates a [`RenderTarget`] accepts.
pub trait ToRenderTarget {
    /// Coordinates in the order `target` expects.
    fn coordinates_for(&self, target: &impl RenderTarget) -> Vec<[f64; 2]>;
}

impl ToRenderTarget for CanonicalPolygon {
    fn coordinates_for(&self, target: &impl RenderTarget) -> Vec<[f64; 2]> {
        to_axis_order(self, target.axis_order())
    }
}

impl RenderTarget for AxisOrder {
    fn axis_order(&self) -> AxisOrder {
        *self
    }
}
