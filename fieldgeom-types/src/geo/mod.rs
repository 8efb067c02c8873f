//! Points in geographic coordinates (latitude and longitude in degrees), see [`GeoPoint`].

pub mod impls;
mod traits;

pub use traits::{GeoPoint, NewGeoPoint};
