//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldGeomTypesError {
    /// Bounding region with inverted or non-finite limits.
    #[error("invalid bounds: lon {min_lon}..{max_lon}, lat {min_lat}..{max_lat}")]
    InvalidBounds {
        /// Minimum longitude.
        min_lon: f64,
        /// Maximum longitude.
        max_lon: f64,
        /// Minimum latitude.
        min_lat: f64,
        /// Maximum latitude.
        max_lat: f64,
    },

    /// Ring whose first and last points differ.
    #[error("ring is not closed")]
    NotClosed,

    /// Ring with fewer than three distinct vertices.
    #[error("ring has {distinct} distinct vertices, at least 3 are required")]
    TooFewVertices {
        /// Number of distinct vertices found.
        distinct: usize,
    },

    /// Point outside the bounds the polygon is built with.
    #[error("point {index} is outside the bounds")]
    OutOfBounds {
        /// Position of the point in the ring.
        index: usize,
    },

    /// Point with a NaN or infinite coordinate.
    #[error("point {index} has a non-finite coordinate")]
    NonFinite {
        /// Position of the point in the ring.
        index: usize,
    },
}
