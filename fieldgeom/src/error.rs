//! Error types used by the crate.

use fieldgeom_codec::DecodeError;
use fieldgeom_types::error::FieldGeomTypesError;
use thiserror::Error;

/// Failure to decide which coordinate component is longitude.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AxisOrderError {
    /// No point falls inside the bounds in either axis order.
    #[error("no point lies inside the bounds in either axis order")]
    NoPlausibleOrdering,

    /// Both axis orders put the same number of points inside the bounds.
    #[error("axis order is ambiguous: {in_bounds} points lie inside the bounds in both orders")]
    Ambiguous {
        /// Number of points inside the bounds, same for both orders.
        in_bounds: usize,
    },
}

/// Whole-geometry validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Fewer than 3 distinct valid points are left.
    #[error("polygon needs at least 3 distinct valid vertices, {distinct} found")]
    InsufficientVertices {
        /// Number of distinct valid points.
        distinct: usize,
    },
}

/// Error returned by [`GeometryPipeline`](crate::GeometryPipeline).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// Pipeline configuration is not usable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] FieldGeomTypesError),

    /// Payload could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Axis order could not be determined.
    #[error(transparent)]
    AxisOrder(#[from] AxisOrderError),

    /// Remaining points do not form a polygon.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Some points were dropped and partial geometries are not allowed.
    #[error("{dropped} points were dropped and partial geometries are not allowed")]
    PartialGeometry {
        /// Number of points dropped by the decoder and the validator together.
        dropped: usize,
    },
}

/// Error returned by a [`FieldStore`](crate::import::FieldStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A field with this id is already stored and the store does not overwrite.
    #[error("field {id} already exists")]
    Conflict {
        /// Field id.
        id: String,
    },

    /// Storage backend failure.
    #[error("storage error: {0}")]
    Backend(String),
}

/// Reason a single record of a batch import failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// Geometry could not be processed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Processed geometry could not be stored.
    #[error(transparent)]
    Store(#[from] StoreError),
}
