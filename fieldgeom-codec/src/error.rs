//! Errors produced while decoding geometry payloads.

use serde::Serialize;
use thiserror::Error;

/// Whole-geometry decoding failure. When a decoder returns one of these, no usable points were produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// Binary payload is not a valid hex string.
    #[error("invalid hex payload: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Binary payload ends before all declared fields could be read.
    #[error("payload too short: {needed} bytes required, {actual} available")]
    TooShort {
        /// Number of bytes required to read the geometry.
        needed: usize,
        /// Number of bytes in the payload.
        actual: usize,
    },

    /// First byte of a binary payload is neither `0` (big endian) nor `1` (little endian).
    #[error("invalid byte order flag {0:#04x}")]
    InvalidByteOrder(u8),

    /// Geometry is not a 2d polygon.
    #[error("unsupported geometry type {0:#010x}, only 2d polygons are supported")]
    UnsupportedGeometryType(u32),

    /// Polygon with holes, or with no rings at all.
    #[error("unsupported ring count {0}, only single-ring polygons are supported")]
    UnsupportedRingCount(usize),

    /// Declared or actual number of points is zero or exceeds the configured maximum.
    #[error("invalid point count {count}, expected 1 to {max}")]
    InvalidPointCount {
        /// Number of points in the payload.
        count: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Text payload does not have the `POLYGON((...))` structure.
    #[error("malformed geometry text: {0}")]
    MalformedSyntax(String),
}

/// Problem with a single point of an otherwise readable geometry.
///
/// Points with errors are left out of the decoded point list, the rest of the geometry is still returned.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PointError {
    /// One of the coordinates is NaN or infinite.
    #[error("point {index}: non-finite coordinate ({first}, {second})")]
    InvalidCoordinate {
        /// Position of the point in the payload.
        index: usize,
        /// First component as decoded.
        first: f64,
        /// Second component as decoded.
        second: f64,
    },

    /// Text that is not a pair of numbers.
    #[error("point {index}: cannot parse {raw:?} as a coordinate pair")]
    Unparseable {
        /// Position of the pair in the coordinate list.
        index: usize,
        /// The pair as written.
        raw: String,
    },
}

impl PointError {
    /// Position of the offending point in the payload.
    pub fn index(&self) -> usize {
        match self {
            PointError::InvalidCoordinate { index, .. } | PointError::Unparseable { index, .. } => {
                *index
            }
        }
    }
}
