//! Readers and writers for the two encodings field boundaries are stored in:
//!
//! * [`ewkb`]: hex-encoded extended well-known binary, as PostGIS returns geometry columns;
//! * [`wkt`]: well-known text `POLYGON((x y, ...))`, as import files and `ST_AsText` produce it.
//!
//! Both decoders return [`RawPoint`]s. They do not decide which component is longitude: producers of these
//! payloads are known to disagree on the axis order, so that decision is left to the caller.
//!
//! Decoding never panics on malformed input. Problems with the payload as a whole are reported as [`DecodeError`],
//! problems with individual points are collected as [`PointError`]s next to the points that could be read.

use fieldgeom_types::{AxisOrder, RawPoint};
use serde::{Deserialize, Serialize};

pub mod error;
pub mod ewkb;
pub mod wkt;

pub use error::{DecodeError, PointError};
pub use ewkb::{ByteOrder, GeometryHeader};

/// Default upper limit for the number of points in one geometry.
pub const DEFAULT_MAX_POINT_COUNT: usize = 10_000;

/// Limits applied while decoding untrusted payloads.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeOptions {
    max_point_count: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_point_count: DEFAULT_MAX_POINT_COUNT,
        }
    }
}

impl DecodeOptions {
    /// Maximum number of points a geometry may declare.
    pub fn max_point_count(&self) -> usize {
        self.max_point_count
    }

    /// Sets maximum number of points a geometry may declare.
    pub fn with_max_point_count(mut self, max_point_count: usize) -> Self {
        self.max_point_count = max_point_count;
        self
    }
}

/// Geometry value as read from storage or an import file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RawGeometryPayload {
    /// Hex-encoded EWKB.
    Binary {
        /// Hex string.
        hex: String,
    },
    /// WKT polygon.
    Text {
        /// WKT string.
        wkt: String,
    },
}

impl RawGeometryPayload {
    /// Creates a binary payload.
    pub fn binary(hex: impl Into<String>) -> Self {
        Self::Binary { hex: hex.into() }
    }

    /// Creates a text payload.
    pub fn text(wkt: impl Into<String>) -> Self {
        Self::Text { wkt: wkt.into() }
    }

    /// Classifies an untagged geometry string.
    ///
    /// Strings starting with `POLYGON` or `SRID=` are text, strings of hex digits (optionally prefixed with `\x`) are
    /// binary.
    pub fn sniff(value: &str) -> Result<Self, DecodeError> {
        let trimmed = value.trim();
        let upper_prefix: String = trimmed
            .chars()
            .take(7)
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if upper_prefix.starts_with("POLYGON") || upper_prefix.starts_with("SRID=") {
            return Ok(Self::text(trimmed));
        }

        let digits = ewkb::strip_bytea_prefix(trimmed);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Ok(Self::binary(trimmed));
        }

        Err(DecodeError::MalformedSyntax(format!(
            "cannot recognize geometry encoding of {:?}",
            truncate(trimmed, 32)
        )))
    }

    /// Decodes the payload with the matching decoder.
    pub fn decode(&self, options: &DecodeOptions) -> Result<DecodedGeometry, DecodeError> {
        match self {
            RawGeometryPayload::Binary { hex } => ewkb::decode(hex, options),
            RawGeometryPayload::Text { wkt } => wkt::decode(wkt, options),
        }
    }
}

/// Result of decoding a payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedGeometry {
    /// Points that were decoded successfully, in payload order.
    pub points: Vec<RawPoint>,
    /// Points that could not be decoded.
    pub errors: Vec<PointError>,
    /// Spatial reference id, if the payload carries one.
    pub srid: Option<u32>,
    /// Axis order the encoding prescribes, if it prescribes one. This is what the format promises, not what the
    /// producer necessarily did.
    pub declared_order: Option<AxisOrder>,
    /// Header of a binary payload.
    pub header: Option<GeometryHeader>,
}

pub(crate) fn truncate(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((index, _)) => format!("{}...", &value[..index]),
        None => value.to_string(),
    }
}
