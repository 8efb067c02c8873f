//! Well-known text polygons: `POLYGON((x y, x y, ...))`, optionally prefixed with `SRID=<n>;`.
//!
//! The text encoding carries no axis-order convention that producers actually follow, so the decoder does not
//! declare one.

use std::sync::LazyLock;

use fieldgeom_types::geo::GeoPoint;
use fieldgeom_types::{CanonicalPolygon, RawPoint};
use regex::Regex;

use crate::error::{DecodeError, PointError};
use crate::{truncate, DecodeOptions, DecodedGeometry};

static POLYGON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)^\s*(?:SRID\s*=\s*(?P<srid>\d+)\s*;\s*)?POLYGON\s*(?:(?P<empty>EMPTY)|\((?P<body>.*)\))\s*$",
    )
    .expect("invalid regex")
});

static RING_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\([^()]*\)(?:\s*,\s*\([^()]*\))*\s*$").expect("invalid regex")
});

static RING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^()]*)\)").expect("invalid regex"));

/// Decodes a WKT polygon.
pub fn decode(wkt: &str, options: &DecodeOptions) -> Result<DecodedGeometry, DecodeError> {
    let Some(captures) = POLYGON.captures(wkt) else {
        return Err(malformed("expected POLYGON((...))", wkt));
    };

    let srid = match captures.name("srid") {
        Some(srid) => Some(
            srid.as_str()
                .parse::<u32>()
                .map_err(|_| malformed("SRID out of range", wkt))?,
        ),
        None => None,
    };

    let max = options.max_point_count();
    if captures.name("empty").is_some() {
        return Err(DecodeError::InvalidPointCount { count: 0, max });
    }

    let body = captures.name("body").map_or("", |m| m.as_str());
    if !RING_LIST.is_match(body) {
        return Err(malformed("expected a list of parenthesized rings", wkt));
    }

    let rings: Vec<&str> = RING
        .captures_iter(body)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect();
    if rings.len() != 1 {
        return Err(DecodeError::UnsupportedRingCount(rings.len()));
    }

    let ring = rings[0].trim();
    if ring.is_empty() {
        return Err(DecodeError::InvalidPointCount { count: 0, max });
    }

    let pair_count = ring.split(',').count();
    if pair_count > max {
        return Err(DecodeError::InvalidPointCount {
            count: pair_count,
            max,
        });
    }

    let mut points = Vec::with_capacity(pair_count);
    let mut errors = vec![];
    for (index, pair) in ring.split(',').enumerate() {
        match parse_pair(index, pair.trim()) {
            Ok(point) => points.push(point),
            Err(error) => {
                log::warn!("{error}");
                errors.push(error);
            }
        }
    }

    log::debug!(
        "Decoded text polygon: srid {:?}, {} of {} points valid",
        srid,
        points.len(),
        pair_count
    );

    Ok(DecodedGeometry {
        points,
        errors,
        srid,
        declared_order: None,
        header: None,
    })
}

fn parse_pair(index: usize, pair: &str) -> Result<RawPoint, PointError> {
    let unparseable = || PointError::Unparseable {
        index,
        raw: truncate(pair, 64),
    };

    let mut tokens = pair.split_whitespace();
    let (Some(first), Some(second), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(unparseable());
    };

    let (Ok(first), Ok(second)) = (first.parse::<f64>(), second.parse::<f64>()) else {
        return Err(unparseable());
    };

    let point = RawPoint::new(first, second);
    if point.is_finite() {
        Ok(point)
    } else {
        Err(PointError::InvalidCoordinate {
            index,
            first,
            second,
        })
    }
}

fn malformed(reason: &str, wkt: &str) -> DecodeError {
    DecodeError::MalformedSyntax(format!("{reason}: {:?}", truncate(wkt.trim(), 48)))
}

/// Writes the polygon as `POLYGON((lon lat, ...))`, including the closing point.
///
/// Coordinates use the shortest representation that parses back to the same value.
pub fn encode(polygon: &CanonicalPolygon) -> String {
    let points: Vec<RawPoint> = polygon
        .points()
        .iter()
        .map(|p| RawPoint::new(p.lon(), p.lat()))
        .collect();
    encode_ring(&points)
}

/// Same as [`encode`] with an `SRID=<srid>;` prefix.
pub fn encode_with_srid(polygon: &CanonicalPolygon, srid: u32) -> String {
    format!("SRID={srid};{}", encode(polygon))
}

/// Writes the points exactly as given as a single-ring polygon.
pub fn encode_ring(points: &[RawPoint]) -> String {
    let coordinates = points
        .iter()
        .map(|p| format!("{} {}", p.first, p.second))
        .collect::<Vec<_>>()
        .join(", ");
    format!("POLYGON(({coordinates}))")
}
