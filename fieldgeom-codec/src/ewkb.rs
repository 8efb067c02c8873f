//! Hex-encoded (E)WKB polygons.
//!
//! Layout of a supported payload:
//!
//! | bytes          | content                                                        |
//! |----------------|----------------------------------------------------------------|
//! | 1              | byte order: `0` big endian, `1` little endian                  |
//! | 4              | geometry type `3` (polygon), `0x2000_0000` flag if SRID follows |
//! | 4 (optional)   | SRID                                                           |
//! | 4              | ring count, must be `1`                                        |
//! | 4              | point count                                                    |
//! | 16 x points    | `x`, `y` as IEEE-754 doubles                                   |
//!
//! All multi-byte fields use the byte order from the first byte.

use bytes::{Buf, BufMut};
use fieldgeom_types::geo::GeoPoint;
use fieldgeom_types::{AxisOrder, CanonicalPolygon, RawPoint};
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, PointError};
use crate::{DecodeOptions, DecodedGeometry};

const POLYGON_TYPE: u32 = 3;
const SRID_FLAG: u32 = 0x2000_0000;
const M_FLAG: u32 = 0x4000_0000;
const Z_FLAG: u32 = 0x8000_0000;
const FLAGS_MASK: u32 = Z_FLAG | M_FLAG | SRID_FLAG;

const HEADER_LEN: usize = 1 + 4;
const POINT_LEN: usize = 16;
/// Byte order, type, ring count, point count and one point.
const MIN_LEN: usize = HEADER_LEN + 4 + 4 + POINT_LEN;

/// Byte order of multi-byte fields in a binary payload.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ByteOrder {
    /// XDR, flag byte `0`.
    BigEndian,
    /// NDR, flag byte `1`.
    LittleEndian,
}

impl ByteOrder {
    fn from_flag(flag: u8) -> Result<Self, DecodeError> {
        match flag {
            0 => Ok(ByteOrder::BigEndian),
            1 => Ok(ByteOrder::LittleEndian),
            v => Err(DecodeError::InvalidByteOrder(v)),
        }
    }

    fn flag(self) -> u8 {
        match self {
            ByteOrder::BigEndian => 0,
            ByteOrder::LittleEndian => 1,
        }
    }
}

/// Fixed part of a binary polygon payload.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryHeader {
    /// Byte order of the payload.
    pub byte_order: ByteOrder,
    /// Geometry type word including flag bits.
    pub geometry_type: u32,
    /// SRID, if the SRID flag is set.
    pub srid: Option<u32>,
    /// Number of rings.
    pub ring_count: u32,
}

/// Decodes a hex-encoded EWKB polygon.
///
/// Leading and trailing whitespace and a `\x` prefix (PostgreSQL `bytea` output) are ignored.
pub fn decode(hex: &str, options: &DecodeOptions) -> Result<DecodedGeometry, DecodeError> {
    let bytes = hex::decode(strip_bytea_prefix(hex.trim()))?;
    decode_bytes(&bytes, options)
}

/// Decodes an EWKB polygon from raw bytes.
pub fn decode_bytes(bytes: &[u8], options: &DecodeOptions) -> Result<DecodedGeometry, DecodeError> {
    if bytes.len() < MIN_LEN {
        return Err(DecodeError::TooShort {
            needed: MIN_LEN,
            actual: bytes.len(),
        });
    }

    let mut reader = Reader::new(bytes, ByteOrder::from_flag(bytes[0])?);
    reader.skip(1);

    let geometry_type = reader.read_u32()?;
    let srid = if geometry_type & SRID_FLAG != 0 {
        reader.require(4 + 4 + 4 + POINT_LEN)?;
        Some(reader.read_u32()?)
    } else {
        None
    };

    if geometry_type & (Z_FLAG | M_FLAG) != 0 || geometry_type & !FLAGS_MASK != POLYGON_TYPE {
        return Err(DecodeError::UnsupportedGeometryType(geometry_type));
    }

    let ring_count = reader.read_u32()?;
    if ring_count != 1 {
        return Err(DecodeError::UnsupportedRingCount(ring_count as usize));
    }

    let header = GeometryHeader {
        byte_order: reader.order,
        geometry_type,
        srid,
        ring_count,
    };

    let point_count = reader.read_u32()? as usize;
    if point_count == 0 || point_count > options.max_point_count() {
        return Err(DecodeError::InvalidPointCount {
            count: point_count,
            max: options.max_point_count(),
        });
    }

    reader.require(point_count * POINT_LEN)?;

    let mut points = Vec::with_capacity(point_count);
    let mut errors = vec![];
    for index in 0..point_count {
        let first = reader.read_f64()?;
        let second = reader.read_f64()?;
        let point = RawPoint::new(first, second);

        if point.is_finite() {
            points.push(point);
        } else {
            let error = PointError::InvalidCoordinate {
                index,
                first,
                second,
            };
            log::warn!("{error}");
            errors.push(error);
        }
    }

    if reader.remaining() > 0 {
        log::warn!(
            "Ignoring {} trailing bytes after the last point",
            reader.remaining()
        );
    }

    log::debug!(
        "Decoded binary polygon: {:?}, srid {:?}, {} of {} points valid",
        header.byte_order,
        srid,
        points.len(),
        point_count
    );

    Ok(DecodedGeometry {
        points,
        errors,
        srid,
        declared_order: Some(AxisOrder::LonLat),
        header: Some(header),
    })
}

/// Encodes the polygon as hex EWKB with `x` = longitude and `y` = latitude.
pub fn encode(polygon: &CanonicalPolygon, byte_order: ByteOrder, srid: Option<u32>) -> String {
    let points: Vec<RawPoint> = polygon
        .points()
        .iter()
        .map(|p| RawPoint::new(p.lon(), p.lat()))
        .collect();
    encode_ring(&points, byte_order, srid)
}

/// Encodes the points as a single-ring hex EWKB polygon exactly as given, without closing the ring or reordering
/// the axes.
pub fn encode_ring(points: &[RawPoint], byte_order: ByteOrder, srid: Option<u32>) -> String {
    let mut writer = Writer {
        buf: Vec::with_capacity(MIN_LEN + 4 + points.len() * POINT_LEN),
        order: byte_order,
    };

    writer.buf.put_u8(byte_order.flag());
    match srid {
        Some(srid) => {
            writer.write_u32(POLYGON_TYPE | SRID_FLAG);
            writer.write_u32(srid);
        }
        None => writer.write_u32(POLYGON_TYPE),
    }
    writer.write_u32(1);
    writer.write_u32(points.len() as u32);
    for p in points {
        writer.write_f64(p.first);
        writer.write_f64(p.second);
    }

    hex::encode_upper(writer.buf)
}

pub(crate) fn strip_bytea_prefix(value: &str) -> &str {
    value
        .strip_prefix("\\x")
        .or_else(|| value.strip_prefix("\\X"))
        .unwrap_or(value)
}

struct Reader<'a> {
    buf: &'a [u8],
    total: usize,
    order: ByteOrder,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8], order: ByteOrder) -> Self {
        Self {
            buf,
            total: buf.len(),
            order,
        }
    }

    fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn require(&self, count: usize) -> Result<(), DecodeError> {
        if self.remaining() < count {
            Err(DecodeError::TooShort {
                needed: self.total - self.remaining() + count,
                actual: self.total,
            })
        } else {
            Ok(())
        }
    }

    fn skip(&mut self, count: usize) {
        self.buf.advance(count.min(self.remaining()));
    }

    fn read_u32(&mut self) -> Result<u32, DecodeError> {
        self.require(4)?;
        Ok(match self.order {
            ByteOrder::BigEndian => self.buf.get_u32(),
            ByteOrder::LittleEndian => self.buf.get_u32_le(),
        })
    }

    fn read_f64(&mut self) -> Result<f64, DecodeError> {
        self.require(8)?;
        Ok(match self.order {
            ByteOrder::BigEndian => self.buf.get_f64(),
            ByteOrder::LittleEndian => self.buf.get_f64_le(),
        })
    }
}

struct Writer {
    buf: Vec<u8>,
    order: ByteOrder,
}

impl Writer {
    fn write_u32(&mut self, value: u32) {
        match self.order {
            ByteOrder::BigEndian => self.buf.put_u32(value),
            ByteOrder::LittleEndian => self.buf.put_u32_le(value),
        }
    }

    fn write_f64(&mut self, value: f64) {
        match self.order {
            ByteOrder::BigEndian => self.buf.put_f64(value),
            ByteOrder::LittleEndian => self.buf.put_f64_le(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use fieldgeom_types::{lonlat, GeoBounds};

    /// Field boundary as stored by the production database: SRID 4326, latitude written as `x`.
    const FIELD_5316: &str = "0103000020E610000001000000050000006FCFC229947234C0AA852AE82FD24C40F3B04F710A7134C0A429D033F6D04C40AE788623087234C08656267BA4D04C40A450D323797334C0BE123975E3D14C406FCFC229947234C0AA852AE82FD24C40";

    fn options() -> DecodeOptions {
        DecodeOptions::default()
    }

    #[test]
    fn decode_production_sample() {
        let decoded = decode(FIELD_5316, &options()).unwrap();
        let header = decoded.header.unwrap();

        assert_eq!(header.byte_order, ByteOrder::LittleEndian);
        assert_eq!(header.srid, Some(4326));
        assert_eq!(header.ring_count, 1);
        assert_eq!(decoded.srid, Some(4326));
        assert_eq!(decoded.points.len(), 5);
        assert!(decoded.errors.is_empty());
        assert_eq!(decoded.declared_order, Some(AxisOrder::LonLat));

        assert_abs_diff_eq!(decoded.points[0].first, -20.44757328992949, epsilon = 1e-12);
        assert_abs_diff_eq!(decoded.points[0].second, 57.64208700252796, epsilon = 1e-12);
        assert_eq!(decoded.points[0], decoded.points[4]);
    }

    #[test]
    fn big_endian_matches_little_endian() {
        let points = [
            RawPoint::new(57.65, -20.44),
            RawPoint::new(57.66, -20.44),
            RawPoint::new(57.66, -20.43),
            RawPoint::new(57.65, -20.44),
        ];
        let le = decode(&encode_ring(&points, ByteOrder::LittleEndian, Some(4326)), &options()).unwrap();
        let be = decode(&encode_ring(&points, ByteOrder::BigEndian, Some(4326)), &options()).unwrap();

        assert_eq!(le.points, points);
        assert_eq!(be.points, points);
        assert_eq!(be.header.unwrap().byte_order, ByteOrder::BigEndian);
        assert_eq!(be.srid, Some(4326));
    }

    #[test]
    fn without_srid() {
        let points = [
            RawPoint::new(1.0, 2.0),
            RawPoint::new(3.0, 4.0),
            RawPoint::new(5.0, 6.0),
        ];
        let hex = encode_ring(&points, ByteOrder::LittleEndian, None);
        assert!(hex.starts_with("0103000000"));

        let decoded = decode(&hex, &options()).unwrap();
        assert_eq!(decoded.srid, None);
        assert_eq!(decoded.points, points);
    }

    #[test]
    fn encode_polygon_writes_lon_first() {
        let polygon = CanonicalPolygon::new(
            vec![
                lonlat!(57.0, -20.0),
                lonlat!(57.1, -20.0),
                lonlat!(57.1, -19.9),
                lonlat!(57.0, -20.0),
            ],
            &GeoBounds::MAURITIUS,
        )
        .unwrap();

        let decoded = decode(&encode(&polygon, ByteOrder::BigEndian, None), &options()).unwrap();
        assert_eq!(decoded.points[1], RawPoint::new(57.1, -20.0));
        assert_eq!(decoded.points.len(), 4);
    }

    #[test]
    fn bytea_prefix_and_whitespace() {
        let decoded = decode(&format!("  \\x{FIELD_5316}\n"), &options()).unwrap();
        assert_eq!(decoded.points.len(), 5);
    }

    #[test]
    fn lower_case_hex() {
        let decoded = decode(&FIELD_5316.to_lowercase(), &options()).unwrap();
        assert_eq!(decoded.points.len(), 5);
    }

    #[test]
    fn too_short() {
        assert_matches!(
            decode("0103000020E6100000", &options()),
            Err(DecodeError::TooShort { needed: MIN_LEN, actual: 9 })
        );
        assert_matches!(
            decode("", &options()),
            Err(DecodeError::TooShort { actual: 0, .. })
        );
    }

    #[test]
    fn truncated_points() {
        // Declares 5 points but carries only 3.
        let truncated = &FIELD_5316[..FIELD_5316.len() - 64];
        assert_matches!(
            decode(truncated, &options()),
            Err(DecodeError::TooShort {
                needed: 97,
                actual: 65
            })
        );
    }

    #[test]
    fn invalid_hex() {
        assert_matches!(decode("01030", &options()), Err(DecodeError::InvalidHex(_)));
        assert_matches!(
            decode(&FIELD_5316.replace('E', "G"), &options()),
            Err(DecodeError::InvalidHex(_))
        );
    }

    #[test]
    fn invalid_byte_order() {
        let hex = format!("02{}", &FIELD_5316[2..]);
        assert_matches!(
            decode(&hex, &options()),
            Err(DecodeError::InvalidByteOrder(2))
        );
    }

    #[test]
    fn unsupported_geometry_types() {
        // LineString.
        let hex = format!("0102000020{}", &FIELD_5316[10..]);
        assert_matches!(
            decode(&hex, &options()),
            Err(DecodeError::UnsupportedGeometryType(0x2000_0002))
        );

        // Polygon Z.
        let hex = format!("01030000A0{}", &FIELD_5316[10..]);
        assert_matches!(
            decode(&hex, &options()),
            Err(DecodeError::UnsupportedGeometryType(_))
        );

        // ISO polygon Z.
        let hex = format!("01EB030000{}", &FIELD_5316[10..]);
        assert_matches!(
            decode(&hex, &options()),
            Err(DecodeError::UnsupportedGeometryType(1003))
        );
    }

    #[test]
    fn multiple_rings_are_unsupported() {
        let hex = FIELD_5316.replacen("E610000001000000", "E610000002000000", 1);
        assert_matches!(
            decode(&hex, &options()),
            Err(DecodeError::UnsupportedRingCount(2))
        );
    }

    #[test]
    fn point_count_limits() {
        let hex = FIELD_5316.replacen("0100000005000000", "0100000000000000", 1);
        assert_matches!(
            decode(&hex, &options()),
            Err(DecodeError::InvalidPointCount { count: 0, .. })
        );

        assert_matches!(
            decode(FIELD_5316, &options().with_max_point_count(4)),
            Err(DecodeError::InvalidPointCount { count: 5, max: 4 })
        );

        // A huge declared count is rejected before any allocation.
        let hex = FIELD_5316.replacen("0100000005000000", "01000000FFFFFFFF", 1);
        assert_matches!(
            decode(&hex, &options()),
            Err(DecodeError::InvalidPointCount {
                count: 0xFFFF_FFFF,
                ..
            })
        );
    }

    #[test]
    fn non_finite_points_are_collected() {
        let points = [
            RawPoint::new(57.65, -20.44),
            RawPoint::new(f64::NAN, -20.44),
            RawPoint::new(57.66, f64::INFINITY),
            RawPoint::new(57.66, -20.43),
        ];
        let decoded = decode(&encode_ring(&points, ByteOrder::LittleEndian, None), &options()).unwrap();

        assert_eq!(decoded.points, [points[0], points[3]]);
        assert_eq!(decoded.errors.len(), 2);
        assert_eq!(decoded.errors[0].index(), 1);
        assert_eq!(decoded.errors[1].index(), 2);
        assert_matches!(decoded.errors[0], PointError::InvalidCoordinate { .. });
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let decoded = decode(&format!("{FIELD_5316}00000000"), &options()).unwrap();
        assert_eq!(decoded.points.len(), 5);
    }
}
