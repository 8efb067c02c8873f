use serde::{Deserialize, Serialize};

/// Order in which the two components of a coordinate pair are written.
///
/// Producers disagree about this: OGC binary and text encodings put longitude (easting) first, while many mapping
/// libraries and some database exports put latitude first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AxisOrder {
    /// `(longitude, latitude)`. This is the canonical order used inside the crate.
    LonLat,
    /// `(latitude, longitude)`.
    LatLon,
}

impl AxisOrder {
    /// The opposite assignment.
    pub fn swapped(self) -> Self {
        match self {
            AxisOrder::LonLat => AxisOrder::LatLon,
            AxisOrder::LatLon => AxisOrder::LonLat,
        }
    }
}

impl std::fmt::Display for AxisOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AxisOrder::LonLat => write!(f, "lon-lat"),
            AxisOrder::LatLon => write!(f, "lat-lon"),
        }
    }
}
