use fieldgeom_codec::{DecodeOptions, DEFAULT_MAX_POINT_COUNT};
use fieldgeom_types::{AxisOrder, GeoBounds};
use serde::{Deserialize, Serialize};

/// What to do when both axis orders put the same number of points inside the bounds.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AmbiguityPolicy {
    /// Fail with [`AxisOrderError::Ambiguous`](crate::error::AxisOrderError::Ambiguous).
    Reject,
    /// Use the order the encoding prescribes. Fails if the encoding prescribes none, as WKT does.
    #[default]
    TrustDeclared,
    /// Use the given order.
    Prefer(AxisOrder),
}

/// Configuration of a [`GeometryPipeline`](crate::GeometryPipeline).
///
/// There is no default region: the bounds must always be given explicitly. Other values have defaults, so a JSON
/// configuration may be as short as
///
/// ```json
/// { "bounds": { "minLon": 57.0, "maxLon": 58.0, "minLat": -21.0, "maxLat": -19.0 } }
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    bounds: GeoBounds,
    #[serde(default = "default_max_point_count")]
    max_point_count: usize,
    #[serde(default)]
    ambiguity: AmbiguityPolicy,
    #[serde(default = "default_allow_partial")]
    allow_partial: bool,
}

fn default_max_point_count() -> usize {
    DEFAULT_MAX_POINT_COUNT
}

fn default_allow_partial() -> bool {
    true
}

impl PipelineConfig {
    /// Creates a configuration for data expected inside `bounds`, with default values for everything else.
    pub fn new(bounds: GeoBounds) -> Self {
        Self {
            bounds,
            max_point_count: default_max_point_count(),
            ambiguity: AmbiguityPolicy::default(),
            allow_partial: default_allow_partial(),
        }
    }

    /// Region where the points are expected to be. Used both to resolve the axis order and to reject points.
    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    /// Sets region where the points are expected to be.
    pub fn with_bounds(mut self, bounds: GeoBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Maximum number of points in one geometry. Default is `10 000`.
    pub fn max_point_count(&self) -> usize {
        self.max_point_count
    }

    /// Sets maximum number of points in one geometry.
    pub fn with_max_point_count(mut self, max_point_count: usize) -> Self {
        self.max_point_count = max_point_count;
        self
    }

    /// Handling of geometries with equally plausible axis orders.
    pub fn ambiguity(&self) -> AmbiguityPolicy {
        self.ambiguity
    }

    /// Sets handling of geometries with equally plausible axis orders.
    pub fn with_ambiguity(mut self, ambiguity: AmbiguityPolicy) -> Self {
        self.ambiguity = ambiguity;
        self
    }

    /// If `false`, a geometry with any dropped point is an error. Default is `true`.
    pub fn allow_partial(&self) -> bool {
        self.allow_partial
    }

    /// Sets whether a geometry with dropped points is accepted.
    pub fn with_allow_partial(mut self, allow_partial: bool) -> Self {
        self.allow_partial = allow_partial;
        self
    }

    /// Options for the decoders.
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions::default().with_max_point_count(self.max_point_count)
    }
}
