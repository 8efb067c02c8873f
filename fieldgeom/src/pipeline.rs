use fieldgeom_codec::{PointError, RawGeometryPayload};
use fieldgeom_types::{AxisOrder, CanonicalPolygon, GeoBounds};
use serde::Serialize;

use crate::config::{AmbiguityPolicy, PipelineConfig};
use crate::error::PipelineError;
use crate::metrics::{FieldMetrics, GeometryMetrics};
use crate::resolver::AxisOrderResolver;
use crate::validation::{BoundsValidator, RejectedPoint};

/// Polygon with everything that was learned while producing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedGeometry {
    /// Closed ring in `(lon, lat)` order.
    pub polygon: CanonicalPolygon,
    /// Area, centroid and perimeter of the polygon.
    pub metrics: GeometryMetrics,
    /// Spatial reference id from the payload.
    pub srid: Option<u32>,
    /// Axis order the payload turned out to use.
    pub axis_order: AxisOrder,
    /// The payload ring was open and got closed.
    pub ring_closed: bool,
    /// Points the decoder could not read.
    pub point_errors: Vec<PointError>,
    /// Points the validator dropped.
    pub rejected: Vec<RejectedPoint>,
}

impl ProcessedGeometry {
    /// Number of points left out of the polygon.
    pub fn dropped(&self) -> usize {
        self.point_errors.len() + self.rejected.len()
    }

    /// Some points were left out of the polygon.
    pub fn is_partial(&self) -> bool {
        self.dropped() > 0
    }
}

/// Turns raw payloads into canonical polygons: decode, resolve the axis order, validate, compute metrics.
///
/// ```
/// use fieldgeom::{GeometryPipeline, PipelineConfig};
/// use fieldgeom::fieldgeom_codec::RawGeometryPayload;
/// use fieldgeom::fieldgeom_types::GeoBounds;
///
/// let pipeline = GeometryPipeline::new(PipelineConfig::new(GeoBounds::MAURITIUS)).unwrap();
/// let processed = pipeline
///     .process(&RawGeometryPayload::text("POLYGON((57.65 -20.44, 57.66 -20.44, 57.66 -20.43))"))
///     .unwrap();
///
/// assert!(processed.ring_closed);
/// assert_eq!(processed.polygon.len(), 4);
/// assert!(processed.metrics.area_hectares > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct GeometryPipeline {
    config: PipelineConfig,
    resolver: AxisOrderResolver,
    validator: BoundsValidator,
}

impl GeometryPipeline {
    /// Creates a new pipeline. Fails if the configured bounds are inverted or not finite.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        let bounds = config.bounds();
        let bounds = GeoBounds::new(
            bounds.min_lon(),
            bounds.max_lon(),
            bounds.min_lat(),
            bounds.max_lat(),
        )?;

        Ok(Self {
            config,
            resolver: AxisOrderResolver::new(bounds),
            validator: BoundsValidator::new(bounds),
        })
    }

    /// Pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Processes one payload.
    pub fn process(
        &self,
        payload: &RawGeometryPayload,
    ) -> Result<ProcessedGeometry, PipelineError> {
        let decoded = payload.decode(&self.config.decode_options())?;

        let hint = match self.config.ambiguity() {
            AmbiguityPolicy::Reject => None,
            AmbiguityPolicy::TrustDeclared => decoded.declared_order,
            AmbiguityPolicy::Prefer(order) => Some(order),
        };
        let resolved = self.resolver.resolve_with_hint(&decoded.points, hint)?;
        let outcome = self.validator.validate(&resolved.points)?;

        let dropped = decoded.errors.len() + outcome.rejected.len();
        if dropped > 0 && !self.config.allow_partial() {
            return Err(PipelineError::PartialGeometry { dropped });
        }

        Ok(ProcessedGeometry {
            metrics: outcome.polygon.metrics(),
            polygon: outcome.polygon,
            srid: decoded.srid,
            axis_order: resolved.order,
            ring_closed: outcome.ring_closed,
            point_errors: decoded.errors,
            rejected: outcome.rejected,
        })
    }

    /// Processes a geometry string of unknown encoding. See [`RawGeometryPayload::sniff`].
    pub fn process_str(&self, value: &str) -> Result<ProcessedGeometry, PipelineError> {
        self.process(&RawGeometryPayload::sniff(value)?)
    }
}
