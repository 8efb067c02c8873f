//! Fieldgeom turns field boundary geometries, as they are stored in databases and import files, into validated
//! polygons with known axis order, and computes their area and centroid.
//!
//! # Processing steps
//!
//! 1. A [`RawGeometryPayload`](fieldgeom_codec::RawGeometryPayload) (hex EWKB or WKT) is decoded by
//!    [`fieldgeom_codec`] into raw coordinate pairs.
//! 2. The [`AxisOrderResolver`] decides which component of each pair is longitude, by checking which interpretation
//!    puts the points inside the expected region.
//! 3. The [`BoundsValidator`] drops points outside the region, closes the ring and builds a
//!    [`CanonicalPolygon`](fieldgeom_types::CanonicalPolygon).
//! 4. [`FieldMetrics`] computes area, centroid and perimeter.
//!
//! [`GeometryPipeline`] runs all of these under one [`PipelineConfig`], and [`BatchImporter`](import::BatchImporter)
//! runs the pipeline over many records. Consumers that want `(lat, lon)` coordinates use the [`adapter`].
//!
//! Nothing here panics on malformed input. Problems with a whole geometry are returned as errors, problems with single
//! points are reported next to the result.

pub mod adapter;
mod config;
pub mod error;
pub mod import;
pub mod metrics;
mod pipeline;
pub mod resolver;
pub mod validation;

pub use adapter::{to_axis_order, RenderTarget, ToRenderTarget};
pub use config::{AmbiguityPolicy, PipelineConfig};
pub use metrics::{FieldMetrics, GeometryMetrics};
pub use pipeline::{GeometryPipeline, ProcessedGeometry};
pub use resolver::{AxisOrderResolver, ResolvedRing};
pub use validation::{BoundsValidator, ValidationOutcome};

// Reexport geometry crates
pub use fieldgeom_codec;
pub use fieldgeom_types;
