//! Batch import of field geometries into a store.

use std::collections::BTreeMap;

use fieldgeom_codec::{wkt, RawGeometryPayload};
use fieldgeom_types::GeoPoint2d;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{PipelineError, RecordError, StoreError};
use crate::pipeline::{GeometryPipeline, ProcessedGeometry};

/// One geometry to import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    /// Field id.
    pub id: String,
    /// Geometry as read from the source.
    pub payload: RawGeometryPayload,
}

impl ImportRecord {
    /// Creates a new record.
    pub fn new(id: impl Into<String>, payload: RawGeometryPayload) -> Self {
        Self {
            id: id.into(),
            payload,
        }
    }
}

/// Field geometry in the form it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredField {
    /// Polygon as WKT in `(lon, lat)` order.
    pub wkt: String,
    /// Spatial reference id of the source payload.
    pub srid: Option<u32>,
    /// Area in hectares.
    pub area_hectares: f64,
    /// Vertex centroid.
    pub centroid: GeoPoint2d,
}

impl From<&ProcessedGeometry> for StoredField {
    fn from(value: &ProcessedGeometry) -> Self {
        Self {
            wkt: wkt::encode(&value.polygon),
            srid: value.srid,
            area_hectares: value.metrics.area_hectares,
            centroid: value.metrics.centroid,
        }
    }
}

/// Persistence layer that accepts processed fields.
pub trait FieldStore {
    /// Stores the field under the given id.
    fn put(&mut self, id: &str, field: &StoredField) -> Result<(), StoreError>;
}

/// In-memory [`FieldStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    fields: BTreeMap<String, StoredField>,
    insert_only: bool,
}

impl MemoryStore {
    /// Creates an empty store that replaces existing fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that refuses to replace existing fields.
    pub fn insert_only() -> Self {
        Self {
            insert_only: true,
            ..Default::default()
        }
    }

    /// Stored field with the given id.
    pub fn get(&self, id: &str) -> Option<&StoredField> {
        self.fields.get(id)
    }

    /// Number of stored fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Store is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over stored fields ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StoredField)> {
        self.fields.iter().map(|(id, field)| (id.as_str(), field))
    }
}

impl FieldStore for MemoryStore {
    fn put(&mut self, id: &str, field: &StoredField) -> Result<(), StoreError> {
        if self.insert_only && self.fields.contains_key(id) {
            return Err(StoreError::Conflict { id: id.to_string() });
        }

        self.fields.insert(id.to_string(), field.clone());
        Ok(())
    }
}

/// Record that could not be imported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportFailure {
    /// Field id.
    pub id: String,
    /// Reason.
    #[serde(serialize_with = "serialize_display")]
    pub error: RecordError,
}

fn serialize_display<S: Serializer>(error: &RecordError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Outcome of a batch import.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    /// Ids of the imported fields, in input order.
    pub imported: Vec<String>,
    /// Ids of imported fields that lost some points on the way.
    pub partial: Vec<String>,
    /// Records that were not imported.
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    /// Number of processed records.
    pub fn total(&self) -> usize {
        self.imported.len() + self.failures.len()
    }
}

/// Runs a [`GeometryPipeline`] over many records. A failing record does not stop the batch.
#[derive(Debug, Clone)]
pub struct BatchImporter {
    pipeline: GeometryPipeline,
}

impl BatchImporter {
    /// Creates a new importer.
    pub fn new(pipeline: GeometryPipeline) -> Self {
        Self { pipeline }
    }

    /// Processes all records and writes successful ones to `store`.
    pub fn run(
        &self,
        records: impl IntoIterator<Item = ImportRecord>,
        store: &mut impl FieldStore,
    ) -> ImportReport {
        let entries = records
            .into_iter()
            .map(|record| (record.id, Ok(record.payload)));
        self.run_entries(entries, store)
    }

    /// Same as [`BatchImporter::run`] for `(id, geometry)` pairs whose encoding is detected with
    /// [`RawGeometryPayload::sniff`]. Unrecognized geometries are reported at their position in the input.
    pub fn run_unsniffed(
        &self,
        rows: impl IntoIterator<Item = (String, String)>,
        store: &mut impl FieldStore,
    ) -> ImportReport {
        let entries = rows.into_iter().map(|(id, geometry)| {
            let payload = RawGeometryPayload::sniff(&geometry).map_err(PipelineError::from);
            (id, payload)
        });
        self.run_entries(entries, store)
    }

    fn run_entries(
        &self,
        entries: impl Iterator<Item = (String, Result<RawGeometryPayload, PipelineError>)>,
        store: &mut impl FieldStore,
    ) -> ImportReport {
        let mut report = ImportReport::default();

        for (id, payload) in entries {
            let result = payload
                .map_err(RecordError::from)
                .and_then(|payload| self.import_one(&id, &payload, store));
            match result {
                Ok(processed) => {
                    if processed.is_partial() {
                        report.partial.push(id.clone());
                    }
                    report.imported.push(id);
                }
                Err(error) => {
                    log::warn!("Failed to import field {id}: {error}");
                    report.failures.push(ImportFailure { id, error });
                }
            }
        }

        log::info!(
            "Imported {} of {} fields ({} partial, {} failed)",
            report.imported.len(),
            report.total(),
            report.partial.len(),
            report.failures.len()
        );

        report
    }

    fn import_one(
        &self,
        id: &str,
        payload: &RawGeometryPayload,
        store: &mut impl FieldStore,
    ) -> Result<ProcessedGeometry, RecordError> {
        let processed = self.pipeline.process(payload)?;
        store.put(id, &StoredField::from(&processed))?;
        Ok(processed)
    }
}
