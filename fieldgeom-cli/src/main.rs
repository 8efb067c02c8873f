//! Command line tool for importing field boundaries.
//!
//! Import a CSV file with `id,geometry` columns, where every geometry is either hex EWKB or WKT:
//!
//! ```shell
//! fieldgeom import fields.csv --min-lon 57 --max-lon 58 --min-lat -21 --max-lat -19
//! ```
//!
//! The import report is printed to stdout as JSON. Check a single geometry with
//!
//! ```shell
//! fieldgeom inspect "POLYGON((57.65 -20.44, 57.66 -20.44, 57.66 -20.43))" --config mauritius.json
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use fieldgeom::fieldgeom_types::{AxisOrder, GeoBounds};
use fieldgeom::import::{BatchImporter, ImportReport, MemoryStore, StoredField};
use fieldgeom::{to_axis_order, GeometryPipeline, PipelineConfig, ProcessedGeometry};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "fieldgeom")]
#[command(about = "Decode, validate and measure field boundary polygons")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import geometries from a CSV file with `id` and `geometry` columns
    Import {
        /// Path to the CSV file
        file: PathBuf,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Process a single geometry and print the polygon with its metrics
    Inspect {
        /// Hex EWKB or WKT geometry
        geometry: String,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

#[derive(Args)]
struct PipelineArgs {
    /// JSON file with the pipeline configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum longitude of the expected region
    #[arg(long, allow_hyphen_values = true)]
    min_lon: Option<f64>,

    /// Maximum longitude of the expected region
    #[arg(long, allow_hyphen_values = true)]
    max_lon: Option<f64>,

    /// Minimum latitude of the expected region
    #[arg(long, allow_hyphen_values = true)]
    min_lat: Option<f64>,

    /// Maximum latitude of the expected region
    #[arg(long, allow_hyphen_values = true)]
    max_lat: Option<f64>,

    /// Reject geometries that lost any point
    #[arg(long)]
    strict: bool,
}

impl PipelineArgs {
    fn to_config(&self) -> Result<PipelineConfig> {
        let base = match &self.config {
            Some(path) => Some(read_config(path)?),
            None => None,
        };

        let bounds = base.as_ref().map(|config| *config.bounds());
        let pick = |value: Option<f64>, from_config: fn(&GeoBounds) -> f64| {
            value.or_else(|| bounds.as_ref().map(from_config))
        };

        let (Some(min_lon), Some(max_lon), Some(min_lat), Some(max_lat)) = (
            pick(self.min_lon, GeoBounds::min_lon),
            pick(self.max_lon, GeoBounds::max_lon),
            pick(self.min_lat, GeoBounds::min_lat),
            pick(self.max_lat, GeoBounds::max_lat),
        ) else {
            bail!("bounds are required: use --config or all of --min-lon, --max-lon, --min-lat and --max-lat");
        };

        let bounds = GeoBounds::new(min_lon, max_lon, min_lat, max_lat)?;
        let mut config = match base {
            Some(config) => config.with_bounds(bounds),
            None => PipelineConfig::new(bounds),
        };
        if self.strict {
            config = config.with_allow_partial(false);
        }

        Ok(config)
    }
}

fn read_config(path: &Path) -> Result<PipelineConfig> {
    let file = File::open(path)
        .with_context(|| format!("failed to open config file {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("invalid config file {}", path.display()))
}

#[derive(Debug, Deserialize)]
struct Row {
    id: String,
    geometry: String,
}

/// Reads `(id, geometry)` pairs from CSV. Records that do not have both columns are skipped.
fn read_rows(reader: impl Read) -> Result<Vec<(String, String)>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = vec![];

    for (line, row) in reader.deserialize::<Row>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                log::warn!("Skipping CSV record {}: {err}", line + 1);
                continue;
            }
        };

        rows.push((row.id, row.geometry));
    }

    Ok(rows)
}

#[derive(Serialize)]
struct ImportOutput<'a> {
    report: &'a ImportReport,
    fields: BTreeMap<&'a str, &'a StoredField>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum InspectOutput {
    Processed {
        #[serde(rename = "latLon")]
        lat_lon: Vec<[f64; 2]>,
        processed: ProcessedGeometry,
    },
    Failed {
        error: String,
    },
}

fn import(file: &Path, pipeline: GeometryPipeline) -> Result<()> {
    let input =
        File::open(file).with_context(|| format!("failed to open {}", file.display()))?;
    let rows = read_rows(BufReader::new(input))
        .with_context(|| format!("failed to read {}", file.display()))?;

    let mut store = MemoryStore::new();
    let report = BatchImporter::new(pipeline).run_unsniffed(rows, &mut store);

    let output = ImportOutput {
        report: &report,
        fields: store.iter().collect(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn inspect(geometry: &str, pipeline: GeometryPipeline) -> Result<()> {
    let output = match pipeline.process_str(geometry) {
        Ok(processed) => InspectOutput::Processed {
            lat_lon: to_axis_order(&processed.polygon, AxisOrder::LatLon),
            processed,
        },
        Err(err) => InspectOutput::Failed {
            error: err.to_string(),
        },
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Commands::Import { file, pipeline } => {
            import(&file, GeometryPipeline::new(pipeline.to_config()?)?)
        }
        Commands::Inspect { geometry, pipeline } => {
            inspect(&geometry, GeometryPipeline::new(pipeline.to_config()?)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition() {
        Cli::command().debug_assert();
    }

    fn parse_args(args: &[&str]) -> PipelineArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Import { pipeline, .. } | Commands::Inspect { pipeline, .. } => pipeline,
        }
    }

    #[test]
    fn bounds_from_flags() {
        let args = parse_args(&[
            "fieldgeom", "import", "fields.csv", "--min-lon", "57", "--max-lon", "58", "--min-lat",
            "-21", "--max-lat", "-19", "--strict",
        ]);
        let config = args.to_config().unwrap();

        assert_eq!(*config.bounds(), GeoBounds::MAURITIUS);
        assert!(!config.allow_partial());
    }

    #[test]
    fn missing_bounds() {
        let args = parse_args(&["fieldgeom", "inspect", "POLYGON EMPTY", "--min-lon", "57"]);
        assert!(args.to_config().is_err());
    }

    #[test]
    fn inverted_bounds() {
        let args = parse_args(&[
            "fieldgeom", "inspect", "POLYGON EMPTY", "--min-lon", "58", "--max-lon", "57",
            "--min-lat", "-21", "--max-lat", "-19",
        ]);
        assert!(args.to_config().is_err());
    }

    #[test]
    fn csv_rows() {
        let csv = "id,geometry\n\
                   1,\"POLYGON((57.65 -20.44, 57.66 -20.44, 57.66 -20.43))\"\n\
                   2,0103000020E6100000\n\
                   3,not a geometry\n";
        let rows = read_rows(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].0, "1");
        assert_eq!(rows[1].1, "0103000020E6100000");
        assert_eq!(rows[2], ("3".to_string(), "not a geometry".to_string()));
    }

    #[test]
    fn malformed_csv_rows_are_skipped() {
        let csv = "id,geometry\n1\n2,\"POLYGON((1 2, 3 4, 5 6))\"\n";
        let rows = read_rows(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, "2");
    }
}
