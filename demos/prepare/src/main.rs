//! prepare — CLI front end for the Vertex Clusterer / Edge Builder
//! pipeline, mirroring `routing/routing/prepare.py`'s `cli`.
//!
//! Reads a GeoJSON FeatureCollection of (Multi)LineStrings, either from
//! `--input` or stdin, clusters near-coincident vertices, builds a routable
//! graph, and writes it to OUTPUT in the format `gr-service` loads at
//! startup.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use geo_types::Geometry;
use gr_graph::DEFAULT_CLUSTER_THRESHOLD_M;

#[derive(Parser)]
#[command(about = "Prepare GeoJSON line input into a routable graph")]
struct Args {
    /// Input GeoJSON (reads stdin if omitted)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Vertex-clustering threshold, in meters
    #[arg(long, default_value_t = DEFAULT_CLUSTER_THRESHOLD_M)]
    threshold: f64,

    /// Output path for the prepared graph
    output: PathBuf,
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(p) => fs::read_to_string(p).with_context(|| format!("reading {}", p.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn extract_lines(geojson_text: &str) -> Result<Vec<geo_types::LineString<f64>>> {
    let parsed: geojson::GeoJson = geojson_text.parse().context("parsing GeoJSON")?;
    let collection = geojson::quick_collection(&parsed).context("converting GeoJSON to geometries")?;

    let mut lines = Vec::new();
    for geometry in collection {
        match geometry {
            Geometry::LineString(l) => lines.push(l),
            Geometry::MultiLineString(ml) => lines.extend(ml.0),
            other => bail!("expected LineString or MultiLineString input, found {other:?}"),
        }
    }
    Ok(lines)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let text = read_input(args.input.as_ref())?;
    let lines = extract_lines(&text)?;
    log::info!("preparing graph from {} input lines", lines.len());

    let graph = gr_graph::prepare(lines, args.threshold).context("building graph")?;
    log::info!(
        "prepared graph: {} nodes, {} directed edges",
        graph.node_count(),
        graph.edge_count()
    );

    let mut out = fs::File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    gr_service::save_graph(&graph, &mut out).context("writing prepared graph")?;

    Ok(())
}
