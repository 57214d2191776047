//! clean — CLI front end for the Geometry Cleaner, mirroring
//! `kml-conversion/conversion/clean.py`'s `cli`.
//!
//! Reads a GeoJSON FeatureCollection (`--input` or stdin), unions each
//! property group's polygons, tweezes slivers, and streams the cleaned
//! FeatureCollection to `--output` or stdout.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gr_core::Feature;

#[derive(Parser)]
#[command(about = "Union and clean a GeoJSON polygon FeatureCollection by property group")]
struct Args {
    /// Input GeoJSON (reads stdin if omitted)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output GeoJSON (writes stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(p) => fs::read_to_string(p).with_context(|| format!("reading {}", p.display())),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn parse_features(geojson_text: &str) -> Result<Vec<Feature>> {
    let parsed: geojson::GeoJson = geojson_text.parse().context("parsing GeoJSON")?;
    let collection = match parsed {
        geojson::GeoJson::FeatureCollection(fc) => fc,
        geojson::GeoJson::Feature(f) => geojson::FeatureCollection {
            bbox: None,
            features: vec![f],
            foreign_members: None,
        },
        geojson::GeoJson::Geometry(g) => geojson::FeatureCollection {
            bbox: None,
            features: vec![geojson::Feature {
                bbox: None,
                geometry: Some(g),
                id: None,
                properties: None,
                foreign_members: None,
            }],
            foreign_members: None,
        },
    };

    let mut features = Vec::with_capacity(collection.features.len());
    for raw in collection.features {
        let Some(geom) = raw.geometry else { continue };
        let geometry: geo_types::Geometry<f64> =
            geom.try_into().context("converting feature geometry")?;
        features.push(Feature::new(geometry, raw.properties.unwrap_or_default()));
    }
    Ok(features)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let text = read_input(args.input.as_ref())?;
    let features = parse_features(&text)?;
    log::info!("cleaning {} input features", features.len());

    let cleaned = gr_geom::clean_geometries(features).context("cleaning geometries")?;
    log::info!("cleaned down to {} feature groups", cleaned.len());

    match args.output {
        Some(path) => {
            let mut out = fs::File::create(&path)
                .with_context(|| format!("creating {}", path.display()))?;
            gr_geom::write_feature_collection(&mut out, &cleaned).context("writing output")?;
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            gr_geom::write_feature_collection(&mut out, &cleaned).context("writing output")?;
        }
    }

    Ok(())
}
