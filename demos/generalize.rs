use clap::Parser;
use geo_generalize::{Dataset, Feature, Generalizer};
use geojson::{FeatureCollection, GeoJson, Geometry, Value};
use std::convert::TryInto;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input GeoJSON file (Polygons)
    #[arg(short, long)]
    input: PathBuf,

    /// Output GeoJSON file (simplified Polygons)
    #[arg(short, long)]
    output: PathBuf,

    /// Simplification tolerance, in the units of the input coordinates
    #[arg(short, long)]
    tolerance: f64,

    /// Area-ratio threshold for the lossy-drop warning
    #[arg(long, default_value_t = 5.0)]
    drop_ratio: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    println!("Reading input from {:?}", args.input);
    let file = File::open(&args.input)?;
    let reader = BufReader::new(file);
    let geojson: GeoJson = serde_json::from_reader(reader)?;

    // Attribute schemas are a vector-format concern; this demo carries
    // geometry only.
    let mut dataset = Dataset::new(None, vec![]);
    let mut skipped = 0;

    if let GeoJson::FeatureCollection(fc) = geojson {
        for feature in fc.features {
            if let Some(geom) = feature.geometry {
                let geo_geom: geo_types::Geometry<f64> = geom.try_into()?;
                match geo_geom {
                    geo_types::Geometry::Polygon(p) => dataset.push(Feature {
                        geometry: p,
                        values: vec![],
                    }),
                    geo_types::Geometry::MultiPolygon(mp) => {
                        for p in mp {
                            dataset.push(Feature {
                                geometry: p,
                                values: vec![],
                            });
                        }
                    }
                    _ => skipped += 1,
                }
            }
        }
    } else {
        return Err("expected a GeoJSON FeatureCollection of Polygons".into());
    }

    if skipped > 0 {
        println!("Ignored {} non-polygon geometries.", skipped);
    }

    println!(
        "Loaded {} polygons. Generalizing with tolerance {}...",
        dataset.len(),
        args.tolerance
    );

    let result = Generalizer::new(args.tolerance)
        .with_drop_ratio(args.drop_ratio)
        .run(&dataset)?;

    println!(
        "Kept {} of {} polygons.",
        result.len(),
        dataset.len()
    );

    let features: Vec<geojson::Feature> = result
        .features
        .into_iter()
        .map(|f| geojson::Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::from(&f.geometry))),
            id: None,
            properties: None,
            foreign_members: None,
        })
        .collect();

    let output_fc = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    let file = File::create(&args.output)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &GeoJson::FeatureCollection(output_fc))?;

    println!("Wrote output to {:?}", args.output);

    Ok(())
}
