extern crate clap;

use clap::Parser;
use error_stack::{Report, ResultExt};
use rayon::ThreadPoolBuilder;

use road_compress::error::RoadError;
use road_compress::roads::{RoadCollection, DEFAULT_EPSILON};

#[derive(Parser)]
struct Opts {
    /// Path to the JSON file mapping road names to point lists
    input: String,

    /// Path of the compressed JSON to write
    output: String,

    /// Maximum perpendicular deviation of a dropped point
    #[clap(short, long, default_value_t = DEFAULT_EPSILON, allow_negative_numbers = true)]
    epsilon: f64,

    /// Number of CPU threads
    #[clap(short, long, default_value = "4")]
    ncpu: usize,

    /// Also write the compressed roads as a GeoJSON FeatureCollection
    #[clap(long)]
    geojson: Option<String>,

    /// Also write a CSV report of point counts per road
    #[clap(long)]
    report: Option<String>,
}

fn main() -> Result<(), Report<RoadError>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts: Opts = Opts::parse();

    if !(opts.epsilon.is_finite() && opts.epsilon >= 0.0) {
        log::warn!("epsilon {} is not a finite non-negative number", opts.epsilon);
    }

    ThreadPoolBuilder::new()
        .num_threads(opts.ncpu)
        .build_global()
        .change_context(RoadError::Config)
        .attach_printable("building the thread pool")?;

    let collection = RoadCollection::read(&opts.input)?;

    let compressed = collection.compress(opts.epsilon);
    compressed.write_json(&opts.output)?;

    if let Some(path) = &opts.geojson {
        compressed.write_geojson(path)?;
    }
    if let Some(path) = &opts.report {
        compressed.write_report_csv(path)?;
    }

    log::info!(
        "wrote {} roads to {} ({} skipped)",
        compressed.roads.len(), opts.output, collection.failures.len()
    );

    Ok(())
}
