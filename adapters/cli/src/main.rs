#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the raster life simulation.
//!
//! All configuration lives here: the core stays deterministic, so the random
//! start grid is seeded in this adapter and handed to the controller as an
//! explicit literal. Snapshots land in a file-backed raster store and frame
//! notifications print to stdout unless suppressed.

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use raster_life_core::{FrameSink, GeoPoint, GeoReference, GridSize, RasterBand, Srid};
use raster_life_grid::{Grid, GridSource};
use raster_life_sim::{SimOptions, Simulation};
use raster_life_store::FileStore;

/// Command-line options recognized by the simulation.
#[derive(Debug, Parser)]
#[command(name = "raster-life", about = "Georeferenced game of life over a raster store")]
struct Args {
    /// Number of reporting intervals to simulate.
    #[arg(long, default_value_t = 10)]
    steps: u64,

    /// Raw cycles grouped into one reporting interval.
    #[arg(long, default_value_t = 1)]
    interval: u64,

    /// Grid width in cells for generated start grids.
    #[arg(long, default_value_t = 25)]
    width: u32,

    /// Grid height in cells for generated start grids.
    #[arg(long, default_value_t = 25)]
    height: u32,

    /// Spatial reference identifier attached to generated grids.
    #[arg(long, default_value_t = 4326)]
    srid: u32,

    /// Horizontal coordinate of the grid origin.
    #[arg(long, default_value_t = 0.0)]
    origin_x: f64,

    /// Vertical coordinate of the grid origin.
    #[arg(long, default_value_t = 0.0)]
    origin_y: f64,

    /// Cell width in geographic units.
    #[arg(long, default_value_t = 1.0)]
    cell_width: f64,

    /// Cell height in geographic units; negative for north-up rasters.
    #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
    cell_height: f64,

    /// Milliseconds to pause after each externalized interval.
    #[arg(long, default_value_t = 650)]
    delay_ms: u64,

    /// Keep a uniquely numbered snapshot per interval instead of one slot.
    #[arg(long)]
    keep_history: bool,

    /// Directory receiving externalized snapshots.
    #[arg(long, default_value = "life_output")]
    output: PathBuf,

    /// Identifier of a stored raster to start from instead of a random fill.
    #[arg(long)]
    start_raster: Option<String>,

    /// Band read from the start raster.
    #[arg(long, default_value_t = 1)]
    band: u32,

    /// Seed for the random start grid; entropy-seeded when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Style hint forwarded with frame notifications.
    #[arg(long, default_value = "classic")]
    style: String,

    /// Suppress frame notifications on stdout.
    #[arg(long)]
    quiet: bool,
}

/// Frame sink that reports externalized generations on stdout.
#[derive(Debug, Default)]
struct ConsoleSink;

impl FrameSink for ConsoleSink {
    fn frame_ready(&mut self, identifier: &str, style_hint: &str) {
        println!("frame ready: {identifier} [{style_hint}]");
    }
}

fn random_rows(size: GridSize, rng: &mut ChaCha8Rng) -> Vec<Vec<f64>> {
    (0..size.rows())
        .map(|_| {
            (0..size.columns())
                .map(|_| f64::from(rng.gen_range(0..=1_u32)))
                .collect()
        })
        .collect()
}

/// Entry point for the raster life command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();

    let geo = GeoReference::new(
        GeoPoint::new(args.origin_x, args.origin_y),
        args.cell_width,
        args.cell_height,
        Srid::new(args.srid),
    );
    let size = GridSize::new(args.width, args.height);

    let store = FileStore::open(&args.output)
        .with_context(|| format!("opening raster store at {}", args.output.display()))?;

    let source = match args.start_raster {
        Some(identifier) => GridSource::Loaded {
            identifier,
            band: RasterBand::new(args.band),
        },
        None => {
            let mut rng = args
                .seed
                .map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
            GridSource::Literal {
                values: random_rows(size, &mut rng),
            }
        }
    };
    let start = Grid::from_source(source, size, geo, &store).context("building start grid")?;

    let options = SimOptions {
        overwrite: !args.keep_history,
        pacing: Duration::from_millis(args.delay_ms),
        style_hint: args.style,
    };
    let sink = if args.quiet { None } else { Some(ConsoleSink) };

    let mut simulation = Simulation::new(start, store, sink, options)
        .context("externalizing the start grid")?;
    let report = simulation
        .run(args.steps, args.interval)
        .context("running the simulation")?;

    println!(
        "completed {} cycles, cycle count {}, average step {:?}",
        report.raw_cycles(),
        simulation.cycle_count(),
        report.average_step()
    );
    Ok(())
}
