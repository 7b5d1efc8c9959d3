//! Runoff CLI - least-cost-path flow routing from the command line

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use runoff_algorithms::hydrology::{
    lcp_routing, runoff, AccumulationMode, AccumulationParams, ElevationBand, RoutingParams,
    RoutingSummary, RunoffParams, FLAT_SATURATION,
};
use runoff_core::io::{read_geotiff, write_geotiff};
use runoff_core::Raster;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "runoff")]
#[command(author, version, about = "Least-cost-path runoff modelling", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a DEM file
    Info {
        /// Input DEM file
        input: PathBuf,
    },
    /// D8 flow direction by least-cost-path routing
    Route {
        /// Input DEM file (samples are floored to integers)
        input: PathBuf,
        /// Output file (D8 codes: N=10, NE=20, ... NW=80, outlets 0)
        output: PathBuf,
        /// Flat wet-area band as CENTER or CENTER:TOLERANCE (repeatable)
        #[arg(long = "flat-band")]
        flat_bands: Vec<String>,
    },
    /// Flow direction and flow accumulation in one pass
    Run {
        /// Input DEM file (samples are floored to integers)
        input: PathBuf,
        /// Output file for D8 flow directions
        directions: PathBuf,
        /// Output file for flow accumulation
        accumulation: PathBuf,
        /// Flat wet-area band as CENTER or CENTER:TOLERANCE (repeatable)
        #[arg(long = "flat-band")]
        flat_bands: Vec<String>,
        /// Accumulate transitive upstream area instead of direct inflow count
        #[arg(long)]
        contributing: bool,
        /// Accumulation value written into flat wet-area cells
        #[arg(long, default_value_t = FLAT_SATURATION)]
        flat_saturation: i32,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set default subscriber")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_dem(path: &PathBuf) -> Result<Raster<i32>> {
    let pb = spinner("Reading DEM...");
    let raster: Raster<i32> = read_geotiff(path).context("Failed to read DEM")?;
    pb.finish_and_clear();
    info!("Input: {} x {}", raster.cols(), raster.rows());
    Ok(raster)
}

fn write_result(raster: &Raster<i32>, path: &PathBuf) -> Result<()> {
    let pb = spinner("Writing output...");
    write_geotiff(raster, path).context("Failed to write output")?;
    pb.finish_and_clear();
    Ok(())
}

fn done(name: &str, path: &PathBuf, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn parse_bands(values: &[String]) -> Result<Vec<ElevationBand>> {
    values
        .iter()
        .map(|s| {
            s.parse::<ElevationBand>()
                .with_context(|| format!("Invalid flat band: {}", s))
        })
        .collect()
}

fn report(summary: &RoutingSummary) {
    info!(
        "Seeds: {} ({} flat), directions assigned: {}",
        summary.seeds, summary.flat_seeds, summary.assigned
    );
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input } => {
            let raster = read_dem(&input)?;
            let (rows, cols) = raster.shape();
            let bounds = raster.bounds();
            let gt = raster.transform().to_gdal();
            let stats = raster.statistics();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
            println!("Origin: ({:.6}, {:.6})", gt[0], gt[3]);
            println!("Pixel size: ({:.6}, {:.6})", gt[1], gt[5]);
            println!(
                "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                bounds.0, bounds.1, bounds.2, bounds.3
            );
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
        }

        // ── Route ────────────────────────────────────────────────────
        Commands::Route {
            input,
            output,
            flat_bands,
        } => {
            let bands = parse_bands(&flat_bands)?;
            let dem = read_dem(&input)?;
            let start = Instant::now();
            let routing = lcp_routing(&dem, &RoutingParams { bands })
                .context("Failed to route flow")?;
            let elapsed = start.elapsed();
            report(&routing.summary);
            write_result(&routing.directions, &output)?;
            done("Flow direction", &output, elapsed);
        }

        // ── Run ──────────────────────────────────────────────────────
        Commands::Run {
            input,
            directions,
            accumulation,
            flat_bands,
            contributing,
            flat_saturation,
        } => {
            let bands = parse_bands(&flat_bands)?;
            let mode = if contributing {
                AccumulationMode::Contributing
            } else {
                AccumulationMode::InflowDegree
            };
            let params = RunoffParams {
                routing: RoutingParams { bands },
                accumulation: AccumulationParams {
                    mode,
                    flat_saturation,
                },
            };

            let dem = read_dem(&input)?;
            let start = Instant::now();
            let result = runoff(&dem, &params).context("Failed to model runoff")?;
            let elapsed = start.elapsed();
            report(&result.summary);
            write_result(&result.directions, &directions)?;
            write_result(&result.accumulation, &accumulation)?;
            done("Flow direction", &directions, elapsed);
            done("Flow accumulation", &accumulation, elapsed);
        }
    }

    Ok(())
}
