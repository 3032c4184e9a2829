use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

/// Raster footprint extraction CLI tool
#[derive(Parser)]
#[command(name = "footprint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Simplification tolerance in pixel units
    #[arg(
        short,
        long,
        env = "FOOTPRINT_SIMPLIFY_TOLERANCE",
        default_value = "0.5",
        global = true
    )]
    tolerance: f64,

    /// Minimum connected region area in pixels
    #[arg(
        short,
        long,
        env = "FOOTPRINT_MIN_REGION_AREA",
        default_value = "1",
        global = true
    )]
    min_area: u64,

    /// Pole closure for antimeridian-encircling rings: auto, north or south
    #[arg(
        short,
        long,
        env = "FOOTPRINT_POLE_POLICY",
        default_value = "auto",
        global = true
    )]
    pole_policy: String,

    /// Decimal places kept in output coordinates
    #[arg(long, env = "FOOTPRINT_PRECISION", default_value = "7", global = true)]
    precision: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the footprint of a single raster
    Extract {
        /// ASCII grid file path, or an http(s) URL
        input: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// EPSG code of the raster CRS
        #[arg(long, default_value = "4326")]
        epsg: u16,

        /// Wrap the geometry in a GeoJSON Feature with a source_url property
        #[arg(short, long)]
        feature: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Extract footprints for multiple rasters from a CSV manifest
    Batch {
        /// CSV manifest with an `input` column and an optional `epsg` column
        manifest: PathBuf,

        /// Output directory (manifest directory if not specified)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Display information about a raster without extracting a footprint
    Info {
        /// ASCII grid file path
        input: PathBuf,

        /// EPSG code of the raster CRS
        #[arg(long, default_value = "4326")]
        epsg: u16,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = commands::build_config(
        cli.tolerance,
        cli.min_area,
        &cli.pole_policy,
        cli.precision,
    )?;

    match cli.command {
        Commands::Extract {
            input,
            output,
            epsg,
            feature,
            pretty,
        } => commands::extract::run(&config, &input, output, epsg, feature, pretty),
        Commands::Batch {
            manifest,
            output_dir,
        } => commands::batch::run(&config, &manifest, output_dir),
        Commands::Info { input, epsg } => commands::info::run(&input, epsg),
    }
}
