use rastr::{describe_raster, image_to_raster, raster_to_image};
use std::path::PathBuf;
use tracing::{info, Level};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

#[cfg(not(debug_assertions))]
const DEFAULT_DEBUG_LEVEL: u8 = 1;
#[cfg(debug_assertions)]
const DEFAULT_DEBUG_LEVEL: u8 = 99;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Turn debugging information on
    #[arg(short, long, default_value_t = DEFAULT_DEBUG_LEVEL, action = clap::ArgAction::Count)]
    verbosity: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// prints a per-page summary of a raster stream
    #[command(name = "info")]
    Info {
        /// The raster stream
        ras_file: PathBuf,
    },

    /// converts the first page of a raster stream to a PNG image
    #[command(name = "rasimg")]
    RasterToImage {
        /// The raster stream
        ras_file: PathBuf,

        /// The output file name
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// converts a PNG image to a single-page raster stream
    #[command(name = "imgras")]
    ImageToRaster {
        /// The image
        img_file: PathBuf,
        /// The output file name
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn default_output(input: &PathBuf, suffix: &str) -> Result<PathBuf> {
    let mut output = PathBuf::new();
    let Some(dir) = input.parent() else {
        bail!("Invalid input file");
    };
    let Some(Some(filename)) = input.file_stem().map(|os| os.to_str()) else {
        bail!("Invalid input file");
    };
    output.push(dir);
    output.push(format!("{}.{}", filename, suffix));
    info!("output name: {}", output.display());
    Ok(output)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbosity {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_file(true)
        .with_line_number(true)
        .init();

    match cli.command {
        Commands::Info { ras_file } => {
            describe_raster(&ras_file)?;
        }
        Commands::RasterToImage { ras_file, output } => {
            let output = match output {
                Some(o) => o,
                None => default_output(&ras_file, "png")?,
            };
            raster_to_image(&ras_file, &output)?;
        }
        Commands::ImageToRaster { img_file, output } => {
            let output = match output {
                Some(o) => o,
                None => default_output(&img_file, "ras")?,
            };
            image_to_raster(&img_file, &output)?;
        }
    }
    Ok(())
}
