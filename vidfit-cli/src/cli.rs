// vidfit-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use vidfit_core::Rotation;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "vidfit: batch-fit videos onto a fixed-geometry display",
    long_about = "Converts videos to a small fixed-geometry display using ffmpeg, \
                  removing black bars, burning in subtitles and minimizing visible \
                  distortion."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Converts video files from an input directory to an output directory
    Convert(ConvertArgs),
}

#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Directory searched recursively for input videos
    #[arg(short = 'i', long = "input", required = true, value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Directory where converted files will be saved
    #[arg(short = 'o', long = "output", required = true, value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Rotate the output 90 degrees in the given direction
    #[arg(long, value_enum, value_name = "DIRECTION")]
    pub rotate: Option<RotateDirection>,

    /// Disable automatic black bar detection
    #[arg(long)]
    pub no_bar_detect: bool,

    /// Override the x264 encoder preset
    #[arg(long, value_name = "PRESET")]
    pub preset: Option<String>,

    /// Override the CRF quality value
    #[arg(long, value_name = "CRF", value_parser = clap::value_parser!(u8).range(0..=51))]
    pub crf: Option<u8>,

    /// Cap the encoder's worker threads (defaults to the available cores)
    #[arg(long, value_name = "COUNT")]
    pub threads: Option<usize>,

    /// Emit progress as JSON lines instead of a progress bar
    #[arg(long)]
    pub json_progress: bool,
}

/// Rotation direction as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RotateDirection {
    #[value(alias = "cw")]
    Clockwise,
    #[value(alias = "ccw")]
    Counterclockwise,
}

impl From<RotateDirection> for Rotation {
    fn from(direction: RotateDirection) -> Self {
        match direction {
            RotateDirection::Clockwise => Rotation::Clockwise,
            RotateDirection::Counterclockwise => Rotation::Counterclockwise,
        }
    }
}
