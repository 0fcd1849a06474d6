use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ffpress")]
#[command(about = "Batch video compressor driving ffmpeg", long_about = None)]
pub struct Cli {
    /// Video files to compress, in order. A directory expands to the video
    /// files inside it.
    #[arg(value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Directory where compressed outputs are written (created if missing)
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// CRF quality value: 0 = best quality/largest file, 51 = worst/smallest.
    /// Out-of-range values are clamped.
    #[arg(long)]
    pub crf: Option<i64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check if ffmpeg and ffprobe are installed
    CheckFfmpeg,

    /// Probe a video file for its readable frame count
    Probe {
        /// Path to the video file
        file: PathBuf,
    },

    /// Show config status and location, or create default config if missing
    InitConfig,
}

pub fn parse() -> Cli {
    Cli::parse()
}
