// pcmshift-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::Parser;
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "pcmshift: Batch audio re-encoding for video files",
    long_about = "Scans a directory for video files, re-encodes AAC audio to PCM (or another \
                  codec) and copies the video stream untouched, using ffmpeg and ffprobe."
)]
pub struct Cli {
    /// Directory containing the video files to convert
    #[arg(
        short = 'i',
        long = "input",
        value_name = "DIR",
        default_value = ".",
        env = "PCMSHIFT_INPUT"
    )]
    pub input_dir: PathBuf,

    /// Directory where converted files are written (defaults to the input directory)
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Target audio codec passed to ffmpeg; "lpcm" means pcm_s16le
    #[arg(
        short = 'a',
        long,
        value_name = "CODEC",
        default_value = "lpcm",
        env = "PCMSHIFT_AUDIO_CODEC"
    )]
    pub audio_codec: String,

    /// Output container extension (mov, mkv, mp4, ...)
    #[arg(
        short = 'f',
        long = "format",
        value_name = "EXT",
        default_value = "mov",
        env = "PCMSHIFT_FORMAT"
    )]
    pub container_format: String,

    /// Maximum number of ffmpeg processes running at once
    #[arg(
        short = 'j',
        long,
        value_name = "N",
        default_value_t = 1,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub jobs: u16,

    /// Show what would be done without running ffmpeg or touching any file
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Keep original files after a successful conversion
    #[arg(short = 'k', long)]
    pub keep_original: bool,

    /// Re-encode audio even when it is not AAC
    #[arg(short = 'F', long)]
    pub force: bool,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Optional: Directory for a timestamped run log file
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Print the run report as JSON after the summary
    #[arg(long)]
    pub json: bool,
}
