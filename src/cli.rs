//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use firmware_downloader_core::DEFAULT_BASE_URL;

/// Discover head-unit product models and download their firmware.
///
/// Sweeps the vendor catalog A-Z, resolves every published firmware release
/// and saves it under `<output-dir>/<model>/`.
#[derive(Parser, Debug)]
#[command(name = "firmware-downloader")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Download root (default: firmware__YYYYMMDD for today's date)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Delay after every request in milliseconds (0 to disable, max 600000)
    #[arg(short = 'd', long, default_value_t = 5000, value_parser = clap::value_parser!(u64).range(0..=600_000))]
    pub delay_ms: u64,

    /// Base URL of the catalog API
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}
