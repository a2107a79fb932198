//! Command-line configuration for the binary.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::Parser;

use crate::types::FALL_INTERVAL_MS;

#[derive(Parser, Debug, Clone)]
#[command(name = "tetris-cli", version, about = "Falling-block puzzle in the terminal")]
pub struct Args {
    /// Gravity period in milliseconds (one row per period).
    #[arg(long, default_value_t = FALL_INTERVAL_MS, value_parser = clap::value_parser!(u64).range(1..))]
    pub fall_ms: u64,

    /// Piece sequence seed. If omitted, one is derived from the system clock.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Write logs to this file. Nothing is logged without it.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Draw every block in one color.
    #[arg(long)]
    pub mono: bool,
}

impl Args {
    pub fn fall_interval(&self) -> Duration {
        Duration::from_millis(self.fall_ms)
    }

    /// The configured seed, or one taken from the clock.
    pub fn resolve_seed(&self) -> u32 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
                .unwrap_or(1)
        })
    }
}
