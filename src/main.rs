//! # mzPeakList CLI
//!
//! ```bash
//! # Write a demo container
//! mzpeaklist demo demo_run.mzpl --scans 3 --snapshots 2
//!
//! # Inspect, validate and dump it
//! mzpeaklist info demo_run.mzpl
//! mzpeaklist validate demo_run.mzpl
//! mzpeaklist dump demo_run.mzpl --scan 0 --time-index -1
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
