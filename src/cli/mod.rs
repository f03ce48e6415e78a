use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod demo;
mod dump;
mod info;
mod validate;

/// mzPeakList - annotated peak list containers
#[derive(Parser)]
#[command(name = "mzpeaklist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write synthetic annotated peak lists to a container
    Demo {
        /// Output container path
        #[arg(value_name = "OUTPUT", default_value = "demo_run.mzpl")]
        output: PathBuf,

        /// Number of scans to generate
        #[arg(short = 's', long, default_value = "3")]
        scans: i64,

        /// Snapshots written per scan
        #[arg(short = 'n', long, default_value = "1")]
        snapshots: usize,

        /// Generate profile-mode scans with a raw profile
        #[arg(long)]
        profile_mode: bool,

        /// Load export settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Compression level for ZSTD (1-22, overrides the config file)
        #[arg(short = 'c', long)]
        compression_level: Option<i32>,
    },

    /// Display scans, snapshots and root attributes of a container
    Info {
        /// Container path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Validate container integrity
    Validate {
        /// Container path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print one snapshot's records as JSON lines
    Dump {
        /// Container path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Scan label
        #[arg(short = 's', long)]
        scan: String,

        /// Time index (-1 for the newest snapshot)
        #[arg(short = 't', long, default_value = "-1", allow_hyphen_values = true)]
        time_index: i64,

        /// Print the settings snapshot before the records
        #[arg(long)]
        settings: bool,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Demo {
            output,
            scans,
            snapshots,
            profile_mode,
            config,
            compression_level,
        } => demo::run(
            output,
            scans,
            snapshots,
            profile_mode,
            config,
            compression_level,
        ),
        Commands::Info { file } => info::run(file),
        Commands::Validate { file } => validate::run(file),
        Commands::Dump {
            file,
            scan,
            time_index,
            settings,
        } => dump::run(file, scan, time_index, settings),
    }
}
