use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod convert;
mod run;
mod run_pair;

/// mzexclude - derive instrument exclusion lists from blank-run mzTab tables
#[derive(Parser)]
#[command(name = "mzexclude")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an exclusion list from a single mzTab (local path or URL)
    Run {
        /// Input mzTab path, HTTP(S) URL, or Google Drive share link
        #[arg(value_name = "INPUT")]
        input: String,

        /// Minimum ion intensity (count) for a feature to be excluded
        #[arg(value_name = "MIN_INTENSITY")]
        min_intensity: u64,

        /// Extra retention-time margin added to each window side, seconds
        #[arg(value_name = "RT_MARGIN_SECS")]
        rt_margin_secs: f64,

        /// Directory for the results/ and download_results/ trees
        #[arg(short = 'w', long, default_value = ".")]
        workdir: PathBuf,
    },

    /// Build an exclusion list from a narrow/large mzTab detection pair
    RunPair {
        /// Narrow-window detection mzTab
        #[arg(value_name = "NARROW")]
        narrow: String,

        /// Large-window detection mzTab
        #[arg(value_name = "LARGE")]
        large: String,

        /// Minimum ion intensity (count) for a feature to be excluded
        #[arg(value_name = "MIN_INTENSITY")]
        min_intensity: u64,

        /// Extra retention-time margin added to each window side, seconds
        #[arg(value_name = "RT_MARGIN_SECS", default_value_t = 2.0)]
        rt_margin_secs: f64,

        /// Directory for the results/ and download_results/ trees
        #[arg(short = 'w', long, default_value = ".")]
        workdir: PathBuf,
    },

    /// Convert an mzTab document to a normalized feature table CSV
    Convert {
        /// Input mzTab file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output CSV path (defaults to the input name with a .csv suffix)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

/// Stage progress is part of the tool's contract, so the default level is
/// `info` rather than `warn`.
pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            input,
            min_intensity,
            rt_margin_secs,
            workdir,
        } => run::run(input, min_intensity, rt_margin_secs, workdir),
        Commands::RunPair {
            narrow,
            large,
            min_intensity,
            rt_margin_secs,
            workdir,
        } => run_pair::run(narrow, large, min_intensity, rt_margin_secs, workdir),
        Commands::Convert { input, output } => convert::run(input, output),
    }
}
