//! # mzexclude
//!
//! A command-line tool that turns mzTab feature tables from blank runs into
//! instrument exclusion lists.
//!
//! ## Usage
//!
//! ```bash
//! # Single mzTab, intensity threshold 1000, 5 s retention-time margin
//! mzexclude run Blank.mzTab 1000 5.0
//!
//! # Narrow/large detection pair (margin defaults to 2 s)
//! mzexclude run-pair Narrow.mzTab Large.mzTab 1000
//!
//! # Just normalize an mzTab into a CSV feature table
//! mzexclude convert Blank.mzTab
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
