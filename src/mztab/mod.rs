//! mzTab feature-table parsing.
//!
//! mzTab is a tab-separated exchange format with a metadata header block
//! followed by a consensus-feature data block. This module extracts the
//! per-feature columns (m/z, charge, retention time, retention-time window,
//! blank-sample abundance) for the first sample declared in the metadata and
//! normalizes them into a [`crate::table::FeatureTable`].

mod parser;


pub use parser::{parse_file, parse_str};

/// Errors that can occur while parsing an mzTab document
#[derive(Debug, thiserror::Error)]
pub enum MzTabError {
    /// I/O error reading the mzTab file
    #[error("Failed to read mzTab file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV-level error in the data block
    #[error("mzTab data block error: {0}")]
    CsvError(#[from] csv::Error),

    /// No `file:/...` run location in the metadata block; there is no
    /// sample to process
    #[error("No sample run location (file:/...) found in mzTab metadata")]
    NoSampleMetadata,

    /// The consensus-feature data block was never found
    #[error("No data block found in mzTab document (missing mass_to_charge/retention_time header)")]
    NoDataBlock,

    /// The data-block header is missing a required column
    #[error("mzTab data block is missing required column: {0}")]
    MissingColumn(String),
}
