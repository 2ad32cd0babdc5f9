//! Instrument-vendor exclusion-list serializers.
//!
//! Both exporters consume the same [`crate::table::ExclusionList`] and are
//! stateless; they differ in schema and numeric encoding. Each format also
//! has a reader so an exported list can be verified against its source.

pub mod maxquant_live;
pub mod xcalibur;


pub use maxquant_live::{read_mql_targets, write_mql_targets};
pub use xcalibur::{read_xcalibur_list, write_xcalibur_list};

/// Errors that can occur while writing or re-reading a vendor format
#[derive(Debug, thiserror::Error)]
pub enum ExporterError {
    /// I/O error on the output file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV writing or parsing error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// A required column is absent from an exported file
    #[error("Missing column in exported list: {0}")]
    MissingColumn(String),

    /// A field could not be interpreted numerically
    #[error("Invalid field in exported list: {0}")]
    InvalidField(String),
}

/// One mass/retention-time window read back from a vendor file.
///
/// Values carry the precision of the format they were read from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedWindow {
    /// Mass-to-charge ratio
    pub mz: f64,

    /// Window start in seconds
    pub rt_start: f64,

    /// Window end in seconds
    pub rt_end: f64,

    /// Charge state, 0 when unresolved
    pub charge: i32,
}
