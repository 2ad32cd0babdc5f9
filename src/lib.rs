//! # mzexclude - exclusion lists from blank-run feature tables
//!
//! `mzexclude` converts mzTab feature tables produced by an upstream
//! feature-detection pipeline (for a blank/background sample) into the
//! exclusion-list formats that acquisition instruments import, so ions
//! already seen in the blank are skipped on subsequent runs.
//!
//! ## Pipeline
//!
//! 1. [`mztab`] parses an mzTab document into a normalized [`table::FeatureTable`]
//!    for the first sample declared in its metadata.
//! 2. [`table::merge`] concatenates one or two source tables (narrow- and
//!    large-window detections) and widens every retention window by a
//!    configurable margin.
//! 3. [`table::apply_intensity_filter`] keeps the features whose blank-sample
//!    intensity strictly exceeds the threshold.
//! 4. [`exporters`] serializes the result into the XCalibur and
//!    MaxQuant.Live layouts; [`plot`] renders diagnostic PNGs.
//!
//! [`pipeline::run_pipeline`] drives the whole workflow inside a scoped
//! [`workspace::Workspace`] that is reset at run start and zipped at run end.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use mzexclude::mztab;
//! use mzexclude::table::{apply_intensity_filter, merge};
//! use mzexclude::exporters::write_xcalibur_list;
//!
//! let table = mztab::parse_file("Blank.mzTab")?;
//! let merged = merge(vec![table], 5.0)?;
//! let (exclusion, stats) = apply_intensity_filter(&merged, 1000.0);
//! println!("excluding {} of {} ions", stats.excluded_rows, stats.input_rows);
//! write_xcalibur_list(&exclusion, "Blank_EXCLUSION_LIST_XCalibur.csv")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod exporters;
pub mod fetch;
pub mod mztab;
pub mod pipeline;
pub mod plot;
pub mod table;
pub mod workspace;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::exporters::{
        read_mql_targets, read_xcalibur_list, write_mql_targets, write_xcalibur_list, ExportedWindow,
        ExporterError,
    };
    pub use crate::fetch::{resolve_input, FetchError, ResolvedInput};
    pub use crate::mztab::{parse_file, parse_str, MzTabError};
    pub use crate::pipeline::{run_pipeline, PipelineError, PipelineParams, PipelineReport};
    pub use crate::plot::{plot_intensity_scatter, plot_rt_range, PlotError, ScatterAxis};
    pub use crate::table::{
        apply_intensity_filter, merge, ExclusionList, Feature, FeatureTable, FilterStats, TableError,
    };
    pub use crate::workspace::{Workspace, WorkspaceError};
}
