//! The exclusion-list workflow, from mzTab input(s) to archived results.
//!
//! One function drives both the single-source and the narrow+large variants;
//! the only difference between them is how many source tables feed the
//! merger. Stage boundaries are logged, and every parameter and derived fact
//! lands in the workspace audit log.

use std::path::PathBuf;

use log::info;

use crate::exporters::{self, ExporterError};
use crate::fetch::{self, FetchError};
use crate::mztab::{self, MzTabError};
use crate::plot::{self, PlotError, ScatterAxis};
use crate::table::{self, csv_io, FeatureTable, FilterStats, TableError};
use crate::workspace::{Workspace, WorkspaceError};

/// Errors that can occur while running the pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// No input mzTab was supplied
    #[error("At least one mzTab input is required")]
    NoInputs,

    /// Workspace setup or archiving failed
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// Input resolution or download failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// mzTab parsing failed
    #[error(transparent)]
    MzTab(#[from] MzTabError),

    /// Table merge or CSV I/O failed
    #[error(transparent)]
    Table(#[from] TableError),

    /// Vendor-format export failed
    #[error(transparent)]
    Export(#[from] ExporterError),

    /// Diagnostic plot rendering failed
    #[error(transparent)]
    Plot(#[from] PlotError),
}

/// User-supplied run parameters.
#[derive(Debug, Clone)]
pub struct PipelineParams {
    /// Minimum blank-sample intensity for a feature to be excluded
    pub min_intensity: f64,

    /// Extra margin added to each side of every retention window, seconds
    pub rt_margin_secs: f64,

    /// Directory under which `results/` and `download_results/` are created
    pub workdir: PathBuf,
}

/// Summary of a completed run.
#[derive(Debug)]
pub struct PipelineReport {
    /// Blank sample the exclusion list was derived from
    pub sample_name: String,

    /// Row counts before/after the intensity filter
    pub stats: FilterStats,

    /// Path of the zipped result bundle
    pub archive_path: PathBuf,
}

/// Run the full workflow over one or more mzTab inputs (local paths or
/// URLs). Two inputs are treated as the narrow/large detection pair.
pub fn run_pipeline(inputs: &[String], params: &PipelineParams) -> Result<PipelineReport, PipelineError> {
    if inputs.is_empty() {
        return Err(PipelineError::NoInputs);
    }

    info!("======");
    info!("Starting the exclusion workflow");
    let mut workspace = Workspace::reset(&params.workdir)?;
    workspace.audit(&format!("Minimum ion intensity threshold (count) = {}", params.min_intensity))?;
    workspace.audit(&format!(
        "Additional margin for retention time range exclusion (seconds) = {}",
        params.rt_margin_secs
    ))?;

    // Resolve and parse each source, keeping a normalized CSV per source.
    let mut tables: Vec<FeatureTable> = Vec::new();
    let mut intermediates: Vec<String> = Vec::new();

    for (index, input) in inputs.iter().enumerate() {
        info!("======");
        info!("Converting mzTab to table format: {}", input);
        workspace.audit(&format!("Input: {}", input))?;

        let resolved = fetch::resolve_input(input, workspace.results_dir())?;
        let table = mztab::parse_file(&resolved.path)?;

        let label = source_label(inputs.len(), index, &resolved.stem);
        let table_name = format!("table_{}.csv", label);
        csv_io::write_table(&table, workspace.results_path(&table_name))?;
        workspace.audit(&format!(
            "Normalized {} features from '{}' into {}",
            table.len(),
            resolved.stem,
            table_name
        ))?;

        intermediates.push(table_name);
        tables.push(table);
    }

    // Merge (a single source degenerates to margin expansion) and persist
    // the combined table under the blank sample's name.
    info!("======");
    info!("Running the table processing");
    let merged = table::merge(tables, params.rt_margin_secs)?;
    let sample_name = merged.sample_name.clone();
    workspace.audit(&format!("Assumed blank sample name: {}", sample_name))?;

    let merged_name = format!("{}.csv", sample_name);
    csv_io::write_table(&merged, workspace.results_path(&merged_name))?;
    intermediates.push(merged_name);

    // Intensity filter.
    let (exclusion, stats) = table::apply_intensity_filter(&merged, params.min_intensity);
    workspace.audit(&format!("Initial number of ions = {}", stats.input_rows))?;
    workspace.audit(&format!(
        "Number of ions after intensity filtering = {}, with intensity > {}",
        stats.excluded_rows, params.min_intensity
    ))?;

    let exclusion_name = format!("{}_EXCLUSION_BLANK.csv", sample_name);
    let exclusion_table = FeatureTable {
        sample_name: sample_name.clone(),
        features: exclusion.entries.clone(),
    };
    csv_io::write_table(&exclusion_table, workspace.results_path(&exclusion_name))?;
    intermediates.push(exclusion_name);

    // Vendor exports.
    info!("======");
    info!("Preparing list of excluded ions in XCalibur format");
    exporters::write_xcalibur_list(
        &exclusion,
        workspace.results_path(&format!("{}_EXCLUSION_LIST_XCalibur.csv", sample_name)),
    )?;

    info!("======");
    info!("Preparing list of excluded ions in MaxQuant.Live format");
    exporters::write_mql_targets(
        &exclusion,
        workspace.results_path(&format!("{}_EXCLUSION_LIST_MaxQuantLive.txt", sample_name)),
    )?;

    // Diagnostic plots.
    info!("======");
    info!("Preparing plotting of the ions excluded");
    plot::plot_rt_range(&exclusion, workspace.results_path("plot_exclusion_RT_range_plot.png"))?;
    plot::plot_intensity_scatter(
        &exclusion,
        ScatterAxis::RetentionTime,
        workspace.results_path("plot_exclusion_scatter_RT.png"),
    )?;
    plot::plot_intensity_scatter(
        &exclusion,
        ScatterAxis::Mz,
        workspace.results_path("plot_exclusion_scatter_MZ.png"),
    )?;

    // Bundle everything.
    info!("======");
    info!("Zipping workflow results files");
    workspace.move_to_intermediates(&intermediates)?;
    let archive_path = workspace.archive("exclusion_results.zip")?;

    info!("======");
    info!("End of the exclusion workflow");

    Ok(PipelineReport {
        sample_name,
        stats,
        archive_path,
    })
}

/// Per-source table label: the historical narrow/large pair keeps its names,
/// anything else is labelled by its file stem.
fn source_label(source_count: usize, index: usize, stem: &str) -> String {
    if source_count == 2 {
        match index {
            0 => "narrow".to_string(),
            _ => "large".to_string(),
        }
    } else {
        stem.to_string()
    }
}
