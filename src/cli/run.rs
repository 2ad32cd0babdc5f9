use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mzexclude::pipeline::{run_pipeline, PipelineParams};

pub fn run(input: String, min_intensity: u64, rt_margin_secs: f64, workdir: PathBuf) -> Result<()> {
    let params = PipelineParams {
        min_intensity: min_intensity as f64,
        rt_margin_secs,
        workdir,
    };

    let report = run_pipeline(&[input], &params).context("Exclusion workflow failed")?;

    info!("Blank sample: {}", report.sample_name);
    info!(
        "Excluded {} of {} ions",
        report.stats.excluded_rows, report.stats.input_rows
    );
    info!("Results archived at {}", report.archive_path.display());

    Ok(())
}
