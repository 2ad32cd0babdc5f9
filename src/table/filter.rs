//! Intensity-threshold filter producing the final exclusion list.

use log::info;

use super::{ExclusionList, FeatureTable};

/// Row counts before and after filtering, reported to the operator and the
/// audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterStats {
    /// Rows in the merged input table
    pub input_rows: usize,

    /// Rows that passed the intensity threshold
    pub excluded_rows: usize,
}

/// Keep the features whose blank-sample intensity strictly exceeds
/// `min_intensity`.
///
/// A feature exactly at the threshold is NOT excluded; it stays available
/// for acquisition. Row order is preserved.
pub fn apply_intensity_filter(table: &FeatureTable, min_intensity: f64) -> (ExclusionList, FilterStats) {
    let entries: Vec<_> = table
        .features
        .iter()
        .filter(|f| f.intensity > min_intensity)
        .cloned()
        .collect();

    let stats = FilterStats {
        input_rows: table.len(),
        excluded_rows: entries.len(),
    };

    info!("Initial number of ions = {}", stats.input_rows);
    info!(
        "Number of ions after intensity filtering = {}, with intensity > {}",
        stats.excluded_rows, min_intensity
    );

    let list = ExclusionList {
        sample_name: table.sample_name.clone(),
        entries,
    };

    (list, stats)
}
