//! Row-wise concatenation of feature tables with retention-window expansion.

use log::info;

use super::{FeatureTable, TableError};

/// Merge one or more feature tables into a single table and widen every
/// retention-time window by `margin_secs` on each side.
///
/// Duplicate features across tables are intentionally kept: a feature seen by
/// both the narrow and the large detection pass represents two independent
/// detections and both windows should be excluded. A single input table
/// degenerates to the margin-expansion step alone.
pub fn merge(tables: Vec<FeatureTable>, margin_secs: f64) -> Result<FeatureTable, TableError> {
    let mut iter = tables.into_iter();
    let mut merged = iter.next().ok_or(TableError::EmptyMerge)?;

    for table in iter {
        if table.sample_name != merged.sample_name {
            return Err(TableError::SchemaMismatch(
                merged.sample_name,
                table.sample_name,
            ));
        }
        merged.features.extend(table.features);
    }

    for feature in &mut merged.features {
        feature.rt_start -= margin_secs;
        feature.rt_end += margin_secs;
    }

    info!(
        "Merged table: {} features, retention windows expanded by +/- {} s",
        merged.len(),
        margin_secs
    );

    Ok(merged)
}
