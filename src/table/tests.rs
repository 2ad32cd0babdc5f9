use super::csv_io;
use super::*;
use tempfile::tempdir;

fn feature(mz: f64, rt: f64, intensity: f64) -> Feature {
    Feature {
        mz,
        charge: 1,
        retention_time: rt,
        rt_start: rt - 5.0,
        rt_end: rt + 5.0,
        intensity,
    }
}

fn table(sample: &str, features: Vec<Feature>) -> FeatureTable {
    FeatureTable {
        sample_name: sample.to_string(),
        features,
    }
}

// ==================== Merge ====================

#[test]
fn test_merge_concatenates_and_keeps_duplicates() {
    let narrow = table("Blank", vec![feature(300.0, 100.0, 1e4)]);
    let large = table("Blank", vec![feature(300.0, 100.0, 1e4), feature(450.0, 200.0, 2e4)]);

    let merged = merge(vec![narrow, large], 0.0).unwrap();
    assert_eq!(merged.len(), 3);
    assert_eq!(merged.sample_name, "Blank");
}

#[test]
fn test_merge_expands_window_by_twice_margin() {
    let input = table("Blank", vec![feature(300.0, 100.0, 1e4), feature(500.0, 150.0, 2e4)]);
    let widths_before: Vec<f64> = input.features.iter().map(Feature::rt_width).collect();

    let merged = merge(vec![input], 2.0).unwrap();

    for (f, before) in merged.features.iter().zip(widths_before) {
        assert!((f.rt_width() - (before + 4.0)).abs() < 1e-9);
        assert!(f.rt_start <= f.retention_time && f.retention_time <= f.rt_end);
    }
}

#[test]
fn test_merge_single_table_is_identity_plus_margin() {
    let merged = merge(vec![table("Blank", vec![feature(300.0, 100.0, 1e4)])], 1.5).unwrap();
    assert_eq!(merged.len(), 1);
    assert!((merged.features[0].rt_start - 93.5).abs() < 1e-9);
    assert!((merged.features[0].rt_end - 106.5).abs() < 1e-9);
}

#[test]
fn test_merge_rejects_mismatched_samples() {
    let a = table("Blank", vec![]);
    let b = table("Other", vec![]);
    assert!(matches!(
        merge(vec![a, b], 0.0),
        Err(TableError::SchemaMismatch(_, _))
    ));
}

#[test]
fn test_merge_requires_input() {
    assert!(matches!(merge(vec![], 0.0), Err(TableError::EmptyMerge)));
}

// ==================== Filter ====================

#[test]
fn test_filter_is_strictly_greater_than() {
    let input = table(
        "Blank",
        vec![
            feature(300.0, 100.0, 999.0),
            feature(301.0, 110.0, 1000.0),
            feature(302.0, 120.0, 1000.1),
        ],
    );

    let (list, stats) = apply_intensity_filter(&input, 1000.0);

    assert_eq!(stats.input_rows, 3);
    assert_eq!(stats.excluded_rows, 1);
    assert_eq!(list.entries.len(), 1);
    // The row exactly at the threshold stays available for acquisition.
    assert!((list.entries[0].mz - 302.0).abs() < 1e-9);
}

#[test]
fn test_filter_preserves_order() {
    let input = table(
        "Blank",
        vec![feature(500.0, 50.0, 5e4), feature(300.0, 100.0, 3e4), feature(400.0, 150.0, 4e4)],
    );

    let (list, _) = apply_intensity_filter(&input, 0.0);
    let mzs: Vec<f64> = list.entries.iter().map(|f| f.mz).collect();
    assert_eq!(mzs, vec![500.0, 300.0, 400.0]);
}

#[test]
fn test_filter_can_empty_the_table() {
    let input = table("Blank", vec![feature(300.0, 100.0, 10.0)]);
    let (list, stats) = apply_intensity_filter(&input, 1e6);
    assert!(list.is_empty());
    assert_eq!(stats.excluded_rows, 0);
    assert_eq!(stats.input_rows, 1);
}

// ==================== CSV round-trip ====================

#[test]
fn test_table_csv_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("table.csv");

    let original = table("Blank", vec![feature(301.12, 120.0, 5000.0), feature(450.5, 240.0, 0.0)]);
    csv_io::write_table(&original, &path).unwrap();

    let read = csv_io::read_table(&path, Some("Blank")).unwrap();
    assert_eq!(read.sample_name, "Blank");
    assert_eq!(read.features, original.features);
}

#[test]
fn test_positional_blank_column_inference() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("table.csv");

    let original = table("QC_Blank01", vec![feature(301.12, 120.0, 5000.0)]);
    csv_io::write_table(&original, &path).unwrap();

    // No declared sample column: the column before rt_start wins.
    let read = csv_io::read_table(&path, None).unwrap();
    assert_eq!(read.sample_name, "QC_Blank01");
    assert_eq!(read.features, original.features);
}

#[test]
fn test_read_table_skips_malformed_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("table.csv");
    std::fs::write(
        &path,
        "Mass [m/z],retention_time,charge,Blank,rt_start,rt_end\n\
         301.12,120.0,1,5000,115.0,125.0\n\
         not_a_number,130.0,1,6000,125.0,135.0\n",
    )
    .unwrap();

    let read = csv_io::read_table(&path, Some("Blank")).unwrap();
    assert_eq!(read.len(), 1);
}

#[test]
fn test_sort_by_retention_time_is_stable() {
    let mut t = table(
        "Blank",
        vec![feature(100.0, 50.0, 1.0), feature(200.0, 10.0, 2.0), feature(300.0, 50.0, 3.0)],
    );
    t.sort_by_retention_time();
    let mzs: Vec<f64> = t.features.iter().map(|f| f.mz).collect();
    assert_eq!(mzs, vec![200.0, 100.0, 300.0]);
}
