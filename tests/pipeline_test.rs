//! End-to-end tests for the exclusion workflow.
//!
//! These run the full pipeline on synthetic mzTab documents inside a temp
//! directory and verify the result bundle.

use std::fs;
use std::path::Path;

use mzexclude::exporters::{read_mql_targets, read_xcalibur_list};
use mzexclude::pipeline::{run_pipeline, PipelineError, PipelineParams};
use tempfile::tempdir;

const MZTAB_HEADER: &str = "mzTab-version\t1.0.0\n\
    ms_run[1]-location\tfile:///data/Blank.mzML\n\
    \n\
    SML_ID\tmass_to_charge\tcharge\tretention_time\tretention_time_window\tpeptide_abundance_study_variable[1]\n";

fn write_mztab(path: &Path, rows: &[&str]) {
    let mut doc = String::from(MZTAB_HEADER);
    for row in rows {
        doc.push_str(row);
        doc.push('\n');
    }
    fs::write(path, doc).unwrap();
}

fn params(workdir: &Path, min_intensity: f64, margin: f64) -> PipelineParams {
    PipelineParams {
        min_intensity,
        rt_margin_secs: margin,
        workdir: workdir.to_path_buf(),
    }
}

#[test]
fn test_single_source_workflow() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("Blank.mzTab");
    write_mztab(
        &input,
        &[
            "1\t301.1200\t1\t120.0\t115.0|125.0\t5000",
            "2\t450.2501\t2\t240.0\t235.0|245.0\t800",
            "3\t522.3000\t0\t300.0\t295.0|305.0\t120000",
        ],
    );

    let report = run_pipeline(
        &[input.to_string_lossy().into_owned()],
        &params(dir.path(), 1000.0, 5.0),
    )
    .unwrap();

    assert_eq!(report.sample_name, "Blank");
    assert_eq!(report.stats.input_rows, 3);
    // 800 is at/below the threshold, the other two pass.
    assert_eq!(report.stats.excluded_rows, 2);
    assert!(report.archive_path.exists());

    let results = dir.path().join("results");
    let xcalibur = results.join("Blank_EXCLUSION_LIST_XCalibur.csv");
    let mql = results.join("Blank_EXCLUSION_LIST_MaxQuantLive.txt");
    assert!(xcalibur.exists());
    assert!(mql.exists());
    assert!(results.join("plot_exclusion_scatter_MZ.png").exists());
    assert!(results.join("plot_exclusion_scatter_RT.png").exists());
    assert!(results.join("plot_exclusion_RT_range_plot.png").exists());
    assert!(results.join("logfile.txt").exists());

    // Normalized/merged/filtered tables are intermediates, not deliverables.
    let intermediates = results.join("intermediate_files");
    assert!(intermediates.join("table_Blank.csv").exists());
    assert!(intermediates.join("Blank.csv").exists());
    assert!(intermediates.join("Blank_EXCLUSION_BLANK.csv").exists());

    // Windows in the vendor files carry the 5 s margin on both sides.
    let windows = read_xcalibur_list(&xcalibur).unwrap();
    assert_eq!(windows.len(), 2);
    assert!((windows[0].rt_start - 110.0).abs() < 0.5);
    assert!((windows[0].rt_end - 130.0).abs() < 0.5);

    let mql_windows = read_mql_targets(&mql).unwrap();
    assert_eq!(mql_windows.len(), 2);
    for (a, b) in windows.iter().zip(&mql_windows) {
        assert!((a.mz - b.mz).abs() < 1e-3);
        assert!((a.rt_start - b.rt_start).abs() < 0.5);
        assert!((a.rt_end - b.rt_end).abs() < 0.5);
    }
}

#[test]
fn test_pair_workflow_concatenates_detections() {
    let dir = tempdir().unwrap();
    let narrow = dir.path().join("Narrow.mzTab");
    let large = dir.path().join("Large.mzTab");
    write_mztab(&narrow, &["1\t301.1200\t1\t120.0\t118.0|122.0\t5000"]);
    write_mztab(
        &large,
        &[
            "1\t301.1200\t1\t120.0\t110.0|130.0\t5000",
            "2\t640.8800\t2\t400.0\t390.0|410.0\t90000",
        ],
    );

    let report = run_pipeline(
        &[
            narrow.to_string_lossy().into_owned(),
            large.to_string_lossy().into_owned(),
        ],
        &params(dir.path(), 1000.0, 2.0),
    )
    .unwrap();

    // Duplicate detections across the pair are kept on purpose.
    assert_eq!(report.stats.input_rows, 3);
    assert_eq!(report.stats.excluded_rows, 3);

    let intermediates = dir.path().join("results").join("intermediate_files");
    assert!(intermediates.join("table_narrow.csv").exists());
    assert!(intermediates.join("table_large.csv").exists());
}

#[test]
fn test_threshold_above_everything_yields_valid_empty_exports() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("Blank.mzTab");
    write_mztab(&input, &["1\t301.1200\t1\t120.0\t115.0|125.0\t5000"]);

    let report = run_pipeline(
        &[input.to_string_lossy().into_owned()],
        &params(dir.path(), 1e9, 5.0),
    )
    .unwrap();

    assert_eq!(report.stats.excluded_rows, 0);

    let results = dir.path().join("results");
    let xcalibur = results.join("Blank_EXCLUSION_LIST_XCalibur.csv");
    let mql = results.join("Blank_EXCLUSION_LIST_MaxQuantLive.txt");
    assert!(read_xcalibur_list(&xcalibur).unwrap().is_empty());
    assert!(read_mql_targets(&mql).unwrap().is_empty());
}

#[test]
fn test_rerun_replaces_previous_results() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("Blank.mzTab");
    write_mztab(&input, &["1\t301.1200\t1\t120.0\t115.0|125.0\t5000"]);

    let inputs = [input.to_string_lossy().into_owned()];
    run_pipeline(&inputs, &params(dir.path(), 1000.0, 5.0)).unwrap();

    // Plant a stale file; the next run's reset must clear it.
    let stale = dir.path().join("results").join("stale_marker.txt");
    fs::write(&stale, "old").unwrap();

    run_pipeline(&inputs, &params(dir.path(), 1000.0, 5.0)).unwrap();
    assert!(!stale.exists());
}

#[test]
fn test_missing_sample_metadata_aborts_run() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("NoSample.mzTab");
    fs::write(
        &input,
        "mzTab-version\t1.0.0\n\
         SML_ID\tmass_to_charge\tcharge\tretention_time\tretention_time_window\tpeptide_abundance_study_variable[1]\n\
         1\t301.12\t1\t120.0\t115.0|125.0\t5000\n",
    )
    .unwrap();

    let result = run_pipeline(
        &[input.to_string_lossy().into_owned()],
        &params(dir.path(), 1000.0, 5.0),
    );
    assert!(matches!(result, Err(PipelineError::MzTab(_))));
}

#[test]
fn test_no_inputs_is_an_error() {
    let dir = tempdir().unwrap();
    let result = run_pipeline(&[], &params(dir.path(), 1000.0, 5.0));
    assert!(matches!(result, Err(PipelineError::NoInputs)));
}
