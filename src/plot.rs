//! Diagnostic plots of the final exclusion list.
//!
//! Three PNGs per run: intensity vs m/z, intensity vs retention time (both
//! log-scale scatter), and an RT-range chart showing each excluded window as
//! a horizontal segment with a marker scaled by intensity. An empty exclusion
//! list renders an empty chart rather than failing.

use std::path::Path;

use plotters::prelude::*;

use crate::table::{ExclusionList, Feature};

/// Errors that can occur while rendering plots
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// Backend or drawing failure
    #[error("Plot rendering failed: {0}")]
    Render(String),
}

/// Which column drives the x axis of an intensity scatter plot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScatterAxis {
    /// Mass-to-charge ratio
    Mz,
    /// Retention time in seconds
    RetentionTime,
}

fn render_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Render(e.to_string())
}

/// Intensity range for the log-scale y axis, padded one order of magnitude
/// each way. Intensities below 1 are clamped so the log axis stays valid.
fn intensity_range(entries: &[Feature]) -> (f64, f64) {
    let mut min = f64::MAX;
    let mut max = f64::MIN;
    for f in entries {
        let y = f.intensity.max(1.0);
        min = min.min(y);
        max = max.max(y);
    }
    if entries.is_empty() {
        (1.0, 10.0)
    } else {
        (min / 10.0, max * 10.0)
    }
}

fn axis_range(values: impl Iterator<Item = f64>, fallback: (f64, f64)) -> (f64, f64) {
    let mut min = f64::MAX;
    let mut max = f64::MIN;
    let mut any = false;
    for v in values {
        any = true;
        min = min.min(v);
        max = max.max(v);
    }
    if !any {
        return fallback;
    }
    let pad = ((max - min) * 0.05).max(1.0);
    (min - pad, max + pad)
}

/// Scatter plot of blank-sample intensity against m/z or retention time.
pub fn plot_intensity_scatter<P: AsRef<Path>>(
    list: &ExclusionList,
    axis: ScatterAxis,
    path: P,
) -> Result<(), PlotError> {
    let root = BitMapBackend::new(path.as_ref(), (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let (title, x_label) = match axis {
        ScatterAxis::Mz => ("Intensity distribution of ions excluded, in m/z range", "m/z"),
        ScatterAxis::RetentionTime => (
            "Intensity distribution of ions excluded, in retention time range",
            "Ret. time (sec)",
        ),
    };

    let x_of = |f: &Feature| match axis {
        ScatterAxis::Mz => f.mz,
        ScatterAxis::RetentionTime => f.retention_time,
    };

    let (x_min, x_max) = axis_range(list.entries.iter().map(x_of), (0.0, 1.0));
    let (y_min, y_max) = intensity_range(&list.entries);

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{} (n = {})", title, list.len()), ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, (y_min..y_max).log_scale())
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc("Ion intensity (log scale)")
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(
            list.entries
                .iter()
                .map(|f| Circle::new((x_of(f), f.intensity.max(1.0)), 3, BLUE.mix(0.4).filled())),
        )
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// RT-range chart: one horizontal segment per excluded window plus a marker
/// at the apex sized by intensity.
pub fn plot_rt_range<P: AsRef<Path>>(list: &ExclusionList, path: P) -> Result<(), PlotError> {
    let root = BitMapBackend::new(path.as_ref(), (900, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let (x_min, x_max) = axis_range(
        list.entries
            .iter()
            .flat_map(|f| [f.rt_start, f.rt_end].into_iter()),
        (0.0, 1.0),
    );
    let (y_min, y_max) = axis_range(list.entries.iter().map(|f| f.mz), (0.0, 1.0));

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Distribution of excluded ions (n = {})", list.len()),
            ("sans-serif", 18),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("Ret. time (sec)")
        .y_desc("m/z")
        .draw()
        .map_err(render_err)?;

    // Grey segment spans the exclusion window.
    chart
        .draw_series(list.entries.iter().map(|f| {
            PathElement::new(
                vec![(f.rt_start, f.mz), (f.rt_end, f.mz)],
                ShapeStyle::from(&full_palette::GREY).stroke_width(1),
            )
        }))
        .map_err(render_err)?;

    // Apex marker scaled by intensity.
    chart
        .draw_series(list.entries.iter().map(|f| {
            let size = ((f.intensity / 1e5).sqrt() * 4.0).clamp(2.0, 16.0) as i32;
            Circle::new((f.retention_time, f.mz), size, RED.mix(0.5).filled())
        }))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}
