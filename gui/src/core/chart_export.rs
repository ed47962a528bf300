use anyhow::Context;
use drivesim::core::chart::ChartLayout;
use drivesim::core::metrics::RunMetrics;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub const EXPORT_SIZE: (u32, u32) = (1280, 720);

/// Returns `<out_dir>/speed_chart_<label>.png`, where the label defaults to the current unix
/// timestamp.
pub fn chart_file_path(out_dir: &Path, label: Option<&str>) -> PathBuf {
    let label = match label {
        Some(label) => label.to_owned(),
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
            .to_string(),
    };
    out_dir.join(format!("speed_chart_{}.png", label))
}

/// export_speed_chart writes the speed/time chart of a run into a PNG file. The axes are scaled in
/// the same way as in the live chart. Returns the path of the written file.
pub fn export_speed_chart(metrics: &RunMetrics, out_path: &Path) -> anyhow::Result<String> {
    if let Some(out_dir) = out_path.parent() {
        std::fs::create_dir_all(out_dir).context(format!(
            "Failed to create output directory {}!",
            out_dir.display()
        ))?;
    }

    let layout = ChartLayout::new(metrics, EXPORT_SIZE.0 as f64, EXPORT_SIZE.1 as f64)
        .context("Export size is too small for the chart!")?;

    let root = BitMapBackend::new(out_path, EXPORT_SIZE).into_drawing_area();
    root.fill(&RGBColor(248, 249, 250))?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Speed over time", ("sans-serif", 24).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..layout.x_max, 0.0..layout.y_max)?;

    chart
        .configure_mesh()
        .x_labels(layout.x_ticks.len())
        .y_labels(layout.y_ticks.len())
        .x_desc("Time (s)")
        .y_desc("Speed (px/tick)")
        .label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    if metrics.speed_samples.len() > 1 {
        chart.draw_series(LineSeries::new(
            metrics.speed_samples.iter().map(|s| (s.time, s.speed)),
            RED.stroke_width(2),
        ))?;
    }

    root.present()?;
    Ok(out_path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_file_names() {
        let path = chart_file_path(Path::new("output"), Some("speed_5"));
        assert_eq!(path, Path::new("output").join("speed_chart_speed_5.png"));

        let stamped = chart_file_path(Path::new("out"), None);
        let name = stamped.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("speed_chart_"));
        assert!(name.ends_with(".png"));
    }
}
