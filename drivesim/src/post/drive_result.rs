use crate::core::metrics::{RunMetrics, SpeedSample};
use crate::core::state::SimState;
use anyhow::Context;
use helpers::general::format_elapsed;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

/// DriveResult contains all information of a finished drive that is required for
/// post-processing.
#[derive(Debug, Clone, Serialize)]
pub struct DriveResult {
    pub target_speed: u32,
    pub speed_reached: f64,
    pub no_ticks: u64,
    pub arrived: bool,
    pub path_length: f64,
    pub distance_traveled: f64,
    pub elapsed_s: f64,
    pub max_speed: f64,
    pub average_speed: f64,
    #[serde(skip)]
    pub speed_samples: Vec<SpeedSample>,
}

impl DriveResult {
    pub fn from_state(
        state: &SimState,
        target_speed: u32,
        no_ticks: u64,
        arrived: bool,
    ) -> DriveResult {
        DriveResult {
            target_speed,
            speed_reached: state.car.speed,
            no_ticks,
            arrived,
            path_length: state.path.length(),
            distance_traveled: state.metrics.distance_traveled,
            elapsed_s: state.metrics.elapsed_s,
            max_speed: state.metrics.max_speed,
            average_speed: state.metrics.average_speed,
            speed_samples: state.metrics.speed_samples.to_owned(),
        }
    }

    /// Returns the statistics of the drive in the form used by the live metrics and the chart.
    pub fn run_metrics(&self) -> RunMetrics {
        RunMetrics {
            distance_traveled: self.distance_traveled,
            start: None,
            elapsed_s: self.elapsed_s,
            max_speed: self.max_speed,
            average_speed: self.average_speed,
            speed_samples: self.speed_samples.to_owned(),
        }
    }

    /// summary returns the metrics table of the drive as text.
    pub fn summary(&self) -> anyhow::Result<String> {
        let mut tmp_string = String::new();
        writeln!(&mut tmp_string, "RESULT: Drive with target speed {}", self.target_speed)?;
        writeln!(
            &mut tmp_string,
            "Elapsed time:      {} ({:.2} s)",
            format_elapsed(self.elapsed_s),
            self.elapsed_s
        )?;
        writeln!(&mut tmp_string, "Ticks:             {}", self.no_ticks)?;
        writeln!(
            &mut tmp_string,
            "Distance traveled: {:.2} px of {:.2} px{}",
            self.distance_traveled,
            self.path_length,
            if self.arrived { "" } else { " (not arrived)" }
        )?;
        writeln!(&mut tmp_string, "Current speed:     {:.2} px/frame", self.speed_reached)?;
        writeln!(&mut tmp_string, "Max speed:         {:.2} px/frame", self.max_speed)?;
        write!(&mut tmp_string, "Average speed:     {:.2} px/s", self.average_speed)?;
        Ok(tmp_string)
    }

    /// print_summary prints the metrics table to the console output.
    pub fn print_summary(&self) -> anyhow::Result<()> {
        println!("{}", self.summary()?);
        Ok(())
    }

    /// write_speed_samples writes the speed/time history as CSV (columns `time`, `speed`).
    /// Returns the path to the written file.
    pub fn write_speed_samples(&self, out_path: &Path) -> anyhow::Result<String> {
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create output directory {}!", parent.display()))?;
        }
        let mut writer = csv::Writer::from_path(out_path)
            .context(format!("Failed to create CSV file {}!", out_path.display()))?;
        for sample in self.speed_samples.iter() {
            writer.serialize(sample).context(format!(
                "Failed to write speed sample to CSV file {}!",
                out_path.display()
            ))?;
        }
        writer
            .flush()
            .context(format!("Failed to write CSV file {}!", out_path.display()))?;
        Ok(out_path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> DriveResult {
        DriveResult {
            target_speed: 5,
            speed_reached: 5.0,
            no_ticks: 3,
            arrived: true,
            path_length: 15.0,
            distance_traveled: 15.0,
            elapsed_s: 0.1,
            max_speed: 5.0,
            average_speed: 150.0,
            speed_samples: vec![
                SpeedSample { time: 0.05, speed: 5.0 },
                SpeedSample { time: 0.1, speed: 5.0 },
            ],
        }
    }

    #[test]
    fn summary_lists_the_metrics() {
        let summary = result().summary().unwrap();
        assert!(summary.contains("Elapsed time:      00:00.1 (0.10 s)"));
        assert!(summary.contains("Distance traveled: 15.00 px of 15.00 px\n"));
        assert!(summary.contains("Average speed:     150.00 px/s"));
    }

    #[test]
    fn speed_samples_are_written_as_csv() {
        let out_path = std::env::temp_dir()
            .join(format!("drivesim-test-{}", std::process::id()))
            .join("samples.csv");
        let written = result().write_speed_samples(&out_path).unwrap();
        let content = std::fs::read_to_string(&written).unwrap();
        assert_eq!(content, "time,speed\n0.05,5.0\n0.1,5.0\n");
        let _ = std::fs::remove_dir_all(out_path.parent().unwrap());
    }

    #[test]
    fn run_metrics_carry_the_samples() {
        let metrics = result().run_metrics();
        assert_eq!(metrics.speed_samples.len(), 2);
        assert_eq!(metrics.max_speed, 5.0);
        assert!(metrics.start.is_none());
    }
}
