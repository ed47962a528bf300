use crate::core::engine::EnginePars;
use crate::core::geometry::Point;
use crate::core::render::CanvasSpec;
use crate::interfaces::gui_interface::RgbColor;
use crate::pre::sim_opts::SimOpts;
use anyhow::Context;
use helpers::general::InputValueError;
use serde::Deserialize;
use std::fs::OpenOptions;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Feature variants of the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// speed max 10, no metrics panel or chart
    Basic,
    /// speed max 20, metrics panel and live speed/time chart
    Extended,
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(Variant::Basic),
            "extended" => Ok(Variant::Extended),
            _ => Err(format!("unknown variant {} (expected basic or extended)", s)),
        }
    }
}

/// * `width`, `height` - (px) Size of the drawing canvas
/// * `grid_pitch` - (px) Distance between background grid lines
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CanvasPars {
    pub width: f64,
    pub height: f64,
    pub grid_pitch: f64,
}

impl Default for CanvasPars {
    fn default() -> Self {
        CanvasPars {
            width: 600.0,
            height: 400.0,
            grid_pitch: 50.0,
        }
    }
}

/// * `width`, `height` - (px) Size of the speed/time chart
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ChartPars {
    pub width: f64,
    pub height: f64,
}

impl Default for ChartPars {
    fn default() -> Self {
        ChartPars {
            width: 600.0,
            height: 300.0,
        }
    }
}

/// * `speed_max` - (px/tick) Maximum speed reachable by accelerating
/// * `tick_period_ms` - (ms) Period of the motion tick
/// * `clock_period_ms` - (ms) Period of the elapsed time update
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MotionPars {
    pub speed_max: f64,
    pub tick_period_ms: u64,
    pub clock_period_ms: u64,
}

impl Default for MotionPars {
    fn default() -> Self {
        MotionPars {
            speed_max: 20.0,
            tick_period_ms: 50,
            clock_period_ms: 100,
        }
    }
}

/// SimPars is used to store all other parameter structs. Every field of the parameter file is
/// optional.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SimPars {
    pub canvas: CanvasPars,
    pub chart: ChartPars,
    pub motion: MotionPars,
    pub car_color: String,
    pub default_position: [f64; 2],
    pub show_metrics: bool,
}

impl Default for SimPars {
    fn default() -> Self {
        SimPars {
            canvas: CanvasPars::default(),
            chart: ChartPars::default(),
            motion: MotionPars::default(),
            car_color: String::from("#ff0000"),
            default_position: [50.0, 50.0],
            show_metrics: true,
        }
    }
}

impl SimPars {
    pub fn apply_variant(&mut self, variant: Variant) {
        match variant {
            Variant::Basic => {
                self.motion.speed_max = 10.0;
                self.show_metrics = false;
            }
            Variant::Extended => {
                self.motion.speed_max = 20.0;
                self.show_metrics = true;
            }
        }
    }

    /// validate checks all parameters that would otherwise lead to a useless or stuck
    /// simulation.
    pub fn validate(&self) -> anyhow::Result<()> {
        let check = |ok: bool, what: &str| -> anyhow::Result<()> {
            if ok {
                Ok(())
            } else {
                Err(InputValueError::new(what)).context("Parameter check failed!")
            }
        };

        check(self.canvas.width > 0.0, "canvas.width must be > 0")?;
        check(self.canvas.height > 0.0, "canvas.height must be > 0")?;
        check(self.canvas.grid_pitch > 0.0, "canvas.grid_pitch must be > 0")?;
        check(self.chart.width > 0.0, "chart.width must be > 0")?;
        check(self.chart.height > 0.0, "chart.height must be > 0")?;
        check(self.motion.speed_max >= 1.0, "motion.speed_max must be >= 1")?;
        check(self.motion.tick_period_ms > 0, "motion.tick_period_ms must be > 0")?;
        check(self.motion.clock_period_ms > 0, "motion.clock_period_ms must be > 0")?;
        self.car_color()?;
        Ok(())
    }

    pub fn engine_pars(&self) -> EnginePars {
        EnginePars {
            speed_max: self.motion.speed_max,
            default_position: Point::new(self.default_position[0], self.default_position[1]),
        }
    }

    pub fn canvas_spec(&self) -> CanvasSpec {
        CanvasSpec {
            width: self.canvas.width,
            height: self.canvas.height,
            grid_pitch: self.canvas.grid_pitch,
        }
    }

    pub fn car_color(&self) -> anyhow::Result<RgbColor> {
        RgbColor::parse_css(&self.car_color)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.motion.tick_period_ms)
    }

    pub fn clock_period(&self) -> Duration {
        Duration::from_millis(self.motion.clock_period_ms)
    }
}

/// read_sim_pars reads the JSON file and decodes the JSON string into the simulation parameters
/// struct.
pub fn read_sim_pars(filepath: &Path) -> anyhow::Result<SimPars> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open parameter file {}!",
            filepath.display()
        ))?;
    let pars = serde_json::from_reader(&fh).context(format!(
        "Failed to parse parameter file {}!",
        filepath.display()
    ))?;
    Ok(pars)
}

/// load_sim_pars combines parameter file (or defaults), variant preset and command line
/// overrides, in this order, and validates the result.
pub fn load_sim_pars(sim_opts: &SimOpts) -> anyhow::Result<SimPars> {
    let mut sim_pars = if let Some(config_path) = &sim_opts.config {
        info!("Reading simulation parameters from {}", config_path.display());
        read_sim_pars(config_path)?
    } else {
        SimPars::default()
    };

    if let Some(variant) = sim_opts.variant {
        sim_pars.apply_variant(variant);
    }
    if let Some(tick_period_ms) = sim_opts.tick_period_ms {
        sim_pars.motion.tick_period_ms = tick_period_ms;
    }

    sim_pars.validate()?;
    Ok(sim_pars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let pars: SimPars =
            serde_json::from_str(r#"{ "motion": { "speed_max": 12 }, "car_color": "blue" }"#)
                .unwrap();
        assert_eq!(pars.motion.speed_max, 12.0);
        assert_eq!(pars.motion.tick_period_ms, 50);
        assert_eq!(pars.canvas, CanvasPars::default());
        assert_eq!(pars.car_color().unwrap(), RgbColor::new(0, 0, 255));
        assert!(pars.validate().is_ok());
    }

    #[test]
    fn variants_set_speed_max_and_metrics() {
        let mut pars = SimPars::default();
        pars.apply_variant(Variant::Basic);
        assert_eq!(pars.engine_pars().speed_max, 10.0);
        assert!(!pars.show_metrics);
        pars.apply_variant(Variant::Extended);
        assert_eq!(pars.engine_pars().speed_max, 20.0);
        assert!(pars.show_metrics);
        assert_eq!("BASIC".parse::<Variant>(), Ok(Variant::Basic));
        assert!("turbo".parse::<Variant>().is_err());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut pars = SimPars::default();
        pars.motion.tick_period_ms = 0;
        let err = pars.validate().unwrap_err();
        assert!(err.downcast_ref::<InputValueError>().is_some());

        let mut pars = SimPars::default();
        pars.car_color = String::from("#zzzzzz");
        assert!(pars.validate().is_err());
    }

    #[test]
    fn command_line_overrides_are_applied() {
        let opts = SimOpts::parse_from(&["pathdrive", "--variant", "basic", "-t", "20"]);
        let pars = load_sim_pars(&opts).unwrap();
        assert_eq!(pars.motion.speed_max, 10.0);
        assert_eq!(pars.tick_period(), Duration::from_millis(20));
        assert_eq!(opts.demo_speeds, vec![5]);
    }

    #[test]
    fn missing_parameter_file_names_the_file() {
        let err = read_sim_pars(Path::new("does/not/exist.json")).unwrap_err();
        assert!(format!("{}", err).contains("does/not/exist.json"));
    }
}
