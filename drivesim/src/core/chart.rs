use crate::core::geometry::Point;
use crate::core::metrics::{RunMetrics, SpeedSample};
use crate::interfaces::gui_interface::{Primitive, RgbColor, Scene, TextAnchor};

pub const MARGIN_LEFT: f64 = 30.0;
pub const MARGIN_RIGHT: f64 = 20.0;
pub const MARGIN_TOP: f64 = 20.0;
pub const MARGIN_BOTTOM: f64 = 30.0;

/// (s) The time axis always spans at least this long.
pub const MIN_TIME_SPAN: f64 = 10.0;
/// (px/tick) The speed axis always spans at least this far.
pub const MIN_SPEED_SPAN: f64 = 20.0;
pub const NO_TICK_INTERVALS: usize = 5;

pub const BACKGROUND_COLOR: RgbColor = RgbColor::new(248, 249, 250);
pub const AXIS_COLOR: RgbColor = RgbColor::BLACK;
pub const GRIDLINE_COLOR: RgbColor = RgbColor::new(208, 208, 208);
pub const SPEED_LINE_COLOR: RgbColor = RgbColor::RED;

/// ChartLayout holds the dynamically scaled axes of the speed/time chart for a surface of the
/// given size.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub x_max: f64,
    pub y_max: f64,
    pub x_ticks: Vec<f64>,
    pub y_ticks: Vec<f64>,
}

impl ChartLayout {
    /// Returns None if the surface is too small to hold the axes.
    pub fn new(metrics: &RunMetrics, width: f64, height: f64) -> Option<ChartLayout> {
        if width <= MARGIN_LEFT + MARGIN_RIGHT || height <= MARGIN_TOP + MARGIN_BOTTOM {
            return None;
        }

        let x_max = metrics.elapsed_s.max(MIN_TIME_SPAN);
        let y_max = metrics.max_speed.max(MIN_SPEED_SPAN);

        Some(ChartLayout {
            width,
            height,
            x_max,
            y_max,
            x_ticks: time_ticks(x_max),
            y_ticks: speed_ticks(y_max),
        })
    }

    /// Converts a (time, speed) pair into pixel coordinates of the chart surface.
    pub fn to_pixel(&self, time: f64, speed: f64) -> Point {
        Point {
            x: MARGIN_LEFT + (self.width - MARGIN_LEFT - MARGIN_RIGHT) * time / self.x_max,
            y: self.height - MARGIN_BOTTOM
                - (self.height - MARGIN_TOP - MARGIN_BOTTOM) * speed / self.y_max,
        }
    }

    pub fn plot_points(&self, samples: &[SpeedSample]) -> Vec<Point> {
        samples
            .iter()
            .map(|s| self.to_pixel(s.time, s.speed))
            .collect()
    }

    fn origin(&self) -> Point {
        Point::new(MARGIN_LEFT, self.height - MARGIN_BOTTOM)
    }

    /// scene returns background, gridlines, axes with ticks and labels, and the speed line.
    pub fn scene(&self, samples: &[SpeedSample]) -> Scene {
        let mut scene = Scene::default();
        let origin = self.origin();
        let x_end = self.width - MARGIN_RIGHT;
        let y_end = MARGIN_TOP;

        scene.push(Primitive::Polygon {
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(self.width, 0.0),
                Point::new(self.width, self.height),
                Point::new(0.0, self.height),
            ],
            fill: BACKGROUND_COLOR,
        });

        // gridlines
        for &t in self.x_ticks.iter() {
            let x = self.to_pixel(t, 0.0).x;
            scene.push(line(Point::new(x, origin.y), Point::new(x, y_end), 1.0, GRIDLINE_COLOR));
        }
        for &v in self.y_ticks.iter() {
            let y = self.to_pixel(0.0, v).y;
            scene.push(line(Point::new(origin.x, y), Point::new(x_end, y), 1.0, GRIDLINE_COLOR));
        }

        // axes
        scene.push(line(origin, Point::new(x_end, origin.y), 2.0, AXIS_COLOR));
        scene.push(line(origin, Point::new(origin.x, y_end), 2.0, AXIS_COLOR));

        // ticks and labels
        for &t in self.x_ticks.iter() {
            let x = self.to_pixel(t, 0.0).x;
            scene.push(line(
                Point::new(x, origin.y),
                Point::new(x, origin.y + 5.0),
                1.0,
                AXIS_COLOR,
            ));
            scene.push(text(
                Point::new(x, origin.y + 7.0),
                format!("{}", t),
                TextAnchor::CenterTop,
            ));
        }
        for &v in self.y_ticks.iter() {
            let y = self.to_pixel(0.0, v).y;
            scene.push(line(
                Point::new(origin.x, y),
                Point::new(origin.x + 5.0, y),
                1.0,
                AXIS_COLOR,
            ));
            scene.push(text(
                Point::new(origin.x - 5.0, y),
                format!("{:.1}", v),
                TextAnchor::RightCenter,
            ));
        }
        scene.push(text(
            Point::new(self.width / 2.0, self.height - 12.0),
            "Time (s)".to_owned(),
            TextAnchor::CenterCenter,
        ));
        scene.push(text(
            Point::new(origin.x + 8.0, y_end - 4.0),
            "Speed".to_owned(),
            TextAnchor::LeftBottom,
        ));

        // speed history
        if samples.len() > 1 {
            scene.push(Primitive::Polyline {
                points: self.plot_points(samples),
                width: 2.0,
                color: SPEED_LINE_COLOR,
            });
        }

        scene
    }
}

/// Time ticks every ceil(x_max / 5) seconds, starting at 0 and not exceeding x_max.
pub fn time_ticks(x_max: f64) -> Vec<f64> {
    let step = (x_max / NO_TICK_INTERVALS as f64).ceil().max(1.0);
    let no_ticks = (x_max / step).floor() as usize;
    (0..=no_ticks).map(|i| i as f64 * step).collect()
}

/// Speed ticks at i * y_max / 5 for i = 0..=5.
pub fn speed_ticks(y_max: f64) -> Vec<f64> {
    (0..=NO_TICK_INTERVALS)
        .map(|i| i as f64 * y_max / NO_TICK_INTERVALS as f64)
        .collect()
}

fn line(a: Point, b: Point, width: f32, color: RgbColor) -> Primitive {
    Primitive::Polyline {
        points: vec![a, b],
        width,
        color,
    }
}

fn text(pos: Point, text: String, anchor: TextAnchor) -> Primitive {
    Primitive::Text {
        pos,
        text,
        anchor,
        color: AXIS_COLOR,
    }
}
