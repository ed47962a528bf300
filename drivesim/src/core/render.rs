use crate::core::geometry::Point;
use crate::core::path::Path;
use crate::core::state::{CarState, SimState};
use crate::interfaces::gui_interface::{Primitive, RgbColor, Scene};

pub const GRID_COLOR: RgbColor = RgbColor::new(224, 224, 224);
pub const GRID_LINE_WIDTH: f32 = 1.0;
pub const PATH_COLOR: RgbColor = RgbColor::BLACK;
pub const PATH_LINE_WIDTH: f32 = 3.0;
pub const WHEEL_COLOR: RgbColor = RgbColor::BLACK;

/// Car body as [x, y, width, height] in car-local coordinates (x points forward).
pub const CAR_BODY: [f64; 4] = [-15.0, -10.0, 30.0, 20.0];
pub const CAR_WHEELS: [[f64; 4]; 4] = [
    [-12.0, -12.0, 8.0, 4.0],
    [-12.0, 8.0, 8.0, 4.0],
    [4.0, -12.0, 8.0, 4.0],
    [4.0, 8.0, 8.0, 4.0],
];

/// * `width`, `height` - (px) Size of the drawing surface
/// * `grid_pitch` - (px) Distance between two background grid lines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSpec {
    pub width: f64,
    pub height: f64,
    pub grid_pitch: f64,
}

impl CanvasSpec {
    /// A surface without area is not (yet) available for drawing.
    pub fn is_drawable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn contains(&self, p: &Point) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.width && p.y <= self.height
    }
}

impl Default for CanvasSpec {
    fn default() -> Self {
        CanvasSpec {
            width: 600.0,
            height: 400.0,
            grid_pitch: 50.0,
        }
    }
}

/// render_scene draws the complete canvas for the current state: background grid, recorded path
/// and car. It is a pure function of its inputs and is evaluated again after every change.
pub fn render_scene(state: &SimState, canvas: &CanvasSpec, car_color: RgbColor) -> Scene {
    let mut scene = Scene::default();
    if !canvas.is_drawable() {
        return scene;
    }

    scene.extend(grid_lines(canvas));
    if let Some(path_line) = path_polyline(&state.path) {
        scene.push(path_line);
    }
    scene.extend(car_shapes(&state.car, car_color));
    scene
}

pub fn grid_lines(canvas: &CanvasSpec) -> Vec<Primitive> {
    if !canvas.is_drawable() || canvas.grid_pitch <= 0.0 {
        return vec![];
    }

    let no_cols = (canvas.width / canvas.grid_pitch).floor() as usize;
    let no_rows = (canvas.height / canvas.grid_pitch).floor() as usize;
    let mut lines = Vec::with_capacity(no_cols + no_rows + 2);

    for i in 0..=no_cols {
        let x = i as f64 * canvas.grid_pitch;
        lines.push(Primitive::Polyline {
            points: vec![Point::new(x, 0.0), Point::new(x, canvas.height)],
            width: GRID_LINE_WIDTH,
            color: GRID_COLOR,
        });
    }
    for i in 0..=no_rows {
        let y = i as f64 * canvas.grid_pitch;
        lines.push(Primitive::Polyline {
            points: vec![Point::new(0.0, y), Point::new(canvas.width, y)],
            width: GRID_LINE_WIDTH,
            color: GRID_COLOR,
        });
    }
    lines
}

pub fn path_polyline(path: &Path) -> Option<Primitive> {
    if path.is_empty() {
        return None;
    }
    Some(Primitive::Polyline {
        points: path.points().to_vec(),
        width: PATH_LINE_WIDTH,
        color: PATH_COLOR,
    })
}

/// car_shapes returns body and wheels, rotated by the car heading and moved to its position.
pub fn car_shapes(car: &CarState, car_color: RgbColor) -> Vec<Primitive> {
    let mut shapes = Vec::with_capacity(1 + CAR_WHEELS.len());
    shapes.push(Primitive::Polygon {
        points: local_rect(&CAR_BODY, car),
        fill: car_color,
    });
    for wheel in CAR_WHEELS.iter() {
        shapes.push(Primitive::Polygon {
            points: local_rect(wheel, car),
            fill: WHEEL_COLOR,
        });
    }
    shapes
}

fn local_rect(rect: &[f64; 4], car: &CarState) -> Vec<Point> {
    let [x, y, w, h] = *rect;
    [
        Point::new(x, y),
        Point::new(x + w, y),
        Point::new(x + w, y + h),
        Point::new(x, y + h),
    ]
    .iter()
    .map(|p| p.rotate_translate(car.heading, &car.position))
    .collect()
}
