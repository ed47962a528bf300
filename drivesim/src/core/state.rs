use crate::core::geometry::Point;
use crate::core::metrics::RunMetrics;
use crate::core::path::Path;

/// Car position used while no path exists.
pub const DEFAULT_CAR_POSITION: Point = Point::new(50.0, 50.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimPhase {
    Idle,
    Recording,
    Simulating,
    Paused,
}

impl Default for SimPhase {
    fn default() -> Self {
        SimPhase::Idle
    }
}

/// CarState of the single car.
/// * `position` - (px) Current position on the canvas
/// * `heading` - (rad) Facing angle, derived from the direction towards the next target point
/// * `speed` - (px/tick) Distance covered per tick, user controlled
/// * `target_idx` - Index of the path point the car currently drives towards minus one, i.e.
/// the car drives on segment `target_idx -> target_idx + 1`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarState {
    pub position: Point,
    pub heading: f64,
    pub speed: f64,
    pub target_idx: usize,
}

impl CarState {
    pub fn parked_at(position: Point) -> CarState {
        CarState {
            position,
            heading: 0.0,
            speed: 0.0,
            target_idx: 0,
        }
    }
}

/// SimState is the one record shared by the path recorder, the motion engine and the renderer.
/// All fields are updated together by the engine such that position, segment index and metrics
/// never disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct SimState {
    pub phase: SimPhase,
    pub path: Path,
    pub car: CarState,
    pub metrics: RunMetrics,
    pub default_position: Point,
}

impl SimState {
    pub fn new(default_position: Point) -> SimState {
        SimState {
            phase: SimPhase::Idle,
            path: Path::new(),
            car: CarState::parked_at(default_position),
            metrics: RunMetrics::default(),
            default_position,
        }
    }

    /// Position the car returns to on reset: the first path point, or the default position.
    pub fn start_position(&self) -> Point {
        self.path.first().unwrap_or(self.default_position)
    }

    /// True once the car stands on the last path point (nothing left to drive).
    pub fn arrived(&self) -> bool {
        self.path.is_drivable() && self.car.target_idx >= self.path.last_idx()
    }
}

impl Default for SimState {
    fn default() -> Self {
        SimState::new(DEFAULT_CAR_POSITION)
    }
}
