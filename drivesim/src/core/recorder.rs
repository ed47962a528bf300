//! Path recording from pointer input. Every operation is a guarded transformation of the shared
//! `SimState` and returns whether it was applied.

use crate::core::geometry::Point;
use crate::core::metrics::RunMetrics;
use crate::core::path::Path;
use crate::core::state::{CarState, SimPhase, SimState};

/// Starts a new path at `point` and moves the car there. Rejected while simulating.
pub fn begin(state: &mut SimState, point: Point) -> bool {
    if state.phase == SimPhase::Simulating {
        return false;
    }
    state.path = Path::starting_at(point);
    state.car.position = point;
    state.car.target_idx = 0;
    state.phase = SimPhase::Recording;
    true
}

/// Appends a raw pointer sample to the path being recorded.
pub fn extend(state: &mut SimState, point: Point) -> bool {
    if state.phase != SimPhase::Recording {
        return false;
    }
    state.path.push(point);
    true
}

pub fn end(state: &mut SimState) -> bool {
    if state.phase != SimPhase::Recording {
        return false;
    }
    state.phase = SimPhase::Idle;
    true
}

/// Empties the path and resets everything derived from it (car, metrics). Rejected while
/// simulating.
pub fn clear(state: &mut SimState) -> bool {
    if state.phase == SimPhase::Simulating {
        return false;
    }
    state.path.clear();
    state.car = CarState::parked_at(state.default_position);
    state.metrics = RunMetrics::default();
    state.phase = SimPhase::Idle;
    true
}
