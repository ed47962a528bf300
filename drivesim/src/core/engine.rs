use crate::core::geometry::Point;
use crate::core::recorder;
use crate::core::state::{SimPhase, SimState, DEFAULT_CAR_POSITION};
use std::time::Instant;
use tracing::{debug, info, trace};

/// * `speed_max` - (px/tick) Upper bound of the user controlled speed
/// * `default_position` - (px) Car position while no path exists
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnginePars {
    pub speed_max: f64,
    pub default_position: Point,
}

impl Default for EnginePars {
    fn default() -> Self {
        EnginePars {
            speed_max: 20.0,
            default_position: DEFAULT_CAR_POSITION,
        }
    }
}

/// Result of a single motion tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing happened (not simulating, standing still, or already at the end of the path).
    Inactive,
    /// The car moved along the current segment.
    Advanced,
    /// The car reached the target point of its segment and continues with the next one.
    ReachedVertex,
    /// The car reached the last point of the path, further ticks are no-ops.
    Arrived,
}

/// MotionEngine owns the simulation state record and implements the state machine
/// Idle/Recording/Simulating/Paused as well as the per-tick path following.
#[derive(Debug, Clone)]
pub struct MotionEngine {
    pars: EnginePars,
    state: SimState,
}

impl MotionEngine {
    pub fn new(pars: EnginePars) -> MotionEngine {
        MotionEngine {
            pars,
            state: SimState::new(pars.default_position),
        }
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn pars(&self) -> &EnginePars {
        &self.pars
    }

    pub fn phase(&self) -> SimPhase {
        self.state.phase
    }

    pub fn is_simulating(&self) -> bool {
        self.state.phase == SimPhase::Simulating
    }

    // ---------------------------------------------------------------------------------------------
    // PATH RECORDING ------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    pub fn begin_path(&mut self, point: Point) -> bool {
        recorder::begin(&mut self.state, point)
    }

    pub fn extend_path(&mut self, point: Point) -> bool {
        recorder::extend(&mut self.state, point)
    }

    pub fn end_path(&mut self) -> bool {
        let ended = recorder::end(&mut self.state);
        if ended {
            debug!("Path recorded with {} points", self.state.path.len());
        }
        ended
    }

    pub fn clear(&mut self) -> bool {
        let cleared = recorder::clear(&mut self.state);
        if cleared {
            info!("Path and metrics cleared");
        }
        cleared
    }

    // ---------------------------------------------------------------------------------------------
    // COMMANDS ------------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    pub fn can_start(&self) -> bool {
        matches!(self.state.phase, SimPhase::Idle | SimPhase::Paused)
            && self.state.path.is_drivable()
    }

    pub fn can_clear(&self) -> bool {
        self.state.phase != SimPhase::Simulating
    }

    pub fn can_accelerate(&self) -> bool {
        self.is_simulating() && self.state.car.speed < self.pars.speed_max
    }

    pub fn can_brake(&self) -> bool {
        self.is_simulating() && self.state.car.speed > 0.0
    }

    /// Puts the car on the first path point and starts a new run with zeroed metrics.
    pub fn start(&mut self, now: Instant) -> bool {
        if !self.can_start() {
            return false;
        }
        let start_position = self.state.start_position();
        self.state.phase = SimPhase::Simulating;
        self.state.car.target_idx = 0;
        self.state.car.position = start_position;
        self.state.metrics.begin_run(now);
        info!(
            "Simulation started on a path with {} points ({:.1} px)",
            self.state.path.len(),
            self.state.path.length()
        );
        true
    }

    /// Stops the car at the path start. The metrics of the run are kept for inspection. Returns
    /// true if a running simulation was paused.
    pub fn reset(&mut self) -> bool {
        self.state.car.speed = 0.0;
        self.state.car.position = self.state.start_position();
        self.state.car.target_idx = 0;

        if self.state.phase == SimPhase::Simulating {
            self.state.phase = SimPhase::Paused;
            info!(
                "Simulation reset after {:.1} px",
                self.state.metrics.distance_traveled
            );
            true
        } else {
            false
        }
    }

    pub fn accelerate(&mut self) -> bool {
        if !self.is_simulating() {
            return false;
        }
        self.set_speed(self.state.car.speed + 1.0)
    }

    pub fn brake(&mut self) -> bool {
        if !self.is_simulating() {
            return false;
        }
        self.set_speed(self.state.car.speed - 1.0)
    }

    fn set_speed(&mut self, speed: f64) -> bool {
        let speed = speed.max(0.0).min(self.pars.speed_max);
        let changed = speed != self.state.car.speed;
        self.state.car.speed = speed;
        if changed {
            debug!("Speed set to {}", speed);
        }
        changed
    }

    // ---------------------------------------------------------------------------------------------
    // PERIODIC UPDATES ----------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// Clock tick: refreshes the elapsed time of the running simulation. Ignored once the car has
    /// arrived, which freezes the elapsed time of the finished run.
    pub fn update_clock(&mut self, now: Instant) -> bool {
        if !self.is_simulating() || self.state.arrived() {
            return false;
        }
        self.state.metrics.update_elapsed(now);
        true
    }

    /// Motion tick: moves the car by `speed` towards the next path point. A car closer to the
    /// target than `speed` snaps onto it and continues with the next segment on the following
    /// tick.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if !self.is_simulating() {
            return TickOutcome::Inactive;
        }

        let SimState {
            path, car, metrics, ..
        } = &mut self.state;

        let next = match path.get(car.target_idx + 1) {
            Some(next) => next,
            None => return TickOutcome::Inactive,
        };
        if car.speed <= 0.0 {
            return TickOutcome::Inactive;
        }

        let speed = car.speed;
        metrics.record_sample(now, speed);

        let heading = car.position.heading_to(&next);
        let dist_to_next = car.position.dist(&next);

        let outcome = if dist_to_next < speed {
            car.position = next;
            car.target_idx += 1;
            metrics.add_distance(dist_to_next);
            TickOutcome::ReachedVertex
        } else {
            car.heading = heading;
            metrics.add_distance(speed);

            if dist_to_next == speed {
                // step ends exactly on the target point
                car.position = next;
                car.target_idx += 1;
                TickOutcome::ReachedVertex
            } else {
                car.position = car.position.advanced(heading, speed);
                TickOutcome::Advanced
            }
        };

        metrics.refresh_average();
        trace!(
            "Tick: pos=({:.1}, {:.1}) idx={} dist={:.1}",
            car.position.x,
            car.position.y,
            car.target_idx,
            metrics.distance_traveled
        );

        if car.target_idx >= path.last_idx() {
            info!(
                "Car arrived at the end of the path after {:.1} px",
                metrics.distance_traveled
            );
            TickOutcome::Arrived
        } else {
            outcome
        }
    }
}
