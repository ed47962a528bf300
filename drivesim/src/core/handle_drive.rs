use crate::core::engine::{EnginePars, MotionEngine, TickOutcome};
use crate::core::path::Path;
use crate::post::drive_result::DriveResult;
use anyhow::Context;
use helpers::general::InputValueError;
use std::convert::TryFrom;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// * `target_speed` - (px/tick) Speed reached by pressing accelerate after the start
/// * `tick_period` - Period of the motion tick
/// * `clock_period` - Period of the elapsed time update
/// * `max_ticks` - Upper bound of simulated motion ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveSetup {
    pub target_speed: u32,
    pub tick_period: Duration,
    pub clock_period: Duration,
    pub max_ticks: u64,
}

/// handle_drive records the given path, starts the simulation, accelerates to the target speed
/// and simulates until the car arrives or `max_ticks` is reached. Time is simulated with the
/// tick and clock periods instead of wall-clock timers, so the result is deterministic.
pub fn handle_drive(
    engine_pars: &EnginePars,
    path: &Path,
    setup: &DriveSetup,
) -> anyhow::Result<DriveResult> {
    if !path.is_drivable() {
        return Err(InputValueError::new("demo path needs at least two points"))
            .context("Failed to set up drive!");
    }
    if setup.target_speed == 0 {
        return Err(InputValueError::new("demo speed must be >= 1"))
            .context("Failed to set up drive!");
    }
    if setup.tick_period == Duration::from_secs(0) || setup.clock_period == Duration::from_secs(0)
    {
        return Err(InputValueError::new("tick and clock periods must be > 0"))
            .context("Failed to set up drive!");
    }

    let mut engine = MotionEngine::new(*engine_pars);

    // record path
    for (i, point) in path.points().iter().enumerate() {
        if i == 0 {
            engine.begin_path(*point);
        } else {
            engine.extend_path(*point);
        }
    }
    engine.end_path();

    // start and accelerate
    let t_start = Instant::now();
    engine.start(t_start);
    while f64::from(setup.target_speed) > engine.state().car.speed && engine.accelerate() {}

    if engine.state().car.speed < f64::from(setup.target_speed) {
        warn!(
            "Demo speed {} exceeds the maximum speed, driving with {} instead",
            setup.target_speed,
            engine.state().car.speed
        );
    }

    // simulate
    let mut t_clock_next = t_start + setup.clock_period;
    let mut no_ticks = 0;
    let mut arrived = false;

    while no_ticks < setup.max_ticks {
        no_ticks += 1;
        let now = match tick_instant(t_start, setup.tick_period, no_ticks) {
            Some(now) => now,
            None => {
                warn!("Simulated time exceeds the clock range after {} ticks", no_ticks - 1);
                no_ticks -= 1;
                break;
            }
        };

        while t_clock_next <= now {
            engine.update_clock(t_clock_next);
            t_clock_next += setup.clock_period;
        }

        if engine.tick(now) == TickOutcome::Arrived {
            arrived = true;
            break;
        }
    }

    if arrived {
        debug!("Drive with speed {} arrived after {} ticks", setup.target_speed, no_ticks);
    } else {
        warn!(
            "Drive with speed {} stopped after {} ticks before reaching the end of the path",
            setup.target_speed, no_ticks
        );
    }

    let result = DriveResult::from_state(engine.state(), setup.target_speed, no_ticks, arrived);
    info!(
        "Drive finished: {:.1} px in {:.2}s",
        result.distance_traveled, result.elapsed_s
    );
    Ok(result)
}

/// Instant of motion tick `no_tick` on the synthetic clock, None if it cannot be represented.
pub fn tick_instant(t_start: Instant, tick_period: Duration, no_tick: u64) -> Option<Instant> {
    let nanos = tick_period.as_nanos().checked_mul(u128::from(no_tick))?;
    let nanos = u64::try_from(nanos).ok()?;
    t_start.checked_add(Duration::from_nanos(nanos))
}
