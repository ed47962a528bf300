use drivesim::core::engine::{EnginePars, MotionEngine, TickOutcome};
use drivesim::core::geometry::Point;
use drivesim::core::state::SimState;
use drivesim::core::ticker::Ticker;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickKind {
    Clock,
    Motion,
}

/// DrivesimInterface connects the GUI with the simulation. It owns the motion engine and the two
/// timers (motion tick and elapsed time clock), which only exist while the simulation runs. Every
/// transition out of the running simulation, and the teardown of the GUI, drops both timers.
#[derive(Debug)]
pub struct DrivesimInterface {
    pub engine: MotionEngine,
    tick_period: Duration,
    clock_period: Duration,
    motion_ticker: Option<Ticker>,
    clock_ticker: Option<Ticker>,
}

impl DrivesimInterface {
    pub fn new(
        engine_pars: EnginePars,
        tick_period: Duration,
        clock_period: Duration,
    ) -> DrivesimInterface {
        DrivesimInterface {
            engine: MotionEngine::new(engine_pars),
            tick_period,
            clock_period,
            motion_ticker: None,
            clock_ticker: None,
        }
    }

    pub fn state(&self) -> &SimState {
        self.engine.state()
    }

    pub fn timers_active(&self) -> bool {
        self.motion_ticker.is_some() || self.clock_ticker.is_some()
    }

    // ---------------------------------------------------------------------------------------------
    // COMMANDS ------------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// Starts the simulation and its timers. If a timer cannot be created, the simulation is
    /// reset again and the error is returned.
    pub fn start(&mut self) -> anyhow::Result<bool> {
        if !self.engine.start(Instant::now()) {
            return Ok(false);
        }

        let timers = Ticker::spawn("motion", self.tick_period).and_then(|motion| {
            Ticker::spawn("clock", self.clock_period).map(|clock| (motion, clock))
        });

        match timers {
            Ok((motion, clock)) => {
                self.motion_ticker = Some(motion);
                self.clock_ticker = Some(clock);
                Ok(true)
            }
            Err(err) => {
                self.engine.reset();
                Err(err)
            }
        }
    }

    pub fn reset(&mut self) {
        self.stop_timers();
        self.engine.reset();
    }

    pub fn clear(&mut self) -> bool {
        if self.engine.clear() {
            self.stop_timers();
            true
        } else {
            false
        }
    }

    pub fn accelerate(&mut self) -> bool {
        self.engine.accelerate()
    }

    pub fn brake(&mut self) -> bool {
        self.engine.brake()
    }

    pub fn begin_path(&mut self, point: Point) -> bool {
        self.engine.begin_path(point)
    }

    pub fn extend_path(&mut self, point: Point) -> bool {
        self.engine.extend_path(point)
    }

    pub fn end_path(&mut self) -> bool {
        self.engine.end_path()
    }

    /// Releases all timers, called when the GUI is closed.
    pub fn shutdown(&mut self) {
        if self.timers_active() {
            info!("Stopping simulation timers on shutdown");
        }
        self.stop_timers();
    }

    fn stop_timers(&mut self) {
        self.motion_ticker = None;
        self.clock_ticker = None;
    }

    // ---------------------------------------------------------------------------------------------
    // UPDATE --------------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// update applies all ticks that arrived since the last call in chronological order and
    /// returns the number of applied motion ticks. When the car arrives at the end of the path,
    /// the timers are stopped and the remaining ticks are dropped.
    pub fn update(&mut self) -> usize {
        let mut ticks: Vec<(Instant, TickKind)> = Vec::new();
        if let Some(clock) = &self.clock_ticker {
            ticks.extend(clock.try_ticks().into_iter().map(|t| (t, TickKind::Clock)));
        }
        if let Some(motion) = &self.motion_ticker {
            ticks.extend(motion.try_ticks().into_iter().map(|t| (t, TickKind::Motion)));
        }
        ticks.sort_by_key(|&(t, _)| t);

        let mut no_motion_ticks = 0;
        for (t, kind) in ticks {
            match kind {
                TickKind::Clock => {
                    self.engine.update_clock(t);
                }
                TickKind::Motion => {
                    no_motion_ticks += 1;
                    if self.engine.tick(t) == TickOutcome::Arrived {
                        debug!("Car arrived, stopping timers");
                        self.stop_timers();
                        break;
                    }
                }
            }
        }
        no_motion_ticks
    }
}
