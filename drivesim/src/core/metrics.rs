use serde::Serialize;
use std::time::Instant;

/// SpeedSample is one point of the speed/time history (time in s since the run started, speed in
/// px per tick).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeedSample {
    pub time: f64,
    pub speed: f64,
}

/// RunMetrics collects the statistics of one simulation run. It is zeroed on start and on clear,
/// but survives a reset such that the last run can still be inspected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunMetrics {
    pub distance_traveled: f64,
    pub start: Option<Instant>,
    pub elapsed_s: f64,
    pub max_speed: f64,
    pub average_speed: f64,
    pub speed_samples: Vec<SpeedSample>,
}

impl RunMetrics {
    /// Zeroes all statistics and stores the start time of a new run.
    pub fn begin_run(&mut self, now: Instant) {
        *self = RunMetrics {
            start: Some(now),
            ..RunMetrics::default()
        };
    }

    /// Seconds passed between the run start and `now` (0.0 if no run was started yet).
    pub fn secs_since_start(&self, now: Instant) -> f64 {
        self.start
            .map(|start| now.saturating_duration_since(start).as_secs_f64())
            .unwrap_or(0.0)
    }

    pub fn update_elapsed(&mut self, now: Instant) {
        self.elapsed_s = self.secs_since_start(now);
    }

    pub fn add_distance(&mut self, dist: f64) {
        self.distance_traveled += dist;
    }

    pub fn record_sample(&mut self, now: Instant, speed: f64) {
        if speed > self.max_speed {
            self.max_speed = speed;
        }
        let time = self.secs_since_start(now);
        self.speed_samples.push(SpeedSample { time, speed });
    }

    pub fn refresh_average(&mut self) {
        self.average_speed = average_speed(self.distance_traveled, self.elapsed_s);
    }
}

/// average_speed returns distance / time, or 0.0 as long as no time has passed.
pub fn average_speed(distance: f64, elapsed_s: f64) -> f64 {
    if elapsed_s > 0.0 {
        distance / elapsed_s
    } else {
        0.0
    }
}
