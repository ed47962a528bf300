use anyhow::Context;
use flume::{Receiver, RecvTimeoutError, Sender};
use helpers::general::InputValueError;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Ticker is a cancellable repeating task. A background thread emits the current instant every
/// `period`; the owner collects the ticks with `try_ticks` and applies them on its own thread, so
/// the simulation state keeps a single writer.
///
/// Dropping the ticker cancels it: the worker thread is woken up immediately and joined, and all
/// ticks that were emitted but not yet collected are discarded together with the channel.
#[derive(Debug)]
pub struct Ticker {
    name: String,
    period: Duration,
    rx: Receiver<Instant>,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn(name: &str, period: Duration) -> anyhow::Result<Ticker> {
        if period == Duration::from_secs(0) {
            return Err(InputValueError::new(format!("period of ticker {} must be > 0", name)))
                .context("Failed to create ticker!");
        }

        let (tick_tx, rx) = flume::unbounded();
        let (stop_tx, stop_rx) = flume::bounded(1);

        let handle = thread::Builder::new()
            .name(format!("ticker-{}", name))
            .spawn(move || run_ticker(period, stop_rx, tick_tx))
            .context(format!("Failed to spawn thread for ticker {}!", name))?;

        debug!("Ticker {} started with a period of {}ms", name, period.as_millis());

        Ok(Ticker {
            name: name.to_owned(),
            period,
            rx,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns all ticks emitted since the last call, oldest first, without blocking.
    pub fn try_ticks(&self) -> Vec<Instant> {
        self.rx.try_iter().collect()
    }

    /// Blocks until the next tick arrives or `timeout` passes.
    pub fn wait_tick(&self, timeout: Duration) -> Option<Instant> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Stops the ticker. Equivalent to dropping it.
    pub fn cancel(self) {}
}

impl Drop for Ticker {
    fn drop(&mut self) {
        // disconnecting the stop channel wakes the worker up
        self.stop_tx.take();

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Ticker {} worker thread panicked", self.name);
            }
        }
        debug!("Ticker {} cancelled", self.name);
    }
}

fn run_ticker(period: Duration, stop_rx: Receiver<()>, tick_tx: Sender<Instant>) {
    let mut t_next = Instant::now() + period;

    loop {
        let timeout = t_next.saturating_duration_since(Instant::now());
        match stop_rx.recv_timeout(timeout) {
            Err(RecvTimeoutError::Timeout) => {
                let now = Instant::now();
                if tick_tx.send(now).is_err() {
                    break;
                }
                // keep the rhythm, but do not burst to catch up after a stall
                t_next += period;
                if t_next < now {
                    t_next = now + period;
                }
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_period_is_rejected() {
        assert!(Ticker::spawn("zero", Duration::from_secs(0)).is_err());
    }

    #[test]
    fn ticks_are_delivered_in_order() {
        let ticker = Ticker::spawn("order", Duration::from_millis(2)).unwrap();
        let first = ticker.wait_tick(Duration::from_secs(2)).unwrap();
        let second = ticker.wait_tick(Duration::from_secs(2)).unwrap();
        assert!(second >= first);
        assert_eq!(ticker.period(), Duration::from_millis(2));
        assert_eq!(ticker.name(), "order");
    }

    #[test]
    fn cancel_stops_the_worker_promptly() {
        let ticker = Ticker::spawn("cancel", Duration::from_secs(3600)).unwrap();
        let t_start = Instant::now();
        ticker.cancel();
        // the worker must not sleep through its (very long) period
        assert!(t_start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn no_ticks_after_cancellation() {
        let ticker = Ticker::spawn("drain", Duration::from_millis(1)).unwrap();
        ticker.wait_tick(Duration::from_secs(2)).unwrap();
        let rx = ticker.rx.clone();
        drop(ticker);

        // whatever was queued before the cancellation may still be in the channel, but the
        // worker is gone, so the channel is disconnected and never refilled
        let _ = rx.try_iter().count();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(rx.try_iter().count(), 0);
        assert!(rx.is_disconnected());
    }
}
