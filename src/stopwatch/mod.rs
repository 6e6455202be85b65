// src/stopwatch/mod.rs

//! Elapsed-time measurement for benchmark trials.

use std::time::{Duration, Instant};

#[cfg(test)]
pub mod mock;

/// A start/stop timer reporting elapsed seconds.
///
/// `time` can be polled while the stopwatch runs; after `stop` it reports the
/// total accumulated time.
pub trait Stopwatch {
    fn start(&mut self);
    fn stop(&mut self);
    /// Stops the stopwatch and zeroes the accumulated time.
    fn reset(&mut self);
    /// Elapsed time in seconds.
    fn time(&self) -> f64;

    /// Resets, then starts.
    fn restart(&mut self) {
        self.reset();
        self.start();
    }
}

/// Wall-clock stopwatch backed by `Instant`.
#[derive(Debug, Clone, Default)]
pub struct WallStopwatch {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl WallStopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }
}

impl Stopwatch for WallStopwatch {
    fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    fn stop(&mut self) {
        if let Some(started_at) = self.started_at.take() {
            self.accumulated += started_at.elapsed();
        }
    }

    fn reset(&mut self) {
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    fn time(&self) -> f64 {
        let running = self
            .started_at
            .map(|started_at| started_at.elapsed())
            .unwrap_or(Duration::ZERO);
        (self.accumulated + running).as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use test_log::test;

    #[test]
    fn fresh_stopwatch_reads_zero() {
        let sw = WallStopwatch::new();
        assert!(!sw.is_running());
        assert_eq!(sw.time(), 0.0);
    }

    #[test]
    fn stop_freezes_elapsed_time() {
        let mut sw = WallStopwatch::new();
        sw.restart();
        thread::sleep(Duration::from_millis(5));
        sw.stop();
        let frozen = sw.time();
        assert!(frozen >= 0.005, "elapsed {} < 5ms", frozen);
        thread::sleep(Duration::from_millis(2));
        assert_eq!(sw.time(), frozen);
    }

    #[test]
    fn start_after_stop_accumulates() {
        let mut sw = WallStopwatch::new();
        sw.start();
        thread::sleep(Duration::from_millis(2));
        sw.stop();
        let first = sw.time();
        sw.start();
        thread::sleep(Duration::from_millis(2));
        sw.stop();
        assert!(sw.time() > first);
    }

    #[test]
    fn restart_zeroes_and_runs() {
        let mut sw = WallStopwatch::new();
        sw.start();
        thread::sleep(Duration::from_millis(5));
        sw.stop();
        sw.restart();
        assert!(sw.is_running());
        assert!(sw.time() < 0.005);
    }
}
