// src/stopwatch/mock.rs

use super::Stopwatch;
use std::cell::Cell;

/// A deterministic stopwatch for driving the benchmark loop in tests.
///
/// After each `restart`, the first `n` polls of `time()` report `0.0` and every
/// later poll reports `expired_secs`, where `n` is taken from `schedule` in
/// round-robin order (one entry per restart). With the benchmark's
/// `while time() < budget` loop this makes a trial run exactly `n` iterations.
#[derive(Debug)]
pub struct ScriptedStopwatch {
    schedule: Vec<u64>,
    expired_secs: f64,
    restarts: usize,
    polls: Cell<u64>,
    running: bool,
    frozen: Cell<f64>,
}

impl ScriptedStopwatch {
    pub fn new(schedule: Vec<u64>, expired_secs: f64) -> Self {
        assert!(!schedule.is_empty(), "schedule must not be empty");
        ScriptedStopwatch {
            schedule,
            expired_secs,
            restarts: 0,
            polls: Cell::new(0),
            running: false,
            frozen: Cell::new(0.0),
        }
    }

    /// Every trial expires at `expired_secs` after `loops` iterations.
    pub fn expiring_after(loops: u64, expired_secs: f64) -> Self {
        Self::new(vec![loops], expired_secs)
    }

    pub fn restarts(&self) -> usize {
        self.restarts
    }

    fn current_budget(&self) -> u64 {
        let index = self.restarts.saturating_sub(1) % self.schedule.len();
        self.schedule[index]
    }
}

impl Stopwatch for ScriptedStopwatch {
    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn reset(&mut self) {
        self.running = false;
        self.restarts += 1;
        self.polls.set(0);
        self.frozen.set(0.0);
    }

    fn time(&self) -> f64 {
        if !self.running {
            return self.frozen.get();
        }
        let polls = self.polls.get();
        self.polls.set(polls + 1);
        let value = if polls >= self.current_budget() {
            self.expired_secs
        } else {
            0.0
        };
        self.frozen.set(value);
        value
    }
}

/// A stopwatch whose reading advances by `step_secs` on every poll while it
/// runs, so each outer iteration of a trial appears to take exactly one step.
#[derive(Debug)]
pub struct SteppingStopwatch {
    step_secs: f64,
    polls: Cell<u64>,
    running: bool,
    frozen: Cell<f64>,
}

impl SteppingStopwatch {
    pub fn new(step_secs: f64) -> Self {
        SteppingStopwatch {
            step_secs,
            polls: Cell::new(0),
            running: false,
            frozen: Cell::new(0.0),
        }
    }
}

impl Stopwatch for SteppingStopwatch {
    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn reset(&mut self) {
        self.running = false;
        self.polls.set(0);
        self.frozen.set(0.0);
    }

    fn time(&self) -> f64 {
        if !self.running {
            return self.frozen.get();
        }
        let polls = self.polls.get() + 1;
        self.polls.set(polls);
        let value = polls as f64 * self.step_secs;
        self.frozen.set(value);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn expires_after_budgeted_polls() {
        let mut sw = ScriptedStopwatch::expiring_after(2, 1.0);
        sw.restart();
        assert_eq!(sw.time(), 0.0);
        assert_eq!(sw.time(), 0.0);
        assert_eq!(sw.time(), 1.0);
        sw.stop();
        assert_eq!(sw.time(), 1.0);
    }

    #[test]
    fn stepping_advances_per_poll_and_freezes() {
        let mut sw = SteppingStopwatch::new(0.5);
        sw.restart();
        assert_eq!(sw.time(), 0.5);
        assert_eq!(sw.time(), 1.0);
        sw.stop();
        assert_eq!(sw.time(), 1.0);
        sw.restart();
        assert_eq!(sw.time(), 0.5);
    }

    #[test]
    fn schedule_advances_per_restart() {
        let mut sw = ScriptedStopwatch::new(vec![0, 1], 2.0);
        sw.restart();
        assert_eq!(sw.time(), 2.0);
        sw.restart();
        assert_eq!(sw.time(), 0.0);
        assert_eq!(sw.time(), 2.0);
        sw.restart();
        assert_eq!(sw.time(), 2.0);
        assert_eq!(sw.restarts(), 3);
    }
}
