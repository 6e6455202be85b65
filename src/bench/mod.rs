// src/bench/mod.rs

//! The benchmark driver: times the same scene under both calling conventions.
//!
//! Each redraw runs `trials` trials. A trial measures convention A (the
//! context's statically bound API) and then convention B (an interface object
//! fetched from the current context once per trial), each for a soft time
//! budget, and prints one rate line per convention.

use crate::canvas::GlPainter;
use crate::config::BenchConfig;
use crate::context::GlContext;
use crate::gl::{ClearMask, GlApi, MatrixMode, Primitive, StringName};
use crate::stopwatch::Stopwatch;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fmt;
use std::io::Write;

#[cfg(test)]
mod tests;

/// Quads drawn per outer-loop iteration.
pub const QUADS_PER_LOOP: usize = 100;

/// The quad, in logical coordinates of the `[0,1]×[0,1]` projection.
pub const QUAD_VERTICES: [(f32, f32); 4] = [(0.25, 0.25), (0.75, 0.25), (0.75, 0.75), (0.25, 0.75)];

/// Opaque white.
pub const QUAD_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// How the drawing calls of a trial reach the GL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Convention {
    /// Convention A: entry points bound once, dispatched statically.
    Bound,
    /// Convention B: interface object fetched per trial, dispatched dynamically.
    Fetched,
}

impl Convention {
    /// Prefix of the rate line printed for this convention.
    pub fn label(self) -> &'static str {
        match self {
            Convention::Bound => "new",
            Convention::Fetched => "old",
        }
    }
}

/// Result of one timed trial for one convention.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialReport {
    pub trial: usize,
    pub convention: Convention,
    /// Completed outer-loop iterations.
    pub loops: u64,
    /// Stopwatch reading after the trial stopped.
    pub elapsed_secs: f64,
}

impl fmt::Display for TrialReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rate={} loops per second",
            self.convention.label(),
            self.loops
        )
    }
}

/// One outer-loop iteration: `QUADS_PER_LOOP` white quads.
///
/// Generic so that a concrete `G` compiles to direct calls, while
/// `G = dyn GlApi` goes through the vtable.
#[inline]
pub fn draw_quads<G: GlApi + ?Sized>(gl: &mut G) {
    for _ in 0..QUADS_PER_LOOP {
        gl.color4f(QUAD_COLOR[0], QUAD_COLOR[1], QUAD_COLOR[2], QUAD_COLOR[3]);
        gl.begin(Primitive::Polygon);
        for &(x, y) in QUAD_VERTICES.iter() {
            gl.vertex2f(x, y);
        }
        gl.end();
    }
}

/// Runs outer iterations until the stopwatch reaches `budget_secs`.
///
/// The budget is checked before each iteration, so every counted iteration
/// completed and the trial may overrun by at most one iteration.
/// Returns `(loops, elapsed_secs)`.
fn run_timed<S, G>(stopwatch: &mut S, gl: &mut G, budget_secs: f64, finish: bool) -> (u64, f64)
where
    S: Stopwatch + ?Sized,
    G: GlApi + ?Sized,
{
    stopwatch.restart();
    gl.clear(ClearMask::COLOR);
    let mut loops: u64 = 0;
    while stopwatch.time() < budget_secs {
        draw_quads(gl);
        loops += 1;
    }
    if finish {
        gl.finish();
    }
    stopwatch.stop();
    (loops, stopwatch.time())
}

/// Drives the comparison and writes the rate lines to `out`.
pub struct BenchmarkDriver<S, W> {
    stopwatch: S,
    out: W,
    settings: BenchConfig,
}

impl<S: Stopwatch, W: Write> BenchmarkDriver<S, W> {
    pub fn new(stopwatch: S, out: W, settings: BenchConfig) -> Self {
        BenchmarkDriver {
            stopwatch,
            out,
            settings,
        }
    }

    pub fn stopwatch(&self) -> &S {
        &self.stopwatch
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// One-time context setup: clear color, unit-square orthographic
    /// projection, and a report of the implementation strings.
    pub fn on_init<C: GlContext>(&mut self, ctx: &mut C) -> Result<()> {
        let gl = ctx.bound_gl();
        gl.clear_color(0.0, 0.0, 0.0, 1.0);
        gl.matrix_mode(MatrixMode::Projection);
        gl.load_identity();
        gl.ortho(0.0, 1.0, 0.0, 1.0, -1.0, 1.0);
        gl.matrix_mode(MatrixMode::Modelview);
        gl.load_identity();

        let version = gl
            .get_string(StringName::Version)
            .unwrap_or_else(|| "unknown".to_string());
        let vendor = gl
            .get_string(StringName::Vendor)
            .unwrap_or_else(|| "unknown".to_string());
        if let Some(error) = gl.get_error() {
            warn!("GL reported {:?} during context setup", error);
        }

        writeln!(self.out, "GL_VERSION: {}", version).context("Failed to write GL version")?;
        writeln!(self.out, "GL_VENDOR: {}", vendor).context("Failed to write GL vendor")?;
        self.out.flush().context("Failed to flush output")?;
        info!("GL context initialized (version '{}', vendor '{}').", version, vendor);
        Ok(())
    }

    /// The scene uses normalized coordinates, so there is nothing to update.
    pub fn on_resize(&mut self, width: i32, height: i32) {
        debug!("Resize to {}x{} ignored by benchmark driver.", width, height);
    }

    /// Runs all trials and returns their reports in the order printed.
    pub fn on_redraw<C: GlContext>(&mut self, ctx: &mut C) -> Result<Vec<TrialReport>> {
        let mut reports = Vec::with_capacity(self.settings.trials * 2);
        for trial in 0..self.settings.trials {
            let bound = self.run_bound(ctx, trial);
            self.report(&bound)?;
            reports.push(bound);

            let fetched = self.run_fetched(ctx, trial)?;
            self.report(&fetched)?;
            reports.push(fetched);
        }
        Ok(reports)
    }

    fn run_bound<C: GlContext>(&mut self, ctx: &mut C, trial: usize) -> TrialReport {
        let gl: &mut C::Bound = ctx.bound_gl();
        let (loops, elapsed_secs) = run_timed(
            &mut self.stopwatch,
            gl,
            self.settings.trial_seconds,
            self.settings.finish_before_stop,
        );
        TrialReport {
            trial,
            convention: Convention::Bound,
            loops,
            elapsed_secs,
        }
    }

    fn run_fetched<C: GlContext>(&mut self, ctx: &mut C, trial: usize) -> Result<TrialReport> {
        let gl: &mut dyn GlApi = ctx
            .current_gl()
            .with_context(|| format!("Failed to fetch current GL for trial {}", trial))?;
        let (loops, elapsed_secs) = run_timed(
            &mut self.stopwatch,
            gl,
            self.settings.trial_seconds,
            self.settings.finish_before_stop,
        );
        Ok(TrialReport {
            trial,
            convention: Convention::Fetched,
            loops,
            elapsed_secs,
        })
    }

    fn report(&mut self, report: &TrialReport) -> Result<()> {
        debug!(
            "Trial {} ({:?}): {} loops in {:.6}s",
            report.trial, report.convention, report.loops, report.elapsed_secs
        );
        writeln!(self.out, "{}", report).context("Failed to write trial rate")?;
        self.out.flush().context("Failed to flush output")
    }
}

impl<C, S, W> GlPainter<C> for BenchmarkDriver<S, W>
where
    C: GlContext,
    S: Stopwatch,
    W: Write,
{
    fn init(&mut self, ctx: &mut C) -> Result<()> {
        self.on_init(ctx)
    }

    fn resize(&mut self, _ctx: &mut C, _x: i32, _y: i32, width: i32, height: i32) -> Result<()> {
        self.on_resize(width, height);
        Ok(())
    }

    fn paint(&mut self, ctx: &mut C) -> Result<()> {
        self.on_redraw(ctx).map(|_| ())
    }
}
