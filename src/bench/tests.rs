// src/bench/tests.rs

use super::*;
use crate::canvas::HeadlessCanvas;
use crate::config::BenchConfig;
use crate::context::RecordingContext;
use crate::gl::recording::{GlCommand, RecordMode, RECORDING_VENDOR, RECORDING_VERSION};
use crate::gl::state::{ortho_matrix, IDENTITY};
use crate::stopwatch::mock::{ScriptedStopwatch, SteppingStopwatch};
use crate::stopwatch::WallStopwatch;
use test_log::test;

fn settings(trials: usize, trial_seconds: f64) -> BenchConfig {
    BenchConfig {
        trials,
        trial_seconds,
        finish_before_stop: false,
    }
}

fn scripted_driver(
    schedule: Vec<u64>,
    trials: usize,
) -> BenchmarkDriver<ScriptedStopwatch, Vec<u8>> {
    BenchmarkDriver::new(
        ScriptedStopwatch::new(schedule, 1.0),
        Vec::new(),
        settings(trials, 1.0),
    )
}

fn output_lines(driver: &BenchmarkDriver<ScriptedStopwatch, Vec<u8>>) -> Vec<String> {
    String::from_utf8(driver.output().clone())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Splits a redraw's command log into per-trial segments, one per clear.
fn segments(commands: &[GlCommand]) -> Vec<&[GlCommand]> {
    let starts: Vec<usize> = commands
        .iter()
        .enumerate()
        .filter(|(_, c)| matches!(c, GlCommand::Clear(_)))
        .map(|(i, _)| i)
        .collect();
    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(commands.len());
            &commands[start..end]
        })
        .collect()
}

#[test]
fn fifty_loops_before_expiry_reports_fifty() {
    let mut driver = scripted_driver(vec![50], 3);
    let mut ctx = RecordingContext::new(RecordMode::CountOnly);

    let reports = driver.on_redraw(&mut ctx).unwrap();

    assert!(reports.iter().all(|r| r.loops == 50));
    let lines = output_lines(&driver);
    assert!(lines.iter().any(|l| l.contains("rate=50 loops per second")));
    assert_eq!(lines[0], "new rate=50 loops per second");
    assert_eq!(lines[1], "old rate=50 loops per second");
}

#[test]
fn redraw_runs_three_trials_of_two_reports() {
    let mut driver = scripted_driver(vec![1], 3);
    let mut ctx = RecordingContext::new(RecordMode::CountOnly);

    let reports = driver.on_redraw(&mut ctx).unwrap();

    assert_eq!(reports.len(), 6);
    for (trial, pair) in reports.chunks(2).enumerate() {
        assert_eq!(pair[0].trial, trial);
        assert_eq!(pair[0].convention, Convention::Bound);
        assert_eq!(pair[1].trial, trial);
        assert_eq!(pair[1].convention, Convention::Fetched);
    }
    let lines = output_lines(&driver);
    assert_eq!(lines.len(), 6);
    for pair in lines.chunks(2) {
        assert!(pair[0].starts_with("new rate="));
        assert!(pair[1].starts_with("old rate="));
    }
    assert_eq!(driver.stopwatch().restarts(), 6);
}

#[test]
fn interface_is_fetched_once_per_trial() {
    let mut driver = scripted_driver(vec![3], 3);
    let mut ctx = RecordingContext::new(RecordMode::CountOnly);
    driver.on_redraw(&mut ctx).unwrap();
    assert_eq!(ctx.lookups(), 3);
}

#[test]
fn zero_loops_when_budget_already_spent() {
    let mut driver = scripted_driver(vec![0], 1);
    let mut ctx = RecordingContext::new(RecordMode::Full);

    let reports = driver.on_redraw(&mut ctx).unwrap();

    assert!(reports.iter().all(|r| r.loops == 0));
    // Only the two clears were issued.
    assert_eq!(
        ctx.gl().commands(),
        &[GlCommand::Clear(ClearMask::COLOR), GlCommand::Clear(ClearMask::COLOR)]
    );
}

#[test]
fn both_conventions_emit_identical_scene() {
    let mut driver = scripted_driver(vec![2], 3);
    let mut ctx = RecordingContext::new(RecordMode::Full);

    driver.on_redraw(&mut ctx).unwrap();

    let commands = ctx.gl_mut().take_commands();
    let segments = segments(&commands);
    assert_eq!(segments.len(), 6);
    for pair in segments.chunks(2) {
        assert_eq!(pair[0], pair[1], "conventions diverged within a trial");
    }
    assert_eq!(ctx.gl_mut().get_error(), None);
}

#[test]
fn outer_iteration_draws_hundred_white_quads() {
    let mut driver = scripted_driver(vec![1], 1);
    let mut ctx = RecordingContext::new(RecordMode::Full);
    driver.on_redraw(&mut ctx).unwrap();

    let commands = ctx.gl().commands();
    let segments = segments(commands);
    let bound = segments[0];
    // clear + 100 × (color, begin, 4 vertices, end)
    assert_eq!(bound.len(), 1 + QUADS_PER_LOOP * 7);

    let mut expected = vec![
        GlCommand::Color(QUAD_COLOR),
        GlCommand::Begin(Primitive::Polygon),
    ];
    expected.extend(QUAD_VERTICES.iter().map(|&(x, y)| GlCommand::Vertex(x, y)));
    expected.push(GlCommand::End);
    for quad in bound[1..].chunks(7) {
        assert_eq!(quad, expected.as_slice());
    }
    assert_eq!(ctx.gl().primitives_completed(), 2 * QUADS_PER_LOOP as u64);
}

#[test]
fn counts_only_completed_iterations() {
    let mut driver = scripted_driver(vec![4, 7], 1);
    let mut ctx = RecordingContext::new(RecordMode::CountOnly);

    let reports = driver.on_redraw(&mut ctx).unwrap();

    assert_eq!(reports[0].loops, 4);
    assert_eq!(reports[1].loops, 7);
    // Every begun primitive was ended.
    assert_eq!(
        ctx.gl().primitives_completed(),
        (4 + 7) * QUADS_PER_LOOP as u64
    );
}

#[test]
fn scripted_elapsed_time_reaches_budget() {
    let mut driver = scripted_driver(vec![5], 3);
    let mut ctx = RecordingContext::new(RecordMode::CountOnly);
    let reports = driver.on_redraw(&mut ctx).unwrap();
    assert!(reports.iter().all(|r| r.elapsed_secs >= 1.0));
}

#[test]
fn trials_overrun_by_at_most_one_iteration() {
    let budget = 1.0;
    let step = 0.3;
    let mut driver = BenchmarkDriver::new(
        SteppingStopwatch::new(step),
        Vec::new(),
        settings(3, budget),
    );
    let mut ctx = RecordingContext::new(RecordMode::CountOnly);

    let reports = driver.on_redraw(&mut ctx).unwrap();

    assert_eq!(reports.len(), 6);
    for report in &reports {
        // Polls read 0.3, 0.6, 0.9 (run) and 1.2 (stop).
        assert_eq!(report.loops, 3, "{:?}", report);
        assert!(report.elapsed_secs >= budget, "stopped early: {:?}", report);
        assert!(
            report.elapsed_secs < budget + step,
            "overran by more than one iteration: {:?}",
            report
        );
    }
}

#[test]
fn wall_clock_trials_never_stop_early() {
    let budget = 0.01;
    let mut driver = BenchmarkDriver::new(WallStopwatch::new(), Vec::new(), settings(3, budget));
    let mut ctx = RecordingContext::new(RecordMode::CountOnly);

    let reports = driver.on_redraw(&mut ctx).unwrap();

    assert_eq!(reports.len(), 6);
    for report in &reports {
        assert!(
            report.elapsed_secs >= budget,
            "trial stopped early: {:?}",
            report
        );
        assert!(report.loops >= 1);
    }
}

#[test]
fn finish_is_issued_only_when_enabled() {
    let mut ctx = RecordingContext::new(RecordMode::Full);
    let mut driver = BenchmarkDriver::new(
        ScriptedStopwatch::expiring_after(0, 1.0),
        Vec::new(),
        BenchConfig {
            trials: 1,
            trial_seconds: 1.0,
            finish_before_stop: true,
        },
    );
    driver.on_redraw(&mut ctx).unwrap();
    let finishes = ctx
        .gl()
        .commands()
        .iter()
        .filter(|c| **c == GlCommand::Finish)
        .count();
    assert_eq!(finishes, 2);

    let mut ctx = RecordingContext::new(RecordMode::Full);
    scripted_driver(vec![0], 1).on_redraw(&mut ctx).unwrap();
    assert!(!ctx.gl().commands().contains(&GlCommand::Finish));
}

#[test]
fn init_sets_projection_and_prints_strings() {
    let mut driver = scripted_driver(vec![0], 1);
    let mut ctx = RecordingContext::new(RecordMode::Full);

    driver.on_init(&mut ctx).unwrap();

    let state = ctx.gl().state();
    assert_eq!(state.clear_color(), [0.0, 0.0, 0.0, 1.0]);
    assert_eq!(state.projection(), &ortho_matrix(0.0, 1.0, 0.0, 1.0, -1.0, 1.0));
    assert_eq!(state.modelview(), &IDENTITY);
    assert_eq!(state.matrix_mode(), MatrixMode::Modelview);

    let lines = output_lines(&driver);
    assert_eq!(lines[0], format!("GL_VERSION: {}", RECORDING_VERSION));
    assert_eq!(lines[1], format!("GL_VENDOR: {}", RECORDING_VENDOR));
}

#[test]
fn redraw_fails_when_context_is_lost() {
    let mut driver = scripted_driver(vec![1], 3);
    let mut ctx = RecordingContext::new(RecordMode::CountOnly);
    ctx.set_current(false);

    let err = driver.on_redraw(&mut ctx).unwrap_err();

    assert!(format!("{:#}", err).contains("trial 0"));
    // The bound half of trial 0 was already reported.
    assert_eq!(output_lines(&driver), vec!["new rate=1 loops per second"]);
}

#[test]
fn resize_is_a_noop() {
    let mut driver = scripted_driver(vec![0], 1);
    driver.on_resize(1024, 768);
    assert!(driver.output().is_empty());
}

#[test]
fn headless_canvas_drives_full_cycle() {
    let mut driver = scripted_driver(vec![1], 3);
    let mut canvas = HeadlessCanvas::new(512, 512, RecordingContext::new(RecordMode::CountOnly));

    canvas.run(&mut driver, 2).unwrap();

    let lines = output_lines(&driver);
    // Two init lines, then 6 rate lines per frame.
    assert_eq!(lines.len(), 2 + 2 * 6);
    assert!(lines[0].starts_with("GL_VERSION: "));
    assert!(lines[1].starts_with("GL_VENDOR: "));
    assert_eq!(canvas.context().lookups(), 6);
    assert_eq!(canvas.context().gl().state().viewport(), [0, 0, 512, 512]);
}

#[test]
fn report_line_format() {
    let report = TrialReport {
        trial: 0,
        convention: Convention::Fetched,
        loops: 1234,
        elapsed_secs: 1.0001,
    };
    assert_eq!(report.to_string(), "old rate=1234 loops per second");
}
