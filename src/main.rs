// src/main.rs

use gl_call_bench::{
    bench::BenchmarkDriver,
    config::CONFIG,
    context::GlContext,
    gl::{GlApi, StringName},
    platform::x11::X11Canvas,
    stopwatch::WallStopwatch,
};

use anyhow::Context;
use log::{debug, info};
use std::io;

/// Main entry point for `gl-call-bench`.
fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting gl-call-bench...");
    debug!(
        "Effective configuration: {}",
        serde_json::to_string(&*CONFIG).context("Failed to serialize configuration")?
    );

    println!("{}", CONFIG.capabilities);

    let mut canvas = X11Canvas::new(&CONFIG.window, &CONFIG.capabilities)
        .context("Failed to initialize X11 GL canvas")?;

    let renderer = canvas
        .run_with_context(|ctx| Ok(ctx.bound_gl().get_string(StringName::Renderer)))?;
    info!("GL renderer: {}", renderer.as_deref().unwrap_or("unknown"));

    let mut driver =
        BenchmarkDriver::new(WallStopwatch::new(), io::stdout(), CONFIG.bench.clone());
    let result = canvas.run(&mut driver);

    canvas.cleanup()?;
    result?;

    info!("gl-call-bench exited successfully.");
    Ok(())
}
