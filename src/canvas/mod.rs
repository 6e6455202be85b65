// src/canvas/mod.rs

//! Callback contract between a GL canvas and the code that paints it.
//!
//! A canvas owns the context and calls its painter:
//! - `init` once, before anything else;
//! - `resize` before a paint whenever the drawable size changed (and before
//!   the first paint);
//! - `paint` on every redraw request.
//!
//! `PaintCycle` implements that ordering once so that the X11 canvas and the
//! headless canvas behave identically.

use crate::context::{GlContext, RecordingContext};
use crate::gl::GlApi;
use anyhow::Result;
use log::{debug, trace};

pub trait GlPainter<C: GlContext> {
    /// Called once with the context current, before the first resize or paint.
    fn init(&mut self, _ctx: &mut C) -> Result<()> {
        Ok(())
    }

    /// Called when the drawable size changed. The viewport is already updated.
    fn resize(&mut self, _ctx: &mut C, _x: i32, _y: i32, _width: i32, _height: i32) -> Result<()> {
        Ok(())
    }

    fn paint(&mut self, ctx: &mut C) -> Result<()>;
}

/// Tracks initialization and size changes between paints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintCycle {
    initialized: bool,
    size: (i32, i32),
    painted_size: Option<(i32, i32)>,
    paints: u64,
}

impl PaintCycle {
    pub fn new(width: i32, height: i32) -> Self {
        PaintCycle {
            initialized: false,
            size: (width, height),
            painted_size: None,
            paints: 0,
        }
    }

    /// Records a new drawable size; the painter sees it on the next paint.
    pub fn set_size(&mut self, width: i32, height: i32) {
        if self.size != (width, height) {
            debug!(
                "Drawable size changed from {}x{} to {}x{}",
                self.size.0, self.size.1, width, height
            );
            self.size = (width, height);
        }
    }

    pub fn size(&self) -> (i32, i32) {
        self.size
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn paints(&self) -> u64 {
        self.paints
    }

    /// Runs init (first time only), resize (if needed) and paint.
    pub fn paint<C, P>(&mut self, ctx: &mut C, painter: &mut P) -> Result<()>
    where
        C: GlContext,
        P: GlPainter<C> + ?Sized,
    {
        if !self.initialized {
            debug!("Initializing painter.");
            painter.init(ctx)?;
            self.initialized = true;
        }
        if self.painted_size != Some(self.size) {
            let (width, height) = self.size;
            ctx.bound_gl().viewport(0, 0, width, height);
            painter.resize(ctx, 0, 0, width, height)?;
            self.painted_size = Some(self.size);
        }
        trace!("Paint #{}", self.paints + 1);
        painter.paint(ctx)?;
        self.paints += 1;
        Ok(())
    }
}

/// A canvas without a window, painting into a `RecordingContext`.
#[derive(Debug)]
pub struct HeadlessCanvas {
    ctx: RecordingContext,
    cycle: PaintCycle,
}

impl HeadlessCanvas {
    pub fn new(width: i32, height: i32, ctx: RecordingContext) -> Self {
        HeadlessCanvas {
            ctx,
            cycle: PaintCycle::new(width, height),
        }
    }

    pub fn context(&self) -> &RecordingContext {
        &self.ctx
    }

    /// Runs `f` with the context made current, outside of any paint.
    pub fn run_with_context<R, F>(&mut self, f: F) -> Result<R>
    where
        F: FnOnce(&mut RecordingContext) -> Result<R>,
    {
        self.ctx.set_current(true);
        f(&mut self.ctx)
    }

    pub fn cycle(&self) -> &PaintCycle {
        &self.cycle
    }

    pub fn set_size(&mut self, width: i32, height: i32) {
        self.cycle.set_size(width, height);
    }

    pub fn paint<P>(&mut self, painter: &mut P) -> Result<()>
    where
        P: GlPainter<RecordingContext> + ?Sized,
    {
        self.cycle.paint(&mut self.ctx, painter)
    }

    /// Paints `frames` times, stopping at the first error.
    pub fn run<P>(&mut self, painter: &mut P, frames: usize) -> Result<()>
    where
        P: GlPainter<RecordingContext> + ?Sized,
    {
        for _ in 0..frames {
            self.paint(painter)?;
        }
        Ok(())
    }
}
