// src/context.rs

//! The graphics context seen by painters, and the capabilities requested for it.
//!
//! A `GlContext` exposes the same `GlApi` surface through two calling
//! conventions:
//! - `bound_gl()` returns a concrete type, so calls made through a generic
//!   function are dispatched statically.
//! - `current_gl()` looks the context up and returns a `&mut dyn GlApi`, so
//!   every call goes through the vtable.

use crate::gl::recording::{RecordMode, RecordingGl};
use crate::gl::GlApi;
use anyhow::{anyhow, Result};
use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt;

pub trait GlContext {
    /// The statically bound entry points of this context.
    type Bound: GlApi;

    fn bound_gl(&mut self) -> &mut Self::Bound;

    /// Fetches the interface object of the context current on this thread.
    ///
    /// Fails if this context is not current.
    fn current_gl(&mut self) -> Result<&mut dyn GlApi>;
}

/// Pixel format requested for (or reported by) a GL drawable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub rgba: bool,
    pub double_buffered: bool,
    pub red_bits: u8,
    pub green_bits: u8,
    pub blue_bits: u8,
    pub alpha_bits: u8,
    pub depth_bits: u8,
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities {
            rgba: true,
            double_buffered: true,
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            alpha_bits: 0,
            depth_bits: 24,
        }
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GLCaps[{} {}/{}/{}/{}, depth {}, {}]",
            if self.rgba { "rgba" } else { "indexed" },
            self.red_bits,
            self.green_bits,
            self.blue_bits,
            self.alpha_bits,
            self.depth_bits,
            if self.double_buffered {
                "double-buffered"
            } else {
                "single-buffered"
            }
        )
    }
}

/// A headless context backed by `RecordingGl`.
///
/// Both conventions reach the same recorder, so the command log shows one
/// stream of calls in issue order.
#[derive(Debug)]
pub struct RecordingContext {
    gl: RecordingGl,
    current: bool,
    lookups: u64,
}

impl RecordingContext {
    pub fn new(mode: RecordMode) -> Self {
        RecordingContext {
            gl: RecordingGl::new(mode),
            current: true,
            lookups: 0,
        }
    }

    pub fn gl(&self) -> &RecordingGl {
        &self.gl
    }

    pub fn gl_mut(&mut self) -> &mut RecordingGl {
        &mut self.gl
    }

    /// Number of successful `current_gl` lookups.
    pub fn lookups(&self) -> u64 {
        self.lookups
    }

    /// Simulates making the context current or releasing it.
    pub fn set_current(&mut self, current: bool) {
        self.current = current;
    }
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self::new(RecordMode::Full)
    }
}

impl GlContext for RecordingContext {
    type Bound = RecordingGl;

    fn bound_gl(&mut self) -> &mut RecordingGl {
        &mut self.gl
    }

    fn current_gl(&mut self) -> Result<&mut dyn GlApi> {
        if !self.current {
            return Err(anyhow!("no GL context is current on this thread"));
        }
        self.lookups += 1;
        trace!("RecordingContext: current_gl lookup #{}", self.lookups);
        Ok(&mut self.gl)
    }
}
