// src/gl/mod.rs

//! The immediate-mode OpenGL surface used by the benchmark.
//!
//! `GlApi` is the narrow set of GL 1.1 entry points the benchmark issues. It
//! has three implementations:
//! - `native::LinkedGl`: calls the entry points linked into the binary from libGL.
//! - `native::ProcTable`: calls entry points resolved through the GLX loader.
//! - `recording::RecordingGl`: a headless implementation that records calls
//!   and tracks `GlState`, used by tests and the headless canvas.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

pub mod ffi;
pub mod native;
pub mod recording;
pub mod state;

pub use state::GlState;

bitflags! {
    /// Buffers affected by `GlApi::clear`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearMask: u32 {
        const DEPTH = ffi::GL_DEPTH_BUFFER_BIT;
        const COLOR = ffi::GL_COLOR_BUFFER_BIT;
    }
}

/// The matrix stack targeted by matrix operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatrixMode {
    Modelview,
    Projection,
}

impl MatrixMode {
    pub fn to_raw(self) -> ffi::GLenum {
        match self {
            MatrixMode::Modelview => ffi::GL_MODELVIEW,
            MatrixMode::Projection => ffi::GL_PROJECTION,
        }
    }
}

/// Primitive types accepted by `GlApi::begin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Polygon,
}

impl Primitive {
    pub fn to_raw(self) -> ffi::GLenum {
        match self {
            Primitive::Polygon => ffi::GL_POLYGON,
        }
    }
}

/// Implementation strings reported by `glGetString`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringName {
    Vendor,
    Renderer,
    Version,
}

impl StringName {
    pub fn to_raw(self) -> ffi::GLenum {
        match self {
            StringName::Vendor => ffi::GL_VENDOR,
            StringName::Renderer => ffi::GL_RENDERER,
            StringName::Version => ffi::GL_VERSION,
        }
    }
}

/// Errors reported by `GlApi::get_error`, mirroring the GL error flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlError {
    InvalidEnum,
    InvalidValue,
    InvalidOperation,
    StackOverflow,
    StackUnderflow,
    OutOfMemory,
    Unknown(u32),
}

impl GlError {
    /// Maps a raw `glGetError` value. `GL_NO_ERROR` maps to `None`.
    pub fn from_raw(code: ffi::GLenum) -> Option<Self> {
        match code {
            ffi::GL_NO_ERROR => None,
            ffi::GL_INVALID_ENUM => Some(GlError::InvalidEnum),
            ffi::GL_INVALID_VALUE => Some(GlError::InvalidValue),
            ffi::GL_INVALID_OPERATION => Some(GlError::InvalidOperation),
            ffi::GL_STACK_OVERFLOW => Some(GlError::StackOverflow),
            ffi::GL_STACK_UNDERFLOW => Some(GlError::StackUnderflow),
            ffi::GL_OUT_OF_MEMORY => Some(GlError::OutOfMemory),
            other => Some(GlError::Unknown(other)),
        }
    }
}

/// The drawing primitives the benchmark needs from a GL context.
///
/// All methods take `&mut self`: a GL context is single-threaded mutable state,
/// and the recording implementation updates its `GlState` through them.
pub trait GlApi {
    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32);
    fn clear(&mut self, mask: ClearMask);
    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn matrix_mode(&mut self, mode: MatrixMode);
    fn load_identity(&mut self);
    /// Multiplies the current matrix by an orthographic projection.
    fn ortho(&mut self, left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64);
    fn color4f(&mut self, red: f32, green: f32, blue: f32, alpha: f32);
    fn begin(&mut self, primitive: Primitive);
    fn vertex2f(&mut self, x: f32, y: f32);
    fn end(&mut self);
    /// Blocks until all previously issued commands have completed.
    fn finish(&mut self);
    /// Returns and clears the oldest pending error flag.
    fn get_error(&mut self) -> Option<GlError>;
    fn get_string(&mut self, name: StringName) -> Option<String>;
}
