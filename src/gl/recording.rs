// src/gl/recording.rs

//! A headless `GlApi` that records the command stream instead of rendering.
//!
//! `RecordingGl` keeps a `GlState` up to date and applies the GL rules for
//! `begin`/`end` pairs, raising `GlError::InvalidOperation` the way a driver
//! would. In `RecordMode::CountOnly` it keeps state and counts commands but
//! stores none of them, which bounds memory when it runs against a real clock.

use super::state::ortho_matrix;
use super::{ClearMask, GlApi, GlError, GlState, MatrixMode, Primitive, StringName};
use log::{trace, warn};

/// One recorded GL call.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCommand {
    ClearColor([f32; 4]),
    Clear(ClearMask),
    Viewport {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    MatrixMode(MatrixMode),
    LoadIdentity,
    Ortho {
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        near: f64,
        far: f64,
    },
    Color([f32; 4]),
    Begin(Primitive),
    Vertex(f32, f32),
    End,
    Finish,
    GetString(StringName),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordMode {
    /// Store every command.
    Full,
    /// Track state and count commands without storing them.
    CountOnly,
}

pub const RECORDING_VENDOR: &str = "gl-call-bench";
pub const RECORDING_RENDERER: &str = "recording";
pub const RECORDING_VERSION: &str = "1.1 recording";

#[derive(Debug)]
pub struct RecordingGl {
    mode: RecordMode,
    state: GlState,
    commands: Vec<GlCommand>,
    command_count: u64,
    open_primitive: Option<Primitive>,
    vertices_in_primitive: usize,
    primitives_completed: u64,
    error: Option<GlError>,
}

impl RecordingGl {
    pub fn new(mode: RecordMode) -> Self {
        RecordingGl {
            mode,
            state: GlState::new(),
            commands: Vec::new(),
            command_count: 0,
            open_primitive: None,
            vertices_in_primitive: 0,
            primitives_completed: 0,
            error: None,
        }
    }

    pub fn state(&self) -> &GlState {
        &self.state
    }

    pub fn commands(&self) -> &[GlCommand] {
        &self.commands
    }

    /// Removes and returns all stored commands. Counters are kept.
    pub fn take_commands(&mut self) -> Vec<GlCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of commands issued since creation, in either mode.
    pub fn command_count(&self) -> u64 {
        self.command_count
    }

    /// Number of `begin`/`end` pairs closed without error.
    pub fn primitives_completed(&self) -> u64 {
        self.primitives_completed
    }

    fn record(&mut self, command: GlCommand) {
        self.command_count += 1;
        if self.mode == RecordMode::Full {
            self.commands.push(command);
        }
    }

    /// Sets the error flag if none is pending, like a GL driver does.
    fn raise(&mut self, error: GlError, during: &str) {
        warn!("Recording GL: {:?} raised by {}", error, during);
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// State-changing commands other than color/vertex are illegal inside `begin`/`end`.
    fn outside_primitive(&mut self, during: &str) -> bool {
        if self.open_primitive.is_some() {
            self.raise(GlError::InvalidOperation, during);
            false
        } else {
            true
        }
    }
}

impl Default for RecordingGl {
    fn default() -> Self {
        Self::new(RecordMode::Full)
    }
}

impl GlApi for RecordingGl {
    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.record(GlCommand::ClearColor([red, green, blue, alpha]));
        if self.outside_primitive("clear_color") {
            self.state.set_clear_color([red, green, blue, alpha]);
        }
    }

    fn clear(&mut self, mask: ClearMask) {
        self.record(GlCommand::Clear(mask));
        self.outside_primitive("clear");
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.record(GlCommand::Viewport {
            x,
            y,
            width,
            height,
        });
        if width < 0 || height < 0 {
            self.raise(GlError::InvalidValue, "viewport");
            return;
        }
        if self.outside_primitive("viewport") {
            self.state.set_viewport(x, y, width, height);
        }
    }

    fn matrix_mode(&mut self, mode: MatrixMode) {
        self.record(GlCommand::MatrixMode(mode));
        if self.outside_primitive("matrix_mode") {
            self.state.set_matrix_mode(mode);
        }
    }

    fn load_identity(&mut self) {
        self.record(GlCommand::LoadIdentity);
        if self.outside_primitive("load_identity") {
            self.state.load_identity();
        }
    }

    fn ortho(&mut self, left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) {
        self.record(GlCommand::Ortho {
            left,
            right,
            bottom,
            top,
            near,
            far,
        });
        if left == right || bottom == top || near == far {
            self.raise(GlError::InvalidValue, "ortho");
            return;
        }
        if self.outside_primitive("ortho") {
            self.state
                .mult_matrix(&ortho_matrix(left, right, bottom, top, near, far));
        }
    }

    fn color4f(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.record(GlCommand::Color([red, green, blue, alpha]));
        self.state.set_color([red, green, blue, alpha]);
    }

    fn begin(&mut self, primitive: Primitive) {
        self.record(GlCommand::Begin(primitive));
        if self.outside_primitive("begin") {
            self.open_primitive = Some(primitive);
            self.vertices_in_primitive = 0;
        }
    }

    fn vertex2f(&mut self, x: f32, y: f32) {
        self.record(GlCommand::Vertex(x, y));
        if self.open_primitive.is_some() {
            self.vertices_in_primitive += 1;
        } else {
            // Outside begin/end the result is undefined; flag it so tests see it.
            self.raise(GlError::InvalidOperation, "vertex2f");
        }
    }

    fn end(&mut self) {
        self.record(GlCommand::End);
        match self.open_primitive.take() {
            Some(primitive) => {
                trace!(
                    "Recording GL: closed {:?} with {} vertices",
                    primitive,
                    self.vertices_in_primitive
                );
                self.primitives_completed += 1;
            }
            None => self.raise(GlError::InvalidOperation, "end"),
        }
    }

    fn finish(&mut self) {
        self.record(GlCommand::Finish);
        self.outside_primitive("finish");
    }

    fn get_error(&mut self) -> Option<GlError> {
        self.error.take()
    }

    fn get_string(&mut self, name: StringName) -> Option<String> {
        self.record(GlCommand::GetString(name));
        let value = match name {
            StringName::Vendor => RECORDING_VENDOR,
            StringName::Renderer => RECORDING_RENDERER,
            StringName::Version => RECORDING_VERSION,
        };
        Some(value.to_string())
    }
}
