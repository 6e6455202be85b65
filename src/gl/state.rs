// src/gl/state.rs

//! Explicit GL context state.
//!
//! Matrices are column-major, as GL stores them.

use super::MatrixMode;

pub type Matrix4 = [f32; 16];

pub const IDENTITY: Matrix4 = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// The slice of GL context state the benchmark touches.
///
/// Owned by a context object and changed only through the setters below.
#[derive(Debug, Clone, PartialEq)]
pub struct GlState {
    clear_color: [f32; 4],
    matrix_mode: MatrixMode,
    projection: Matrix4,
    modelview: Matrix4,
    color: [f32; 4],
    viewport: [i32; 4],
}

impl Default for GlState {
    fn default() -> Self {
        GlState {
            clear_color: [0.0, 0.0, 0.0, 0.0],
            matrix_mode: MatrixMode::Modelview,
            projection: IDENTITY,
            modelview: IDENTITY,
            color: [1.0, 1.0, 1.0, 1.0],
            viewport: [0, 0, 0, 0],
        }
    }
}

impl GlState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn matrix_mode(&self) -> MatrixMode {
        self.matrix_mode
    }

    pub fn projection(&self) -> &Matrix4 {
        &self.projection
    }

    pub fn modelview(&self) -> &Matrix4 {
        &self.modelview
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    pub fn viewport(&self) -> [i32; 4] {
        self.viewport
    }

    pub fn set_clear_color(&mut self, rgba: [f32; 4]) {
        self.clear_color = rgba.map(|c| c.clamp(0.0, 1.0));
    }

    pub fn set_matrix_mode(&mut self, mode: MatrixMode) {
        self.matrix_mode = mode;
    }

    pub fn set_color(&mut self, rgba: [f32; 4]) {
        self.color = rgba;
    }

    pub fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.viewport = [x, y, width, height];
    }

    pub fn load_identity(&mut self) {
        *self.current_matrix_mut() = IDENTITY;
    }

    /// Post-multiplies the current matrix by `m`, as `glMultMatrix` does.
    pub fn mult_matrix(&mut self, m: &Matrix4) {
        let current = self.current_matrix_mut();
        *current = multiply(current, m);
    }

    fn current_matrix_mut(&mut self) -> &mut Matrix4 {
        match self.matrix_mode {
            MatrixMode::Modelview => &mut self.modelview,
            MatrixMode::Projection => &mut self.projection,
        }
    }
}

/// Column-major `a * b`.
pub fn multiply(a: &Matrix4, b: &Matrix4) -> Matrix4 {
    let mut out = [0.0f32; 16];
    for col in 0..4 {
        for row in 0..4 {
            out[col * 4 + row] = (0..4).map(|k| a[k * 4 + row] * b[col * 4 + k]).sum();
        }
    }
    out
}

/// The matrix `glOrtho` multiplies onto the current matrix.
pub fn ortho_matrix(left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) -> Matrix4 {
    let mut m = [0.0f32; 16];
    m[0] = (2.0 / (right - left)) as f32;
    m[5] = (2.0 / (top - bottom)) as f32;
    m[10] = (-2.0 / (far - near)) as f32;
    m[12] = (-(right + left) / (right - left)) as f32;
    m[13] = (-(top + bottom) / (top - bottom)) as f32;
    m[14] = (-(far + near) / (far - near)) as f32;
    m[15] = 1.0;
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn unit_square_ortho_maps_to_clip_space() {
        let m = ortho_matrix(0.0, 1.0, 0.0, 1.0, -1.0, 1.0);
        #[rustfmt::skip]
        let expected: Matrix4 = [
            2.0, 0.0, 0.0, 0.0,
            0.0, 2.0, 0.0, 0.0,
            0.0, 0.0, -1.0, 0.0,
            -1.0, -1.0, 0.0, 1.0,
        ];
        assert_eq!(m, expected);
    }

    #[test]
    fn multiply_by_identity_is_noop() {
        let m = ortho_matrix(0.0, 1.0, 0.0, 1.0, -1.0, 1.0);
        assert_eq!(multiply(&IDENTITY, &m), m);
        assert_eq!(multiply(&m, &IDENTITY), m);
    }

    #[test]
    fn matrix_ops_target_current_mode() {
        let mut state = GlState::new();
        state.set_matrix_mode(MatrixMode::Projection);
        state.mult_matrix(&ortho_matrix(0.0, 1.0, 0.0, 1.0, -1.0, 1.0));
        assert_ne!(state.projection(), &IDENTITY);
        assert_eq!(state.modelview(), &IDENTITY);

        state.load_identity();
        assert_eq!(state.projection(), &IDENTITY);
    }

    #[test]
    fn clear_color_is_clamped() {
        let mut state = GlState::new();
        state.set_clear_color([2.0, -1.0, 0.5, 1.0]);
        assert_eq!(state.clear_color(), [1.0, 0.0, 0.5, 1.0]);
    }
}
