// src/gl/ffi.rs
#![allow(non_snake_case)] // GL entry point names
#![allow(non_camel_case_types)]

//! Raw declarations for the GL 1.1 entry points used by the benchmark.
//!
//! These symbols are exported by libGL itself and are resolved by the dynamic
//! linker at load time.

use libc::{c_double, c_float, c_int, c_uint};

pub type GLenum = c_uint;
pub type GLbitfield = c_uint;
pub type GLint = c_int;
pub type GLsizei = c_int;
pub type GLfloat = c_float;
pub type GLdouble = c_double;
pub type GLubyte = u8;

pub const GL_NO_ERROR: GLenum = 0;
pub const GL_INVALID_ENUM: GLenum = 0x0500;
pub const GL_INVALID_VALUE: GLenum = 0x0501;
pub const GL_INVALID_OPERATION: GLenum = 0x0502;
pub const GL_STACK_OVERFLOW: GLenum = 0x0503;
pub const GL_STACK_UNDERFLOW: GLenum = 0x0504;
pub const GL_OUT_OF_MEMORY: GLenum = 0x0505;

pub const GL_DEPTH_BUFFER_BIT: GLbitfield = 0x0000_0100;
pub const GL_COLOR_BUFFER_BIT: GLbitfield = 0x0000_4000;

pub const GL_POLYGON: GLenum = 0x0009;

pub const GL_MODELVIEW: GLenum = 0x1700;
pub const GL_PROJECTION: GLenum = 0x1701;

pub const GL_VENDOR: GLenum = 0x1F00;
pub const GL_RENDERER: GLenum = 0x1F01;
pub const GL_VERSION: GLenum = 0x1F02;

#[link(name = "GL")]
extern "C" {
    pub fn glClearColor(red: GLfloat, green: GLfloat, blue: GLfloat, alpha: GLfloat);
    pub fn glClear(mask: GLbitfield);
    pub fn glViewport(x: GLint, y: GLint, width: GLsizei, height: GLsizei);
    pub fn glMatrixMode(mode: GLenum);
    pub fn glLoadIdentity();
    pub fn glOrtho(
        left: GLdouble,
        right: GLdouble,
        bottom: GLdouble,
        top: GLdouble,
        near_val: GLdouble,
        far_val: GLdouble,
    );
    pub fn glColor4f(red: GLfloat, green: GLfloat, blue: GLfloat, alpha: GLfloat);
    pub fn glBegin(mode: GLenum);
    pub fn glVertex2f(x: GLfloat, y: GLfloat);
    pub fn glEnd();
    pub fn glFinish();
    pub fn glGetError() -> GLenum;
    pub fn glGetString(name: GLenum) -> *const GLubyte;
}

// Pointer types for the same entry points when resolved through a loader.
pub type PFNGLCLEARCOLORPROC = unsafe extern "C" fn(GLfloat, GLfloat, GLfloat, GLfloat);
pub type PFNGLCLEARPROC = unsafe extern "C" fn(GLbitfield);
pub type PFNGLVIEWPORTPROC = unsafe extern "C" fn(GLint, GLint, GLsizei, GLsizei);
pub type PFNGLMATRIXMODEPROC = unsafe extern "C" fn(GLenum);
pub type PFNGLLOADIDENTITYPROC = unsafe extern "C" fn();
pub type PFNGLORTHOPROC =
    unsafe extern "C" fn(GLdouble, GLdouble, GLdouble, GLdouble, GLdouble, GLdouble);
pub type PFNGLCOLOR4FPROC = unsafe extern "C" fn(GLfloat, GLfloat, GLfloat, GLfloat);
pub type PFNGLBEGINPROC = unsafe extern "C" fn(GLenum);
pub type PFNGLVERTEX2FPROC = unsafe extern "C" fn(GLfloat, GLfloat);
pub type PFNGLENDPROC = unsafe extern "C" fn();
pub type PFNGLFINISHPROC = unsafe extern "C" fn();
pub type PFNGLGETERRORPROC = unsafe extern "C" fn() -> GLenum;
pub type PFNGLGETSTRINGPROC = unsafe extern "C" fn(GLenum) -> *const GLubyte;
