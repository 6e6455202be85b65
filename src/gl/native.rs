// src/gl/native.rs

//! `GlApi` implementations that call into the system GL driver.
//!
//! Both types are only handed out by a context that is current on the calling
//! thread (see `platform::x11::glx::GlxContext`), which is the precondition
//! for every call below.

use super::ffi;
use super::{ClearMask, GlApi, GlError, MatrixMode, Primitive, StringName};
use anyhow::{anyhow, Result};
use libc::c_void;
use log::{debug, trace};
use std::ffi::CStr;
use std::marker::PhantomData;
use std::mem;

/// Converts a `glGetString` result into an owned string.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string.
unsafe fn gl_string(ptr: *const ffi::GLubyte) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr as *const libc::c_char).to_string_lossy().into_owned())
    }
}

/// Entry points bound at link time.
///
/// Zero-sized; every call goes straight to the libGL symbol. The raw-pointer
/// marker keeps it on the thread that owns the context.
#[derive(Debug)]
pub struct LinkedGl {
    _not_send: PhantomData<*const ()>,
}

impl LinkedGl {
    /// # Safety
    ///
    /// The caller must only use the returned value while a GL context is
    /// current on this thread.
    pub(crate) unsafe fn new() -> Self {
        LinkedGl {
            _not_send: PhantomData,
        }
    }
}

impl GlApi for LinkedGl {
    #[inline]
    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { ffi::glClearColor(red, green, blue, alpha) }
    }

    #[inline]
    fn clear(&mut self, mask: ClearMask) {
        unsafe { ffi::glClear(mask.bits()) }
    }

    #[inline]
    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { ffi::glViewport(x, y, width, height) }
    }

    #[inline]
    fn matrix_mode(&mut self, mode: MatrixMode) {
        unsafe { ffi::glMatrixMode(mode.to_raw()) }
    }

    #[inline]
    fn load_identity(&mut self) {
        unsafe { ffi::glLoadIdentity() }
    }

    #[inline]
    fn ortho(&mut self, left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) {
        unsafe { ffi::glOrtho(left, right, bottom, top, near, far) }
    }

    #[inline]
    fn color4f(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { ffi::glColor4f(red, green, blue, alpha) }
    }

    #[inline]
    fn begin(&mut self, primitive: Primitive) {
        unsafe { ffi::glBegin(primitive.to_raw()) }
    }

    #[inline]
    fn vertex2f(&mut self, x: f32, y: f32) {
        unsafe { ffi::glVertex2f(x, y) }
    }

    #[inline]
    fn end(&mut self) {
        unsafe { ffi::glEnd() }
    }

    fn finish(&mut self) {
        unsafe { ffi::glFinish() }
    }

    fn get_error(&mut self) -> Option<GlError> {
        GlError::from_raw(unsafe { ffi::glGetError() })
    }

    fn get_string(&mut self, name: StringName) -> Option<String> {
        unsafe { gl_string(ffi::glGetString(name.to_raw())) }
    }
}

/// Entry points resolved at runtime through a loader such as `glXGetProcAddress`.
#[derive(Debug, Clone, Copy)]
pub struct ProcTable {
    clear_color: ffi::PFNGLCLEARCOLORPROC,
    clear: ffi::PFNGLCLEARPROC,
    viewport: ffi::PFNGLVIEWPORTPROC,
    matrix_mode: ffi::PFNGLMATRIXMODEPROC,
    load_identity: ffi::PFNGLLOADIDENTITYPROC,
    ortho: ffi::PFNGLORTHOPROC,
    color4f: ffi::PFNGLCOLOR4FPROC,
    begin: ffi::PFNGLBEGINPROC,
    vertex2f: ffi::PFNGLVERTEX2FPROC,
    end: ffi::PFNGLENDPROC,
    finish: ffi::PFNGLFINISHPROC,
    get_error: ffi::PFNGLGETERRORPROC,
    get_string: ffi::PFNGLGETSTRINGPROC,
    _not_send: PhantomData<*const ()>,
}

/// Resolves one entry point and reinterprets it as the function pointer type `F`.
///
/// # Safety
///
/// `F` must be the `extern "C"` function pointer type matching the GL
/// prototype of `name`.
unsafe fn resolve<F: Copy>(
    loader: &mut dyn FnMut(&CStr) -> *const c_void,
    name: &CStr,
) -> Result<F> {
    debug_assert_eq!(mem::size_of::<F>(), mem::size_of::<*const c_void>());
    let ptr = loader(name);
    if ptr.is_null() {
        return Err(anyhow!(
            "GL entry point {} could not be resolved",
            name.to_string_lossy()
        ));
    }
    trace!("Resolved {} at {:p}", name.to_string_lossy(), ptr);
    Ok(mem::transmute_copy::<*const c_void, F>(&ptr))
}

impl ProcTable {
    /// Resolves every entry point through `loader`.
    ///
    /// # Safety
    ///
    /// `loader` must return either null or the address of the named GL
    /// function, and the table must only be used while a context compatible
    /// with the loader is current on this thread.
    pub(crate) unsafe fn load<L>(mut loader: L) -> Result<Self>
    where
        L: FnMut(&CStr) -> *const c_void,
    {
        let loader: &mut dyn FnMut(&CStr) -> *const c_void = &mut loader;
        let table = ProcTable {
            clear_color: resolve(loader, c"glClearColor")?,
            clear: resolve(loader, c"glClear")?,
            viewport: resolve(loader, c"glViewport")?,
            matrix_mode: resolve(loader, c"glMatrixMode")?,
            load_identity: resolve(loader, c"glLoadIdentity")?,
            ortho: resolve(loader, c"glOrtho")?,
            color4f: resolve(loader, c"glColor4f")?,
            begin: resolve(loader, c"glBegin")?,
            vertex2f: resolve(loader, c"glVertex2f")?,
            end: resolve(loader, c"glEnd")?,
            finish: resolve(loader, c"glFinish")?,
            get_error: resolve(loader, c"glGetError")?,
            get_string: resolve(loader, c"glGetString")?,
            _not_send: PhantomData,
        };
        debug!("GL proc table loaded (13 entry points).");
        Ok(table)
    }
}

impl GlApi for ProcTable {
    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { (self.clear_color)(red, green, blue, alpha) }
    }

    fn clear(&mut self, mask: ClearMask) {
        unsafe { (self.clear)(mask.bits()) }
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { (self.viewport)(x, y, width, height) }
    }

    fn matrix_mode(&mut self, mode: MatrixMode) {
        unsafe { (self.matrix_mode)(mode.to_raw()) }
    }

    fn load_identity(&mut self) {
        unsafe { (self.load_identity)() }
    }

    fn ortho(&mut self, left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) {
        unsafe { (self.ortho)(left, right, bottom, top, near, far) }
    }

    fn color4f(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { (self.color4f)(red, green, blue, alpha) }
    }

    fn begin(&mut self, primitive: Primitive) {
        unsafe { (self.begin)(primitive.to_raw()) }
    }

    fn vertex2f(&mut self, x: f32, y: f32) {
        unsafe { (self.vertex2f)(x, y) }
    }

    fn end(&mut self) {
        unsafe { (self.end)() }
    }

    fn finish(&mut self) {
        unsafe { (self.finish)() }
    }

    fn get_error(&mut self) -> Option<GlError> {
        GlError::from_raw(unsafe { (self.get_error)() })
    }

    fn get_string(&mut self, name: StringName) -> Option<String> {
        unsafe { gl_string((self.get_string)(name.to_raw())) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use test_log::test;

    extern "C" fn fake_entry_point() {}

    #[test]
    fn load_fails_on_missing_entry_point() {
        let err = unsafe { ProcTable::load(|_name: &CStr| std::ptr::null()) }.unwrap_err();
        assert!(err.to_string().contains("glClearColor"), "got: {}", err);
    }

    #[test]
    fn load_requests_every_entry_point_once() {
        let mut requested: HashMap<String, usize> = HashMap::new();
        let table = unsafe {
            ProcTable::load(|name: &CStr| {
                *requested
                    .entry(name.to_string_lossy().into_owned())
                    .or_default() += 1;
                fake_entry_point as *const c_void
            })
        };
        // The table is never called: its pointers do not have the GL signatures.
        assert!(table.is_ok());
        assert_eq!(requested.len(), 13);
        assert!(requested.values().all(|&count| count == 1));
        assert!(requested.contains_key("glVertex2f"));
    }

    #[test]
    fn null_string_maps_to_none() {
        assert_eq!(unsafe { gl_string(std::ptr::null()) }, None);
        let s = b"4.6 Mesa\0";
        assert_eq!(unsafe { gl_string(s.as_ptr()) }, Some("4.6 Mesa".to_string()));
    }
}
