// src/platform/x11/glx.rs

//! GLX visual selection and the GL context of the X11 canvas.

use super::connection::Connection;
use crate::context::{Capabilities, GlContext};
use crate::gl::native::{LinkedGl, ProcTable};
use crate::gl::GlApi;
use anyhow::{anyhow, Context, Result};
use libc::{c_int, c_void};
use log::{debug, info, trace, warn};
use std::ffi::CStr;
use std::ptr;

use x11::{glx, xlib};

/// Builds the zero-terminated attribute list for `glXChooseVisual`.
pub fn attribute_list(caps: &Capabilities) -> Vec<c_int> {
    let mut attributes = Vec::with_capacity(14);
    if caps.rgba {
        attributes.push(glx::GLX_RGBA);
    }
    if caps.double_buffered {
        attributes.push(glx::GLX_DOUBLEBUFFER);
    }
    for (attribute, bits) in [
        (glx::GLX_RED_SIZE, caps.red_bits),
        (glx::GLX_GREEN_SIZE, caps.green_bits),
        (glx::GLX_BLUE_SIZE, caps.blue_bits),
        (glx::GLX_ALPHA_SIZE, caps.alpha_bits),
        (glx::GLX_DEPTH_SIZE, caps.depth_bits),
    ] {
        if bits > 0 {
            attributes.push(attribute);
            attributes.push(bits as c_int);
        }
    }
    attributes.push(0);
    attributes
}

/// A visual returned by `glXChooseVisual`. Freed with `XFree` on drop.
#[derive(Debug)]
pub struct ChosenVisual {
    info: *mut xlib::XVisualInfo,
}

impl ChosenVisual {
    pub fn info(&self) -> &xlib::XVisualInfo {
        // SAFETY: non-null, checked in `choose_visual`, and alive until drop.
        unsafe { &*self.info }
    }

    fn raw(&self) -> *mut xlib::XVisualInfo {
        self.info
    }
}

impl Drop for ChosenVisual {
    fn drop(&mut self) {
        if !self.info.is_null() {
            unsafe {
                xlib::XFree(self.info as *mut c_void);
            }
            self.info = ptr::null_mut();
        }
    }
}

/// Picks a visual on the default screen matching `caps`.
pub fn choose_visual(connection: &Connection, caps: &Capabilities) -> Result<ChosenVisual> {
    let mut attributes = attribute_list(caps);
    debug!("glXChooseVisual attributes: {:?}", attributes);
    let info = unsafe {
        glx::glXChooseVisual(
            connection.display(),
            connection.screen(),
            attributes.as_mut_ptr(),
        )
    };
    if info.is_null() {
        return Err(anyhow!("No GLX visual matches the requested capabilities {}", caps));
    }
    Ok(ChosenVisual { info })
}

/// Reads back the capabilities the chosen visual actually provides.
pub fn query_capabilities(connection: &Connection, visual: &ChosenVisual) -> Capabilities {
    let display = connection.display();
    let get = |attribute: c_int| -> c_int {
        let mut value: c_int = 0;
        let status =
            unsafe { glx::glXGetConfig(display, visual.raw(), attribute, &mut value) };
        if status != 0 {
            warn!("glXGetConfig({}) failed with status {}", attribute, status);
            0
        } else {
            value
        }
    };
    let bits = |attribute: c_int| get(attribute).clamp(0, u8::MAX as c_int) as u8;

    Capabilities {
        rgba: get(glx::GLX_RGBA) != 0,
        double_buffered: get(glx::GLX_DOUBLEBUFFER) != 0,
        red_bits: bits(glx::GLX_RED_SIZE),
        green_bits: bits(glx::GLX_GREEN_SIZE),
        blue_bits: bits(glx::GLX_BLUE_SIZE),
        alpha_bits: bits(glx::GLX_ALPHA_SIZE),
        depth_bits: bits(glx::GLX_DEPTH_SIZE),
    }
}

fn glx_loader(name: &CStr) -> *const c_void {
    match unsafe { glx::glXGetProcAddress(name.as_ptr() as *const u8) } {
        Some(f) => f as *const c_void,
        None => ptr::null(),
    }
}

/// A GLX context bound to one window.
///
/// `bound_gl` hands out the link-time entry points; `current_gl` checks that
/// this context is still current and hands out the runtime-resolved table
/// as a trait object.
pub struct GlxContext {
    display: *mut xlib::Display,
    drawable: glx::GLXDrawable,
    raw: glx::GLXContext,
    bound: LinkedGl,
    procs: ProcTable,
}

impl GlxContext {
    /// Creates a direct context for `window_id` and makes it current.
    pub fn new(
        connection: &Connection,
        visual: &ChosenVisual,
        window_id: xlib::Window,
    ) -> Result<Self> {
        let display = connection.display();
        let raw = unsafe {
            glx::glXCreateContext(display, visual.raw(), ptr::null_mut(), xlib::True)
        };
        if raw.is_null() {
            return Err(anyhow!("glXCreateContext failed"));
        }
        if unsafe { glx::glXMakeCurrent(display, window_id, raw) } == xlib::False {
            unsafe { glx::glXDestroyContext(display, raw) };
            return Err(anyhow!("glXMakeCurrent failed for window {}", window_id));
        }
        let direct = unsafe { glx::glXIsDirect(display, raw) } != xlib::False;
        info!(
            "GLX context created ({} rendering).",
            if direct { "direct" } else { "indirect" }
        );

        // SAFETY: the context was just made current on this thread and the
        // loader is the one GLX provides for it.
        let procs = match unsafe { ProcTable::load(glx_loader) } {
            Ok(procs) => procs,
            Err(e) => {
                unsafe {
                    glx::glXMakeCurrent(display, 0, ptr::null_mut());
                    glx::glXDestroyContext(display, raw);
                }
                return Err(e).context("Failed to resolve GL entry points");
            }
        };

        Ok(GlxContext {
            display,
            drawable: window_id,
            raw,
            // SAFETY: only reachable through `bound_gl`, with the context current.
            bound: unsafe { LinkedGl::new() },
            procs,
        })
    }

    pub fn is_current(&self) -> bool {
        !self.raw.is_null() && unsafe { glx::glXGetCurrentContext() } == self.raw
    }

    /// Makes this context current on the calling thread if it is not already.
    pub fn make_current(&mut self) -> Result<()> {
        if self.raw.is_null() {
            return Err(anyhow!("the GLX context has been destroyed"));
        }
        if self.is_current() {
            return Ok(());
        }
        if unsafe { glx::glXMakeCurrent(self.display, self.drawable, self.raw) } == xlib::False {
            return Err(anyhow!(
                "glXMakeCurrent failed for window {}",
                self.drawable
            ));
        }
        trace!("GLX context made current again.");
        Ok(())
    }

    pub fn swap_buffers(&self) {
        if !self.raw.is_null() {
            unsafe { glx::glXSwapBuffers(self.display, self.drawable) };
        }
    }

    /// Releases and destroys the context. Idempotent.
    pub fn cleanup(&mut self) {
        if self.raw.is_null() {
            debug!("GLX context already destroyed; cleanup skipped.");
            return;
        }
        info!("Destroying GLX context.");
        unsafe {
            if glx::glXGetCurrentContext() == self.raw {
                glx::glXMakeCurrent(self.display, 0, ptr::null_mut());
            }
            glx::glXDestroyContext(self.display, self.raw);
        }
        self.raw = ptr::null_mut();
    }
}

impl GlContext for GlxContext {
    type Bound = LinkedGl;

    #[inline]
    fn bound_gl(&mut self) -> &mut LinkedGl {
        &mut self.bound
    }

    fn current_gl(&mut self) -> Result<&mut dyn GlApi> {
        if !self.is_current() {
            return Err(anyhow!("the GLX context is not current on this thread"));
        }
        trace!("GlxContext: current_gl lookup");
        Ok(&mut self.procs)
    }
}

impl Drop for GlxContext {
    fn drop(&mut self) {
        if !self.raw.is_null() {
            warn!("GlxContext dropped without explicit cleanup. The context leaks until the display closes.");
        }
    }
}
