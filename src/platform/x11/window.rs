// src/platform/x11/window.rs
#![allow(non_snake_case)] // Allow non-snake case for X11 types

use super::connection::Connection;
use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use std::ffi::CString;
use std::mem;

use libc::{c_char, c_int, c_uint};
use x11::xlib;

/// Events the canvas listens for.
pub const EVENT_MASK: libc::c_long =
    xlib::ExposureMask | xlib::StructureNotifyMask | xlib::KeyPressMask;

/// An X11 window created with a GL-capable visual.
///
/// Owns its colormap. `cleanup` must be called with the connection before
/// the connection closes; `Drop` only reports a missed cleanup.
#[derive(Debug)]
pub struct Window {
    id: xlib::Window,
    colormap: xlib::Colormap,
    wm_delete_window: xlib::Atom,
    protocols_atom: xlib::Atom,
    current_pixel_width: u32,
    current_pixel_height: u32,
}

impl Window {
    /// Creates the window (unmapped) for the given visual.
    pub fn new(
        connection: &Connection,
        visual_info: &xlib::XVisualInfo,
        width_px: u32,
        height_px: u32,
    ) -> Result<Self> {
        info!(
            "Creating X11 window: {}x{}px, visual id 0x{:x}, depth {}",
            width_px, height_px, visual_info.visualid, visual_info.depth
        );
        let display = connection.display();
        let root_window = connection.root_window();

        // SAFETY: display is open and visual_info comes from glXChooseVisual on it.
        let (window_id, colormap) = unsafe {
            let colormap =
                xlib::XCreateColormap(display, root_window, visual_info.visual, xlib::AllocNone);

            let mut attributes: xlib::XSetWindowAttributes = mem::zeroed();
            attributes.colormap = colormap;
            attributes.background_pixel = 0;
            attributes.border_pixel = 0;
            attributes.event_mask = EVENT_MASK;

            let id = xlib::XCreateWindow(
                display,
                root_window,
                0,
                0,
                width_px as c_uint,
                height_px as c_uint,
                0,
                visual_info.depth,
                xlib::InputOutput as c_uint,
                visual_info.visual,
                xlib::CWColormap | xlib::CWBackPixel | xlib::CWBorderPixel | xlib::CWEventMask,
                &mut attributes,
            );
            (id, colormap)
        };

        if window_id == 0 {
            unsafe {
                xlib::XFreeColormap(display, colormap);
            }
            return Err(anyhow!("XCreateWindow failed"));
        }
        debug!("X window created (ID: {})", window_id);

        Ok(Self {
            id: window_id,
            colormap,
            wm_delete_window: 0,
            protocols_atom: 0,
            current_pixel_width: width_px,
            current_pixel_height: height_px,
        })
    }

    /// Registers `WM_DELETE_WINDOW` and sets the title.
    pub fn setup_protocols_and_title(
        &mut self,
        connection: &Connection,
        title: &str,
    ) -> Result<()> {
        if self.id == 0 {
            warn!("setup_protocols_and_title called on an invalid window ID (0). Skipping.");
            return Ok(());
        }
        let display = connection.display();
        unsafe {
            self.wm_delete_window = xlib::XInternAtom(
                display,
                b"WM_DELETE_WINDOW\0".as_ptr() as *const c_char,
                xlib::False,
            );
            self.protocols_atom = xlib::XInternAtom(
                display,
                b"WM_PROTOCOLS\0".as_ptr() as *const c_char,
                xlib::False,
            );

            if self.wm_delete_window != 0 && self.protocols_atom != 0 {
                xlib::XSetWMProtocols(display, self.id, [self.wm_delete_window].as_mut_ptr(), 1);
                debug!("WM_PROTOCOLS (WM_DELETE_WINDOW) registered.");
            } else {
                warn!("Failed to get WM_DELETE_WINDOW or WM_PROTOCOLS atom. Closing the window may not end the benchmark.");
            }
        }
        self.set_title(connection, title)
    }

    /// Sets `WM_NAME` and the UTF-8 `_NET_WM_NAME`.
    pub fn set_title(&self, connection: &Connection, title: &str) -> Result<()> {
        let display = connection.display();
        let title_c_str = CString::new(title).context("Failed to create CString for title")?;
        unsafe {
            xlib::XStoreName(display, self.id, title_c_str.as_ptr() as *mut c_char);

            let net_wm_name_atom = xlib::XInternAtom(
                display,
                b"_NET_WM_NAME\0".as_ptr() as *const c_char,
                xlib::False,
            );
            let utf8_string_atom = xlib::XInternAtom(
                display,
                b"UTF8_STRING\0".as_ptr() as *const c_char,
                xlib::False,
            );
            if net_wm_name_atom != 0 && utf8_string_atom != 0 {
                xlib::XChangeProperty(
                    display,
                    self.id,
                    net_wm_name_atom,
                    utf8_string_atom,
                    8,
                    xlib::PropModeReplace,
                    title_c_str.as_ptr() as *const u8,
                    title_c_str.as_bytes().len() as c_int,
                );
            }
        }
        debug!("Window title set to: {}", title);
        Ok(())
    }

    /// Makes the window visible.
    pub fn map_and_flush(&self, connection: &Connection) {
        if self.id == 0 {
            warn!("map_and_flush called on an invalid window ID (0).");
            return;
        }
        info!("Mapping window ID: {}", self.id);
        unsafe {
            xlib::XMapWindow(connection.display(), self.id);
            xlib::XFlush(connection.display());
        }
    }

    /// Destroys the window and frees its colormap. Idempotent.
    pub fn cleanup(&mut self, connection: &Connection) {
        if self.id != 0 && !connection.display().is_null() {
            info!("Destroying X11 window (ID: {}).", self.id);
            unsafe {
                xlib::XDestroyWindow(connection.display(), self.id);
                if self.colormap != 0 {
                    xlib::XFreeColormap(connection.display(), self.colormap);
                }
                xlib::XFlush(connection.display());
            }
            self.id = 0;
            self.colormap = 0;
        } else {
            debug!("Window already destroyed or connection is invalid; cleanup skipped.");
        }
    }

    #[inline]
    pub fn id(&self) -> xlib::Window {
        self.id
    }

    #[inline]
    pub fn wm_delete_window_atom(&self) -> xlib::Atom {
        self.wm_delete_window
    }

    #[inline]
    pub fn protocols_atom(&self) -> xlib::Atom {
        self.protocols_atom
    }

    #[inline]
    pub fn current_dimensions_pixels(&self) -> (u32, u32) {
        (self.current_pixel_width, self.current_pixel_height)
    }

    /// Updates the cached size after a `ConfigureNotify`. Returns whether it changed.
    pub fn update_dimensions(&mut self, width_px: u32, height_px: u32) -> bool {
        if self.current_pixel_width != width_px || self.current_pixel_height != height_px {
            debug!(
                "Updating cached window dimensions from {}x{} to {}x{}",
                self.current_pixel_width, self.current_pixel_height, width_px, height_px
            );
            self.current_pixel_width = width_px;
            self.current_pixel_height = height_px;
            true
        } else {
            false
        }
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        if self.id != 0 {
            error!(
                "Window (ID: {}) dropped without explicit cleanup. X server resources may leak.",
                self.id
            );
        }
    }
}

#[cfg(test)]
pub(crate) fn detached_window(width: u32, height: u32) -> Window {
    Window {
        id: 0,
        colormap: 0,
        wm_delete_window: 42,
        protocols_atom: 41,
        current_pixel_width: width,
        current_pixel_height: height,
    }
}
