// src/platform/x11/connection.rs
#![allow(non_snake_case)] // Allow non-snake case for X11 types

use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use std::ptr;

use libc::c_int;
use x11::xlib;

/// Owns an X11 `Display` pointer and closes it on drop.
#[derive(Debug)]
struct ManagedDisplay {
    ptr: *mut xlib::Display,
}

impl ManagedDisplay {
    /// Opens the display named by `DISPLAY`.
    fn new() -> Result<Self> {
        let display_ptr = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display_ptr.is_null() {
            Err(anyhow!(
                "Failed to open X display. Check DISPLAY environment variable or X server status."
            ))
        } else {
            debug!("X display opened: {:p}", display_ptr);
            Ok(Self { ptr: display_ptr })
        }
    }

    #[inline]
    fn raw(&self) -> *mut xlib::Display {
        self.ptr
    }
}

impl Drop for ManagedDisplay {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            info!("Closing X11 display connection: {:p}", self.ptr);
            unsafe {
                let status = xlib::XCloseDisplay(self.ptr);
                if status != 0 {
                    warn!(
                        "XCloseDisplay returned non-zero status: {}. Display may not have closed cleanly.",
                        status
                    );
                }
            }
        }
    }
}

/// The connection to the X server and its default screen.
///
/// Visual and colormap are not taken from the screen defaults: the GL
/// drawable needs the visual GLX chooses (see `glx::ChosenVisual`).
#[derive(Debug)]
pub struct Connection {
    managed_display: ManagedDisplay,
    screen: c_int,
}

impl Connection {
    pub fn new() -> Result<Self> {
        info!("Establishing X11 server connection.");
        let managed_display = ManagedDisplay::new()?;
        let screen = unsafe { xlib::XDefaultScreen(managed_display.raw()) };
        debug!("Default screen number: {}", screen);
        info!("X11 server connection established successfully.");
        Ok(Connection {
            managed_display,
            screen,
        })
    }

    /// Marks the connection closed. Idempotent.
    ///
    /// After this call `display()` returns null and the drop of the managed
    /// display skips `XCloseDisplay`.
    pub fn cleanup(&mut self) -> Result<()> {
        if !self.managed_display.ptr.is_null() {
            info!(
                "Closing X11 display connection: {:p}",
                self.managed_display.ptr
            );
            unsafe {
                xlib::XCloseDisplay(self.managed_display.ptr);
            }
            self.managed_display.ptr = ptr::null_mut();
        } else {
            debug!("X11 display connection already closed; cleanup skipped.");
        }
        Ok(())
    }

    /// The raw display pointer; null after `cleanup`.
    #[inline]
    pub fn display(&self) -> *mut xlib::Display {
        self.managed_display.raw()
    }

    #[inline]
    pub fn screen(&self) -> c_int {
        self.screen
    }

    /// The root window of the default screen.
    pub fn root_window(&self) -> xlib::Window {
        unsafe { xlib::XRootWindow(self.display(), self.screen) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    // Connection::new() needs a running X server, so only the pointer
    // bookkeeping is covered here.

    #[test]
    fn cleanup_on_closed_connection_is_ok() {
        let mut conn = Connection {
            managed_display: ManagedDisplay {
                ptr: ptr::null_mut(),
            },
            screen: 0,
        };
        assert!(conn.cleanup().is_ok());
        assert!(conn.cleanup().is_ok());
        assert!(conn.display().is_null());
    }
}
