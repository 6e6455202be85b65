// src/platform/x11/event.rs
#![allow(non_snake_case)] // Allow non-snake case for X11 types

use super::window::Window;
use log::{debug, trace};

use x11::{keysym, xlib};

/// What the canvas needs to know about one X event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasEvent {
    /// The last `Expose` of a series: the window needs a repaint.
    Expose,
    /// The window has a new size in pixels.
    Resize { width: u32, height: u32 },
    /// The window manager or the user asked to close the window.
    CloseRequested,
    Ignored,
}

/// Translates a raw event. Updates the window's cached size on resize.
pub fn translate(xevent: &mut xlib::XEvent, window: &mut Window) -> CanvasEvent {
    // SAFETY: `type_` is the common discriminant of the XEvent union.
    let event_type = unsafe { xevent.type_ };

    match event_type {
        xlib::Expose => {
            // SAFETY: event type checked above.
            let expose = unsafe { xevent.expose };
            if expose.count == 0 {
                trace!("XEvent: Expose (last of series)");
                CanvasEvent::Expose
            } else {
                CanvasEvent::Ignored
            }
        }
        xlib::ConfigureNotify => {
            // SAFETY: event type checked above.
            let configure = unsafe { xevent.configure };
            let (width, height) = (configure.width.max(0) as u32, configure.height.max(0) as u32);
            if window.update_dimensions(width, height) {
                debug!("XEvent: ConfigureNotify resize to {}x{}", width, height);
                CanvasEvent::Resize { width, height }
            } else {
                CanvasEvent::Ignored
            }
        }
        xlib::ClientMessage => {
            // SAFETY: event type checked above.
            let client = unsafe { xevent.client_message };
            if client.message_type == window.protocols_atom()
                && client.data.get_long(0) as xlib::Atom == window.wm_delete_window_atom()
            {
                debug!("XEvent: WM_DELETE_WINDOW received");
                CanvasEvent::CloseRequested
            } else {
                CanvasEvent::Ignored
            }
        }
        xlib::KeyPress => {
            // SAFETY: event type checked above; XLookupKeysym reads the key event only.
            let keysym = unsafe { xlib::XLookupKeysym(&mut xevent.key, 0) };
            if keysym == keysym::XK_Escape as xlib::KeySym {
                debug!("XEvent: Escape pressed");
                CanvasEvent::CloseRequested
            } else {
                CanvasEvent::Ignored
            }
        }
        other => {
            trace!("XEvent: type {} ignored", other);
            CanvasEvent::Ignored
        }
    }
}
