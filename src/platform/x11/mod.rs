// src/platform/x11/mod.rs

//! X11/GLX canvas: a window with a GL context, driving a `GlPainter`.

pub mod connection;
pub mod event;
pub mod glx;
pub mod window;

use crate::canvas::{GlPainter, PaintCycle};
use crate::config::WindowConfig;
use crate::context::Capabilities;
use anyhow::{Context, Result};
use log::{debug, error, info, trace, warn};
use std::mem;

use x11::xlib;

pub use connection::Connection;
pub use event::CanvasEvent;
pub use glx::GlxContext;
pub use window::Window;

/// A mapped X11 window whose GL context is current on the creating thread.
pub struct X11Canvas {
    connection: Connection,
    window: Window,
    glx: GlxContext,
    cycle: PaintCycle,
    auto_repaint: bool,
}

impl X11Canvas {
    /// Opens the display, creates a window with a visual matching
    /// `requested` and a GLX context for it, and maps the window.
    pub fn new(window_config: &WindowConfig, requested: &Capabilities) -> Result<Self> {
        info!("Creating X11 GL canvas.");
        let mut connection = Connection::new().context("Failed to connect to X server")?;

        let visual = match glx::choose_visual(&connection, requested) {
            Ok(visual) => visual,
            Err(e) => {
                if let Err(cleanup_err) = connection.cleanup() {
                    warn!("Error closing X11 connection after failed setup: {}", cleanup_err);
                }
                return Err(e).context("Failed to choose GLX visual");
            }
        };
        info!(
            "Visual capabilities: {}",
            glx::query_capabilities(&connection, &visual)
        );

        let mut window = match Window::new(
            &connection,
            visual.info(),
            window_config.width,
            window_config.height,
        ) {
            Ok(window) => window,
            Err(e) => {
                drop(visual);
                if let Err(cleanup_err) = connection.cleanup() {
                    warn!("Error closing X11 connection after failed setup: {}", cleanup_err);
                }
                return Err(e).context("Failed to create window");
            }
        };

        let glx = window
            .setup_protocols_and_title(&connection, &window_config.title)
            .and_then(|()| GlxContext::new(&connection, &visual, window.id()));
        drop(visual);
        let glx = match glx {
            Ok(glx) => glx,
            Err(e) => {
                window.cleanup(&connection);
                if let Err(cleanup_err) = connection.cleanup() {
                    warn!("Error closing X11 connection after failed setup: {}", cleanup_err);
                }
                return Err(e).context("Failed to set up GL context");
            }
        };

        window.map_and_flush(&connection);
        let (width, height) = window.current_dimensions_pixels();
        Ok(X11Canvas {
            connection,
            window,
            glx,
            cycle: PaintCycle::new(width as i32, height as i32),
            auto_repaint: window_config.auto_repaint,
        })
    }

    /// Runs `f` with the GL context current, outside of any paint.
    pub fn run_with_context<R, F>(&mut self, f: F) -> Result<R>
    where
        F: FnOnce(&mut GlxContext) -> Result<R>,
    {
        self.glx
            .make_current()
            .context("Failed to make GL context current")?;
        f(&mut self.glx)
    }

    /// Processes events until the window is closed.
    ///
    /// Exposes and resizes that arrive together cause a single paint. Each
    /// paint is followed by a buffer swap.
    pub fn run<P>(&mut self, painter: &mut P) -> Result<()>
    where
        P: GlPainter<GlxContext> + ?Sized,
    {
        info!("Entering X11 canvas event loop.");
        let display = self.connection.display();
        let mut needs_paint = false;
        let mut running = true;

        while running {
            // Block only when there is nothing left to paint.
            let mut block = !needs_paint;
            while block || unsafe { xlib::XPending(display) } > 0 {
                block = false;
                let mut xevent: xlib::XEvent = unsafe { mem::zeroed() };
                unsafe { xlib::XNextEvent(display, &mut xevent) };
                match event::translate(&mut xevent, &mut self.window) {
                    CanvasEvent::Expose => needs_paint = true,
                    CanvasEvent::Resize { width, height } => {
                        self.cycle.set_size(width as i32, height as i32);
                        needs_paint = true;
                    }
                    CanvasEvent::CloseRequested => {
                        info!("Close requested; leaving event loop.");
                        running = false;
                    }
                    CanvasEvent::Ignored => {}
                }
            }

            if running && needs_paint {
                trace!("Painting frame {}", self.cycle.paints() + 1);
                self.cycle
                    .paint(&mut self.glx, painter)
                    .context("Painter failed")?;
                self.glx.swap_buffers();
                needs_paint = self.auto_repaint;
            }
        }
        debug!("Event loop finished after {} paints.", self.cycle.paints());
        Ok(())
    }

    /// Releases GL, window and display resources in that order. Idempotent.
    pub fn cleanup(&mut self) -> Result<()> {
        info!("X11Canvas::cleanup() called, releasing X11 resources.");
        self.glx.cleanup();
        self.window.cleanup(&self.connection);
        self.connection.cleanup().map_err(|e| {
            error!("Error during X11Canvas connection cleanup: {}", e);
            e
        })
    }
}

impl Drop for X11Canvas {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            error!("Error during X11Canvas cleanup in drop: {}", e);
        }
    }
}
