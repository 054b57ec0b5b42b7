//! Screen/document coordinate conversion.
//!
//! Elements render at `document * total_zoom`, where
//! `total_zoom = fit_zoom * user_zoom`. The fit zoom shrinks the canvas into
//! the viewport but never enlarges it past 100%.

use serde::{Deserialize, Serialize};

use crate::{Canvas, EditorConfig, Point};

/// Zoom state of the editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Viewport width in screen pixels.
    pub width: f32,
    /// Viewport height in screen pixels.
    pub height: f32,
    fit_zoom: f32,
    user_zoom: f32,
    min_zoom: f32,
    max_zoom: f32,
    zoom_step: f32,
    fit_margin: f32,
}

impl Viewport {
    /// Create a viewport of the given size fitted to `canvas`.
    #[must_use]
    pub fn new(width: f32, height: f32, canvas: &Canvas, config: &EditorConfig) -> Self {
        let mut viewport = Self {
            width,
            height,
            fit_zoom: 1.0,
            user_zoom: 1.0,
            min_zoom: config.min_user_zoom,
            max_zoom: config.max_user_zoom,
            zoom_step: config.zoom_step,
            fit_margin: config.fit_margin,
        };
        viewport.refit(canvas);
        viewport
    }

    /// Resize the viewport and recompute the fit zoom.
    pub fn resize(&mut self, width: f32, height: f32, canvas: &Canvas) {
        self.width = width;
        self.height = height;
        self.refit(canvas);
    }

    /// Recompute the fit zoom for `canvas`, capped at 1.0.
    #[allow(clippy::cast_precision_loss)]
    pub fn refit(&mut self, canvas: &Canvas) {
        let available_w = (self.width - 2.0 * self.fit_margin).max(1.0);
        let available_h = (self.height - 2.0 * self.fit_margin).max(1.0);
        let fit = (available_w / canvas.width as f32).min(available_h / canvas.height as f32);
        self.fit_zoom = fit.min(1.0);
        tracing::debug!(fit_zoom = self.fit_zoom, "Viewport refit");
    }

    /// Auto-fit scale.
    #[must_use]
    pub fn fit_zoom(&self) -> f32 {
        self.fit_zoom
    }

    /// User-controlled zoom factor.
    #[must_use]
    pub fn user_zoom(&self) -> f32 {
        self.user_zoom
    }

    /// Product of fit zoom and user zoom.
    #[must_use]
    pub fn total_zoom(&self) -> f32 {
        self.fit_zoom * self.user_zoom
    }

    /// Set the user zoom, clamped to the configured bounds.
    pub fn set_user_zoom(&mut self, zoom: f32) {
        self.user_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Increase the user zoom by one step.
    pub fn zoom_in(&mut self) {
        self.set_user_zoom(self.step_by(self.zoom_step));
    }

    /// Decrease the user zoom by one step.
    pub fn zoom_out(&mut self) {
        self.set_user_zoom(self.step_by(-self.zoom_step));
    }

    /// Reset the user zoom to 100%.
    pub fn reset_zoom(&mut self) {
        self.user_zoom = 1.0;
    }

    // Snap to the step grid only when already on it, so repeated steps do
    // not accumulate float error and off-grid zooms still move by one step.
    fn step_by(&self, delta: f32) -> f32 {
        let next = self.user_zoom + delta;
        if self.zoom_step <= 0.0 {
            return next;
        }
        let steps = self.user_zoom / self.zoom_step;
        if (steps - steps.round()).abs() < 1e-3 {
            (next / self.zoom_step).round() * self.zoom_step
        } else {
            next
        }
    }

    /// Convert a screen point to document coordinates.
    #[must_use]
    pub fn screen_to_document(&self, point: Point) -> Point {
        let zoom = self.total_zoom();
        Point::new(point.x / zoom, point.y / zoom)
    }

    /// Convert a document point to screen coordinates.
    #[must_use]
    pub fn document_to_screen(&self, point: Point) -> Point {
        let zoom = self.total_zoom();
        Point::new(point.x * zoom, point.y * zoom)
    }

    /// Convert a screen-space distance to document units.
    #[must_use]
    pub fn screen_delta_to_document(&self, dx: f32, dy: f32) -> (f32, f32) {
        let zoom = self.total_zoom();
        (dx / zoom, dy / zoom)
    }
}
