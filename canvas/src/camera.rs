#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::config::ZoomConfig;

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// How pan deltas and the stored offset relate to zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanMode {
    /// Offset is in screen pixels: `screen = world * zoom + pan`.
    Screen,
    /// Offset is in world units: `screen = (world + pan) * zoom`.
    #[default]
    World,
}

/// Zoom factor after a wheel event.
///
/// Only a wheel event with the zoom modifier held changes the zoom; anything
/// else returns `current` untouched. Scrolling up (negative `wheel_dy`) zooms in.
#[must_use]
pub fn zoom(current: f64, wheel_dy: f64, modifier: bool, limits: &ZoomConfig) -> f64 {
    if !modifier {
        return current;
    }
    limits.clamp(current - wheel_dy * limits.sensitivity)
}

/// Offset after applying a pan `delta` given in screen pixels.
///
/// In [`PanMode::World`] the delta is divided by `zoom` first, so the same
/// mouse movement covers more of the plane when zoomed out.
#[must_use]
pub fn pan(offset: Point, delta: Point, zoom: f64, mode: PanMode) -> Point {
    match mode {
        PanMode::Screen => Point::new(offset.x + delta.x, offset.y + delta.y),
        PanMode::World => Point::new(offset.x + delta.x / zoom, offset.y + delta.y / zoom),
    }
}

/// View transform for pan/zoom on the infinite canvas.
///
/// `zoom` is a scale factor (1.0 = no zoom) kept inside the configured bounds.
/// `pan_x` / `pan_y` are unconstrained; their unit depends on `mode`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
    pub mode: PanMode,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0, mode: PanMode::default() }
    }
}

impl Camera {
    /// Camera at zero offset with the given zoom and pan mode.
    #[must_use]
    pub fn new(zoom: f64, mode: PanMode) -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom, mode }
    }

    /// Current offset as a point.
    #[must_use]
    pub fn offset(&self) -> Point {
        Point::new(self.pan_x, self.pan_y)
    }

    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        match self.mode {
            PanMode::Screen => Point::new((screen.x - self.pan_x) / self.zoom, (screen.y - self.pan_y) / self.zoom),
            PanMode::World => Point::new(screen.x / self.zoom - self.pan_x, screen.y / self.zoom - self.pan_y),
        }
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        match self.mode {
            PanMode::Screen => Point::new(world.x * self.zoom + self.pan_x, world.y * self.zoom + self.pan_y),
            PanMode::World => Point::new((world.x + self.pan_x) * self.zoom, (world.y + self.pan_y) * self.zoom),
        }
    }

    /// Convert a world-space distance to screen pixels.
    #[must_use]
    pub fn world_dist_to_screen(&self, world_dist: f64) -> f64 {
        world_dist * self.zoom
    }

    /// Pan by a screen-space delta according to the camera's mode.
    pub fn pan_by(&mut self, delta: Point) {
        let next = pan(self.offset(), delta, self.zoom, self.mode);
        self.pan_x = next.x;
        self.pan_y = next.y;
    }

    /// Apply a wheel zoom. Returns `true` if the zoom changed.
    pub fn wheel_zoom(&mut self, wheel_dy: f64, modifier: bool, limits: &ZoomConfig) -> bool {
        let next = zoom(self.zoom, wheel_dy, modifier, limits);
        let changed = (next - self.zoom).abs() > f64::EPSILON;
        self.zoom = next;
        changed
    }

    /// Change zoom by a fixed step (zoom buttons). Returns `true` if it changed.
    pub fn step_zoom(&mut self, step: f64, limits: &ZoomConfig) -> bool {
        let next = limits.clamp(self.zoom + step);
        let changed = (next - self.zoom).abs() > f64::EPSILON;
        self.zoom = next;
        changed
    }

    /// Restore zero offset and the given zoom, keeping the pan mode.
    pub fn reset(&mut self, default_zoom: f64) {
        *self = Self::new(default_zoom, self.mode);
    }

    /// Screen-space phase of a background grid with `spacing` pixel cells.
    ///
    /// The grid scrolls with the plane; only the offset modulo one cell matters.
    #[must_use]
    pub fn grid_phase(&self, spacing: f64) -> Point {
        let shift = match self.mode {
            PanMode::Screen => self.offset(),
            PanMode::World => Point::new(self.pan_x * self.zoom, self.pan_y * self.zoom),
        };
        Point::new(shift.x.rem_euclid(spacing), shift.y.rem_euclid(spacing))
    }
}
