//! Shared numeric constants for the canvas crate.

// ── Zoom ────────────────────────────────────────────────────────

/// Lower zoom bound for the multi-item board.
pub const BOARD_ZOOM_MIN: f64 = 0.2;

/// Upper zoom bound for the multi-item board.
pub const BOARD_ZOOM_MAX: f64 = 4.0;

/// Lower zoom bound for the single-image viewer.
pub const SINGLE_ZOOM_MIN: f64 = 0.1;

/// Upper zoom bound for the single-image viewer.
pub const SINGLE_ZOOM_MAX: f64 = 5.0;

/// Initial zoom of the single-image viewer, leaving a margin around the image.
pub const SINGLE_DEFAULT_ZOOM: f64 = 0.85;

/// Zoom change per wheel pixel while the zoom modifier is held.
pub const WHEEL_ZOOM_SENSITIVITY: f64 = 0.001;

/// Zoom change per zoom-in / zoom-out button press.
pub const ZOOM_BUTTON_STEP: f64 = 0.1;

// ── Layout ──────────────────────────────────────────────────────

/// World-space left edge (x) of the first placed item.
pub const FIRST_ITEM_X: f64 = 100.0;

/// World-space top edge (y) of the first placed item.
pub const FIRST_ITEM_Y: f64 = 100.0;

/// Horizontal gap between consecutively appended items, in world units.
pub const ITEM_GAP: f64 = 50.0;

/// Placeholder item width used until natural image sizes are reported.
pub const DEFAULT_ITEM_WIDTH: f64 = 400.0;

/// Placeholder item height used until natural image sizes are reported.
pub const DEFAULT_ITEM_HEIGHT: f64 = 300.0;

// ── Presentation ────────────────────────────────────────────────

/// Spacing of the background dot grid, in screen pixels.
pub const GRID_SPACING_PX: f64 = 24.0;

/// Minimum stroke width of an issue box, in screen pixels.
pub const ISSUE_STROKE_MIN_PX: f64 = 2.0;

/// Issue box stroke width at zoom 1.0 before the minimum is applied.
pub const ISSUE_STROKE_BASE_PX: f64 = 2.5;

/// Upper bound of issue box coordinates (percent of the item extent).
pub const PERCENT_MAX: f64 = 100.0;
