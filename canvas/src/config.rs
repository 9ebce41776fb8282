//! Per-canvas configuration.
//!
//! Two live variants exist: the multi-item board, where images accumulate side
//! by side and pan deltas are applied in world units, and the single-image
//! viewer, where a new image replaces the current one and pan deltas are
//! applied in screen pixels. A canvas instance picks one [`PanMode`] for its
//! whole lifetime; mixing modes would make the stored offset meaningless.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::camera::{PanMode, Point};
use crate::consts::{
    BOARD_ZOOM_MAX, BOARD_ZOOM_MIN, DEFAULT_ITEM_HEIGHT, DEFAULT_ITEM_WIDTH, FIRST_ITEM_X, FIRST_ITEM_Y, ITEM_GAP,
    SINGLE_DEFAULT_ZOOM, SINGLE_ZOOM_MAX, SINGLE_ZOOM_MIN, WHEEL_ZOOM_SENSITIVITY, ZOOM_BUTTON_STEP,
};

/// Which canvas behaviour is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanvasVariant {
    /// Many images side by side on an infinite board.
    #[default]
    Board,
    /// One image at a time; a new image replaces the current one.
    SingleImage,
}

/// Zoom bounds and rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    /// Smallest allowed zoom factor.
    pub min: f64,
    /// Largest allowed zoom factor.
    pub max: f64,
    /// Zoom change per wheel pixel.
    pub sensitivity: f64,
    /// Zoom change per button press.
    pub step: f64,
}

impl ZoomConfig {
    /// Clamp `zoom` into `[min, max]`.
    ///
    /// Never panics: inverted bounds are treated as swapped and a NaN zoom
    /// lands on the lower bound. Use [`Self::validate`] to reject such configs.
    #[must_use]
    pub fn clamp(&self, zoom: f64) -> f64 {
        let (lo, hi) = if self.min <= self.max { (self.min, self.max) } else { (self.max, self.min) };
        if zoom.is_nan() {
            return lo;
        }
        zoom.max(lo).min(hi)
    }

    /// Check that the bounds are finite, positive and ordered and that both
    /// rates are finite.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.min, self.max);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && max > 0.0) {
            return Err(ConfigError::ZoomBounds { min, max });
        }
        if min > max {
            return Err(ConfigError::InvertedZoomBounds { min, max });
        }
        if !self.sensitivity.is_finite() {
            return Err(ConfigError::ZoomRate { name: "sensitivity", value: self.sensitivity });
        }
        if !self.step.is_finite() {
            return Err(ConfigError::ZoomRate { name: "step", value: self.step });
        }
        Ok(())
    }
}

/// A [`CanvasConfig`] that cannot drive a canvas.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("zoom bounds must be finite and positive (min {min}, max {max})")]
    ZoomBounds { min: f64, max: f64 },

    #[error("zoom min {min} exceeds max {max}")]
    InvertedZoomBounds { min: f64, max: f64 },

    #[error("zoom {name} must be finite, got {value}")]
    ZoomRate { name: &'static str, value: f64 },

    #[error("default zoom {zoom} outside [{min}, {max}]")]
    DefaultZoomOutOfRange { zoom: f64, min: f64, max: f64 },
}

/// How a newly appended item is sized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemSizing {
    /// Ignore the natural size and use a fixed placeholder extent.
    Fixed { width: f64, height: f64 },
    /// Use the natural pixel size reported by ingestion.
    Natural,
    /// Scale to a fixed width, preserving the natural aspect ratio.
    FitWidth { width: f64 },
}

impl Default for ItemSizing {
    fn default() -> Self {
        Self::Fixed { width: DEFAULT_ITEM_WIDTH, height: DEFAULT_ITEM_HEIGHT }
    }
}

impl ItemSizing {
    /// Resolve the world-space extent for an image with the given natural size.
    ///
    /// Falls back to the fixed placeholder whenever the natural size is
    /// unknown (zero or not finite).
    #[must_use]
    pub fn resolve(self, natural_width: f64, natural_height: f64) -> (f64, f64) {
        let known = natural_width.is_finite() && natural_height.is_finite() && natural_width > 0.0 && natural_height > 0.0;
        match self {
            Self::Fixed { width, height } => (width, height),
            Self::Natural if known => (natural_width, natural_height),
            Self::FitWidth { width } if known => (width, width * natural_height / natural_width),
            Self::Natural | Self::FitWidth { .. } => (DEFAULT_ITEM_WIDTH, DEFAULT_ITEM_HEIGHT),
        }
    }
}

/// Auto-placement rules for appended items.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// World position of the first item.
    pub origin: Point,
    /// Horizontal gap between an item and the previously appended one.
    pub gap: f64,
    /// Item extent policy.
    pub sizing: ItemSizing,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { origin: Point::new(FIRST_ITEM_X, FIRST_ITEM_Y), gap: ITEM_GAP, sizing: ItemSizing::default() }
    }
}

/// Full configuration of one canvas instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub variant: CanvasVariant,
    pub zoom: ZoomConfig,
    /// Zoom at mount and after a view reset.
    pub default_zoom: f64,
    pub pan_mode: PanMode,
    pub layout: LayoutConfig,
    /// Promote the clicked item's stack order when it gains focus.
    pub bring_to_front_on_select: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self::board()
    }
}

impl CanvasConfig {
    /// Multi-item board: zoom 0.2–4, world-space panning.
    #[must_use]
    pub fn board() -> Self {
        Self {
            variant: CanvasVariant::Board,
            zoom: ZoomConfig {
                min: BOARD_ZOOM_MIN,
                max: BOARD_ZOOM_MAX,
                sensitivity: WHEEL_ZOOM_SENSITIVITY,
                step: ZOOM_BUTTON_STEP,
            },
            default_zoom: 1.0,
            pan_mode: PanMode::World,
            layout: LayoutConfig::default(),
            bring_to_front_on_select: false,
        }
    }

    /// Single-image viewer: zoom 0.1–5 starting at 0.85, screen-space panning.
    #[must_use]
    pub fn single_image() -> Self {
        Self {
            variant: CanvasVariant::SingleImage,
            zoom: ZoomConfig {
                min: SINGLE_ZOOM_MIN,
                max: SINGLE_ZOOM_MAX,
                sensitivity: WHEEL_ZOOM_SENSITIVITY,
                step: ZOOM_BUTTON_STEP,
            },
            default_zoom: SINGLE_DEFAULT_ZOOM,
            pan_mode: PanMode::Screen,
            layout: LayoutConfig::default(),
            bring_to_front_on_select: false,
        }
    }

    /// Zoom used at mount and after a view reset, clamped into the bounds.
    #[must_use]
    pub fn initial_zoom(&self) -> f64 {
        self.zoom.clamp(self.default_zoom)
    }

    /// Reject configurations whose zoom settings are unusable.
    ///
    /// The engine tolerates invalid values by clamping; hosts that load
    /// configs from outside should call this first.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.zoom.validate()?;
        let zoom = self.default_zoom;
        if !(self.zoom.min..=self.zoom.max).contains(&zoom) {
            return Err(ConfigError::DefaultZoomOutOfRange { zoom, min: self.zoom.min, max: self.zoom.max });
        }
        Ok(())
    }

    /// Preset for `variant`.
    #[must_use]
    pub fn for_variant(variant: CanvasVariant) -> Self {
        match variant {
            CanvasVariant::Board => Self::board(),
            CanvasVariant::SingleImage => Self::single_image(),
        }
    }
}
