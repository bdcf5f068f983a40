//! Viewport: the navigable window over projected map space.
//!
//! A viewport is a center point plus a scale expressed in ground units per
//! screen pixel. Rendering works in braille subpixels, so "pixel" here means
//! one dot of a 2×4 braille cell.

use crate::error::{Error, Result};
use crate::geometry::Bounds;

/// Default scale used by [`Viewport::reset_default`] (ground units per pixel).
pub const DEFAULT_SCALE: f64 = 1_000_000.0;

/// Smallest scale a zoom can reach.
pub const MIN_SCALE: f64 = 1e-6;

/// Largest scale a zoom can reach.
pub const MAX_SCALE: f64 = 1e12;

/// Current map view: center in projected coordinates and ground units per pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// X coordinate of the viewport center.
    pub center_x: f64,
    /// Y coordinate of the viewport center.
    pub center_y: f64,
    scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { center_x: 0.0, center_y: 0.0, scale: DEFAULT_SCALE }
    }
}

impl Viewport {
    /// Create a viewport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScale`] if `scale` is not strictly positive and finite.
    pub fn new(center_x: f64, center_y: f64, scale: f64) -> Result<Self> {
        let scale = validate_scale(scale)?;
        Ok(Self { center_x, center_y, scale })
    }

    /// Ground units per pixel.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Rectangle covered by a display of `width_px × height_px` pixels,
    /// centered on the viewport center.
    #[must_use]
    pub fn get_bounds(&self, width_px: f64, height_px: f64) -> Bounds {
        let half_width = width_px * self.scale / 2.0;
        let half_height = height_px * self.scale / 2.0;
        Bounds::new(
            self.center_x - half_width,
            self.center_y - half_height,
            self.center_x + half_width,
            self.center_y + half_height,
        )
    }

    /// Translate the center by projected-unit deltas. No clamping.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.center_x += dx;
        self.center_y += dy;
    }

    /// Multiply the scale by `factor` (< 1 zooms in, > 1 zooms out).
    ///
    /// The result is clamped into [`MIN_SCALE`, `MAX_SCALE`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidZoomFactor`] if `factor` is not strictly
    /// positive and finite; the scale is left unchanged.
    pub fn zoom(&mut self, factor: f64) -> Result<()> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(Error::InvalidZoomFactor(factor));
        }
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        Ok(())
    }

    /// Move to `(center_x, center_y)` at `scale`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScale`] if `scale` is not strictly positive and
    /// finite; the viewport is left unchanged.
    pub fn reset(&mut self, center_x: f64, center_y: f64, scale: f64) -> Result<()> {
        self.scale = validate_scale(scale)?;
        self.center_x = center_x;
        self.center_y = center_y;
        Ok(())
    }

    /// Restore the origin and [`DEFAULT_SCALE`].
    pub fn reset_default(&mut self) {
        *self = Self::default();
    }

    /// Center on `bounds` and pick the scale that fits it inside a display of
    /// `width_px × height_px`, enlarged by `padding` (1.05 leaves a 5% margin).
    ///
    /// Returns `false` and leaves the viewport untouched when the bounds or
    /// the display are degenerate.
    pub fn fit_bounds(
        &mut self,
        bounds: &Bounds,
        width_px: f64,
        height_px: f64,
        padding: f64,
    ) -> bool {
        if width_px <= 0.0 || height_px <= 0.0 || padding <= 0.0 {
            return false;
        }
        let scale_x = bounds.width() * padding / width_px;
        let scale_y = bounds.height() * padding / height_px;
        // A zero-height line still fits by width alone.
        let scale = match (scale_x > 0.0, scale_y > 0.0) {
            (true, true) => scale_x.max(scale_y),
            (true, false) => scale_x,
            (false, true) => scale_y,
            (false, false) => return false,
        };
        if !scale.is_finite() {
            return false;
        }
        let center = bounds.center();
        self.center_x = center.x;
        self.center_y = center.y;
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        true
    }
}

fn validate_scale(scale: f64) -> Result<f64> {
    if scale.is_finite() && scale > 0.0 {
        Ok(scale.clamp(MIN_SCALE, MAX_SCALE))
    } else {
        Err(Error::InvalidScale(scale))
    }
}
