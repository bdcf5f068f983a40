//! Navigation controller: turns user intents into viewport mutations.
//!
//! Pan steps are a fraction of the visible span, so panning covers the same
//! share of the screen at every zoom level.

use crate::error::Result;
use crate::viewport::Viewport;

/// Horizontal braille subpixels per character cell.
pub const SUBPIXELS_X: u32 = 2;

/// Vertical braille subpixels per character cell.
pub const SUBPIXELS_Y: u32 = 4;

/// Default pan step as a fraction of the visible span.
pub const DEFAULT_PAN_STEP: f64 = 0.2;

/// Default zoom-in factor; zoom-out uses its reciprocal.
pub const DEFAULT_ZOOM_FACTOR: f64 = 0.8;

/// Pan direction on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward smaller x.
    Left,
    /// Toward larger x.
    Right,
    /// Toward larger y (screen up).
    Up,
    /// Toward smaller y (screen down).
    Down,
}

impl Direction {
    /// Unit step `(sx, sy)` in projected axes.
    #[must_use]
    pub fn unit(self) -> (f64, f64) {
        match self {
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
            Self::Up => (0.0, 1.0),
            Self::Down => (0.0, -1.0),
        }
    }
}

/// Size of the map display in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplaySize {
    /// Width in character cells.
    pub cols: u32,
    /// Height in character cells.
    pub rows: u32,
}

impl DisplaySize {
    /// Create a display size.
    #[must_use]
    pub const fn new(cols: u32, rows: u32) -> Self {
        Self { cols, rows }
    }

    /// Width in subpixels.
    #[must_use]
    pub fn width_px(&self) -> f64 {
        f64::from(self.cols * SUBPIXELS_X)
    }

    /// Height in subpixels.
    #[must_use]
    pub fn height_px(&self) -> f64 {
        f64::from(self.rows * SUBPIXELS_Y)
    }
}

/// A navigation intent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Pan one step in a direction.
    Pan(Direction),
    /// Zoom in by the configured factor.
    ZoomIn,
    /// Zoom out by the reciprocal of the configured factor.
    ZoomOut,
    /// Restore the home view.
    Reset,
}

/// Applies navigation commands to a [`Viewport`].
#[derive(Debug, Clone)]
pub struct Navigator {
    pan_step: f64,
    zoom_factor: f64,
    home: Viewport,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(DEFAULT_PAN_STEP, DEFAULT_ZOOM_FACTOR)
    }
}

impl Navigator {
    /// Create a navigator with a pan step fraction and a zoom-in factor.
    ///
    /// Non-positive or non-finite values fall back to the defaults. A zoom
    /// factor above 1 is inverted so that "zoom in" always zooms in.
    #[must_use]
    pub fn new(pan_step: f64, zoom_factor: f64) -> Self {
        let pan_step =
            if pan_step.is_finite() && pan_step > 0.0 { pan_step } else { DEFAULT_PAN_STEP };
        let zoom_factor = match zoom_factor {
            f if f.is_finite() && f > 0.0 && f < 1.0 => f,
            f if f.is_finite() && f > 1.0 => 1.0 / f,
            _ => DEFAULT_ZOOM_FACTOR,
        };
        Self { pan_step, zoom_factor, home: Viewport::default() }
    }

    /// Set the view restored by [`Command::Reset`].
    #[must_use]
    pub fn with_home(mut self, home: Viewport) -> Self {
        self.home = home;
        self
    }

    /// Pan step as a fraction of the visible span.
    #[must_use]
    pub fn pan_step(&self) -> f64 {
        self.pan_step
    }

    /// Zoom-in factor (< 1).
    #[must_use]
    pub fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    /// Pan by `fraction` of the span visible along the direction's axis.
    pub fn pan_by_fraction(
        viewport: &mut Viewport,
        direction: Direction,
        fraction: f64,
        display: DisplaySize,
    ) {
        let (ux, uy) = direction.unit();
        let span_x = display.width_px() * viewport.scale();
        let span_y = display.height_px() * viewport.scale();
        viewport.pan(ux * fraction * span_x, uy * fraction * span_y);
    }

    /// Zoom in by the configured factor.
    pub fn zoom_in(&self, viewport: &mut Viewport) -> Result<()> {
        viewport.zoom(self.zoom_factor)
    }

    /// Zoom out by the reciprocal of the configured factor.
    pub fn zoom_out(&self, viewport: &mut Viewport) -> Result<()> {
        viewport.zoom(1.0 / self.zoom_factor)
    }

    /// Restore the home view.
    pub fn reset(&self, viewport: &mut Viewport) {
        *viewport = self.home;
    }

    /// Apply a command for a display of the given size.
    pub fn apply(
        &self,
        command: Command,
        viewport: &mut Viewport,
        display: DisplaySize,
    ) -> Result<()> {
        tracing::trace!(?command, "navigate");
        match command {
            Command::Pan(direction) => {
                Self::pan_by_fraction(viewport, direction, self.pan_step, display);
                Ok(())
            }
            Command::ZoomIn => self.zoom_in(viewport),
            Command::ZoomOut => self.zoom_out(viewport),
            Command::Reset => {
                self.reset(viewport);
                Ok(())
            }
        }
    }
}
