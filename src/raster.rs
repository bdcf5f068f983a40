//! Braille dot-pattern rasterizer.
//!
//! Each terminal cell is a Unicode braille character (U+2800-28FF) holding a
//! 2×4 grid of dots, so a `cols × rows` text area is a `2·cols × 4·rows`
//! subpixel canvas. Rendering runs in four steps:
//!
//! 1. Compute the visible bounds for the canvas and cull/simplify geometry.
//! 2. Map projected coordinates to subpixels with [`PixelTransform`]
//!    (`px = (x - minx) / scale`, `py = (maxy - y) / scale`; y is inverted).
//! 3. Walk each segment with Bresenham's algorithm, setting one dot per
//!    visited subpixel in a fresh [`BrailleGrid`]. Walks that start off the
//!    canvas jump straight to their first on-canvas step, so the cost is
//!    bounded by the canvas while the dots stay those of the full walk.
//! 4. Serialize the grid row-major, blank cells as spaces.
//!
//! Rendering is a pure function of its inputs: no state survives a call.
//!
//! # Dot layout
//!
//! ```text
//! ,---------,
//! | 0x01 0x08 |
//! | 0x02 0x10 |
//! | 0x04 0x20 |
//! | 0x40 0x80 |
//! `---------'
//! ```

use std::fmt;
use std::iter::Take;

use crate::cull::{cull_and_simplify, SimplifyOptions};
use crate::geometry::{Bounds, Point2};
use crate::navigation::{SUBPIXELS_X, SUBPIXELS_Y};
use crate::overlay::MapPoint;
use crate::source::GeometrySource;
use crate::viewport::Viewport;

/// Code point of the empty braille pattern.
pub const BRAILLE_BASE: u32 = 0x2800;

/// Bit for the dot at `DOT_BITS[dx][dy]` within a cell (`dx` in 0..2, `dy` in 0..4).
pub const DOT_BITS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

/// A `cols × rows` grid of braille cells, each an 8-bit dot mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrailleGrid {
    cols: usize,
    rows: usize,
    cells: Vec<u8>,
}

impl BrailleGrid {
    /// Create an empty grid.
    #[must_use]
    pub fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows, cells: vec![0; cols * rows] }
    }

    /// Width in character cells.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Height in character cells.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Canvas width in subpixels.
    #[must_use]
    pub fn width_px(&self) -> i64 {
        (self.cols * SUBPIXELS_X as usize) as i64
    }

    /// Canvas height in subpixels.
    #[must_use]
    pub fn height_px(&self) -> i64 {
        (self.rows * SUBPIXELS_Y as usize) as i64
    }

    /// Dot mask of a cell, `None` outside the grid.
    #[must_use]
    pub fn cell(&self, col: usize, row: usize) -> Option<u8> {
        if col < self.cols && row < self.rows {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Whether a subpixel lies on the canvas.
    #[must_use]
    pub fn in_canvas(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width_px() && y < self.height_px()
    }

    /// Set the dot for subpixel `(x, y)`. Returns `false` (and does nothing)
    /// when the subpixel is off the canvas.
    pub fn set_subpixel(&mut self, x: i64, y: i64) -> bool {
        if !self.in_canvas(x, y) {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        let col = x / SUBPIXELS_X as usize;
        let row = y / SUBPIXELS_Y as usize;
        let bit = DOT_BITS[x % SUBPIXELS_X as usize][y % SUBPIXELS_Y as usize];
        self.cells[row * self.cols + col] |= bit;
        true
    }

    /// Draw the Bresenham line from `(x0, y0)` to `(x1, y1)` inclusive,
    /// skipping off-canvas subpixels.
    ///
    /// Coordinates are clamped to ±2^53.
    pub fn draw_line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64) {
        let [x0, y0, x1, y1] = [x0, y0, x1, y1].map(|v| v.clamp(-SUBPIXEL_LIMIT, SUBPIXEL_LIMIT));
        for (x, y) in BresenhamLine::on_canvas(x0, y0, x1, y1, self.width_px(), self.height_px()) {
            self.set_subpixel(x, y);
        }
    }

    /// Draw a segment given in subpixel space.
    ///
    /// Non-finite endpoints skip the segment.
    pub fn draw_segment(&mut self, a: Point2, b: Point2) {
        if !a.is_finite() || !b.is_finite() {
            return;
        }
        self.draw_line(to_subpixel(a.x), to_subpixel(a.y), to_subpixel(b.x), to_subpixel(b.y));
    }

    /// Draw every consecutive vertex pair of a subpixel-space polyline.
    pub fn draw_polyline(&mut self, points: &[Point2]) {
        for pair in points.windows(2) {
            self.draw_segment(pair[0], pair[1]);
        }
    }

    /// Number of cells with at least one dot.
    #[must_use]
    pub fn filled_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }
}

/// Largest subpixel magnitude a walk accepts; `f64` has no fractional
/// precision beyond it, and step arithmetic stays inside `i128`.
const SUBPIXEL_LIMIT: i64 = 1 << 53;

/// Subpixel containing `v`.
///
/// Floor, not truncation: `-0.5` lies in subpixel `-1` (off the canvas), so
/// negative coordinates land in the subpixel that contains them.
fn to_subpixel(v: f64) -> i64 {
    v.floor().clamp(-(SUBPIXEL_LIMIT as f64), SUBPIXEL_LIMIT as f64) as i64
}

/// Character for a dot mask: the braille pattern, or a space when empty.
#[must_use]
pub fn cell_char(mask: u8) -> char {
    if mask == 0 {
        ' '
    } else {
        char::from_u32(BRAILLE_BASE + u32::from(mask)).unwrap_or(' ')
    }
}

impl fmt::Display for BrailleGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.cols.max(1)).enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            for &mask in row {
                write!(f, "{}", cell_char(mask))?;
            }
        }
        Ok(())
    }
}

/// Integer Bresenham walk from one subpixel to another, endpoints included.
///
/// Covers all eight octants; yields exactly `max(|dx|, |dy|) + 1` points.
#[derive(Debug, Clone)]
pub struct BresenhamLine {
    x: i64,
    y: i64,
    x1: i64,
    y1: i64,
    dx: i64,
    dy: i64,
    sx: i64,
    sy: i64,
    err: i64,
    done: bool,
}

impl BresenhamLine {
    /// Start a walk from `(x0, y0)` to `(x1, y1)`.
    #[must_use]
    pub fn new(x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        Self {
            x: x0,
            y: y0,
            x1,
            y1,
            dx,
            dy,
            sx: if x0 < x1 { 1 } else { -1 },
            sy: if y0 < y1 { 1 } else { -1 },
            err: dx + dy,
            done: false,
        }
    }

    /// The part of the walk from `(x0, y0)` to `(x1, y1)` that lies on a
    /// `width × height` canvas.
    ///
    /// Yields exactly the on-canvas points of [`BresenhamLine::new`], in
    /// order, but jumps to the first of them instead of stepping there, so
    /// the cost is bounded by the canvas size. Both axes move monotonically,
    /// so the on-canvas steps form one contiguous run. Coordinates must be
    /// within ±2^53.
    #[must_use]
    pub fn on_canvas(x0: i64, y0: i64, x1: i64, y1: i64, width: i64, height: i64) -> Take<Self> {
        let mut line = Self::new(x0, y0, x1, y1);
        match line.canvas_steps(width, height) {
            Some((first, last)) => {
                line.jump_to(first);
                line.take((last - first + 1) as usize)
            }
            None => line.take(0),
        }
    }

    /// Number of steps `(nx, ny)` taken along each axis after `i` iterations.
    ///
    /// The major axis steps every iteration; the minor axis has taken
    /// `floor((2·minor·i + major) / (2·major))` steps.
    fn steps_at(&self, i: i64) -> (i64, i64) {
        let a = i128::from(self.dx);
        let b = i128::from(-self.dy);
        let i = i128::from(i);
        if a >= b {
            let ny = if a == 0 { 0 } else { (2 * b * i + a) / (2 * a) };
            (i as i64, ny as i64)
        } else {
            (((2 * a * i + b) / (2 * b)) as i64, i as i64)
        }
    }

    /// Move a fresh walk forward to iteration `i`.
    fn jump_to(&mut self, i: i64) {
        let (nx, ny) = self.steps_at(i);
        self.x += self.sx * nx;
        self.y += self.sy * ny;
        // err = dx·(1 + ny) + dy·(1 + nx) holds after every iteration.
        let err =
            i128::from(self.dx) * i128::from(1 + ny) + i128::from(self.dy) * i128::from(1 + nx);
        self.err = err as i64;
    }

    /// First and last iteration of a fresh walk that land on the canvas.
    fn canvas_steps(&self, width: i64, height: i64) -> Option<(i64, i64)> {
        if width <= 0 || height <= 0 {
            return None;
        }
        let n = self.dx.max(-self.dy);
        let (x0, y0) = (self.x, self.y);
        let (xs, xe) = axis_range(n, self.sx, width - 1, |i| x0 + self.sx * self.steps_at(i).0);
        let (ys, ye) = axis_range(n, self.sy, height - 1, |i| y0 + self.sy * self.steps_at(i).1);
        let (first, last) = (xs.max(ys), xe.min(ye));
        (first <= last).then_some((first, last))
    }
}

/// Iterations in `0..=n` where a coordinate moving in direction `sign` stays in `0..=max`.
/// Empty when `first > last`.
fn axis_range(n: i64, sign: i64, max: i64, at: impl Fn(i64) -> i64) -> (i64, i64) {
    let first = partition_point(n, |i| if sign > 0 { at(i) >= 0 } else { at(i) <= max });
    let past = partition_point(n, |i| if sign > 0 { at(i) > max } else { at(i) < 0 });
    (first, past - 1)
}

/// Smallest `i` in `0..=n + 1` where the monotone `pred` turns true.
fn partition_point(n: i64, pred: impl Fn(i64) -> bool) -> i64 {
    let (mut lo, mut hi) = (0, n + 1);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(mid) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo
}

impl Iterator for BresenhamLine {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = (self.x, self.y);
        if self.x == self.x1 && self.y == self.y1 {
            self.done = true;
            return Some(current);
        }
        let e2 = 2 * self.err;
        if e2 >= self.dy {
            self.err += self.dy;
            self.x += self.sx;
        }
        if e2 <= self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }
        Some(current)
    }
}

/// Affine map from projected coordinates to canvas subpixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelTransform {
    minx: f64,
    maxy: f64,
    scale: f64,
}

impl PixelTransform {
    /// Transform for a canvas whose projected bounds are `bounds` at `scale`.
    #[must_use]
    pub fn new(bounds: &Bounds, scale: f64) -> Self {
        Self { minx: bounds.minx, maxy: bounds.maxy, scale }
    }

    /// Transform for `viewport` on a canvas of `width_px × height_px` subpixels.
    #[must_use]
    pub fn for_viewport(viewport: &Viewport, width_px: f64, height_px: f64) -> Self {
        Self::new(&viewport.get_bounds(width_px, height_px), viewport.scale())
    }

    /// Projected point to subpixel coordinates (y grows downward).
    #[must_use]
    pub fn apply(&self, p: Point2) -> Point2 {
        Point2::new((p.x - self.minx) / self.scale, (self.maxy - p.y) / self.scale)
    }
}

/// Settings that shape a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderOptions {
    /// Zoom-dependent simplification applied after culling.
    pub simplify: SimplifyOptions,
}

/// Render geometry visible through `viewport` into a `width_chars × height_chars`
/// braille string, rows joined by `\n`.
///
/// Non-positive dimensions and missing geometry both yield an empty string.
/// `points` is the visible overlay selection; glyph placement is not part of
/// the line layer, so it does not change the output.
#[must_use]
pub fn render(
    viewport: &Viewport,
    geometry: Option<&dyn GeometrySource>,
    width_chars: i32,
    height_chars: i32,
    points: &[&MapPoint],
    options: &RenderOptions,
) -> String {
    if width_chars <= 0 || height_chars <= 0 {
        return String::new();
    }
    let Some(geometry) = geometry else {
        return String::new();
    };

    let mut grid = BrailleGrid::new(width_chars as usize, height_chars as usize);
    let (width_px, height_px) = (grid.width_px() as f64, grid.height_px() as f64);
    let bounds = viewport.get_bounds(width_px, height_px);
    let transform = PixelTransform::new(&bounds, viewport.scale());

    let lines = cull_and_simplify(geometry, &bounds, viewport.scale(), &options.simplify);
    let mut vertices = 0usize;
    let mut projected: Vec<Point2> = Vec::new();
    for line in &lines {
        projected.clear();
        projected.extend(line.iter().map(|&p| transform.apply(p)));
        vertices += projected.len();
        grid.draw_polyline(&projected);
    }

    tracing::debug!(
        cols = width_chars,
        rows = height_chars,
        lines = lines.len(),
        vertices,
        points = points.len(),
        filled = grid.filled_cells(),
        "rendered frame"
    );
    grid.to_string()
}
