//! Viewport culling and zoom-dependent line simplification.
//!
//! Culling keeps the polylines whose bounding box touches the visible
//! rectangle. Each survivor is then reduced with Douglas-Peucker at a
//! tolerance proportional to the current scale, so a zoomed-out world map
//! draws a few thousand vertices instead of millions.
//!
//! # References
//!
//! Douglas, D. H., & Peucker, T. K. (1973). "Algorithms for the reduction of
//! the number of points required to represent a digitized line or its
//! caricature." *Cartographica*, 10(2), 112-122.

use serde::{Deserialize, Serialize};

use crate::geometry::{Bounds, Point2, Polyline};
use crate::source::GeometrySource;

/// Default tolerance per unit of scale (1.5 subpixels).
pub const DEFAULT_SIMPLIFY_FACTOR: f64 = 1.5;

/// Default tolerance floor in projected units.
pub const DEFAULT_MIN_TOLERANCE: f64 = 500.0;

/// How aggressively culled lines are simplified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimplifyOptions {
    /// Tolerance per unit of scale (`K`).
    #[serde(default = "default_simplify_factor")]
    pub factor: f64,
    /// Lower bound on the tolerance, in projected units.
    #[serde(default = "default_min_tolerance")]
    pub min_tolerance: f64,
}

fn default_simplify_factor() -> f64 {
    DEFAULT_SIMPLIFY_FACTOR
}
fn default_min_tolerance() -> f64 {
    DEFAULT_MIN_TOLERANCE
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self { factor: DEFAULT_SIMPLIFY_FACTOR, min_tolerance: DEFAULT_MIN_TOLERANCE }
    }
}

impl SimplifyOptions {
    /// Options that keep every vertex.
    pub const DISABLED: Self = Self { factor: 0.0, min_tolerance: 0.0 };

    /// `max(scale · factor, min_tolerance)`; zero or less disables simplification.
    #[must_use]
    pub fn tolerance(&self, scale: f64) -> f64 {
        (scale * self.factor).max(self.min_tolerance)
    }
}

/// Polylines whose bounding box intersects `bounds`, in load order.
#[must_use]
pub fn cull<'a>(source: &'a dyn GeometrySource, bounds: &Bounds) -> Vec<&'a Polyline> {
    source.query(bounds)
}

/// Cull against `bounds`, then simplify each survivor at the tolerance for `scale`.
#[must_use]
pub fn cull_and_simplify(
    source: &dyn GeometrySource,
    bounds: &Bounds,
    scale: f64,
    options: &SimplifyOptions,
) -> Vec<Vec<Point2>> {
    let tolerance = options.tolerance(scale);
    cull(source, bounds)
        .into_iter()
        .filter(|line| line.len() >= 2)
        .map(|line| {
            if tolerance > 0.0 {
                douglas_peucker(line.points(), tolerance)
            } else {
                line.points().to_vec()
            }
        })
        .collect()
}

/// Simplify a polyline using the Douglas-Peucker algorithm.
///
/// Keeps the first and last vertex and every vertex whose removal would move
/// the line by more than `epsilon`. The result is a subsequence of the input,
/// so no new vertices or chords are introduced.
///
/// Iterative rather than recursive so very long coastlines cannot exhaust the
/// stack.
#[must_use]
pub fn douglas_peucker(points: &[Point2], epsilon: f64) -> Vec<Point2> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;

    let mut stack = vec![(0, points.len() - 1)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let (max_distance, max_index) = find_max_distance(&points[start..=end]);
        if max_distance > epsilon {
            let split = start + max_index;
            keep[split] = true;
            stack.push((start, split));
            stack.push((split, end));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

/// Find the point with maximum distance from the segment between first and last points.
fn find_max_distance(points: &[Point2]) -> (f64, usize) {
    let first = points[0];
    let last = points[points.len() - 1];

    let mut max_distance = 0.0;
    let mut max_index = 0;

    for (i, point) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let distance = perpendicular_distance(*point, first, last);
        if distance > max_distance {
            max_distance = distance;
            max_index = i;
        }
    }

    (max_distance, max_index)
}

/// Distance from a point to the infinite line through `line_start` and `line_end`.
///
/// Closed rings have coincident endpoints; there the plain point distance is used.
fn perpendicular_distance(point: Point2, line_start: Point2, line_end: Point2) -> f64 {
    let dx = line_end.x - line_start.x;
    let dy = line_end.y - line_start.y;

    let line_length_sq = dx * dx + dy * dy;
    if line_length_sq <= f64::EPSILON {
        return point.distance(line_start);
    }

    let numerator = ((dy * point.x) - (dx * point.y) + (line_end.x * line_start.y)
        - (line_end.y * line_start.x))
        .abs();
    numerator / line_length_sq.sqrt()
}
