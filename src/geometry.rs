//! Geometric primitives in projected map space.
//!
//! All coordinates are `f64` in the projected plane (e.g. Web Mercator
//! meters). The y axis increases upward.

/// A 2D point in projected coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point2 {
    /// Origin point (0, 0).
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate the distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// An axis-aligned rectangle `(minx, miny, maxx, maxy)` in projected coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Minimum x.
    pub minx: f64,
    /// Minimum y.
    pub miny: f64,
    /// Maximum x.
    pub maxx: f64,
    /// Maximum y.
    pub maxy: f64,
}

impl Bounds {
    /// Create bounds from its four edges.
    #[must_use]
    pub const fn new(minx: f64, miny: f64, maxx: f64, maxy: f64) -> Self {
        Self { minx, miny, maxx, maxy }
    }

    /// Smallest bounds enclosing all points, or `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point2>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::new(first.x, first.y, first.x, first.y);
        for p in iter {
            bounds.include(p);
        }
        Some(bounds)
    }

    /// Grow the bounds to include `p`.
    pub fn include(&mut self, p: Point2) {
        self.minx = self.minx.min(p.x);
        self.miny = self.miny.min(p.y);
        self.maxx = self.maxx.max(p.x);
        self.maxy = self.maxy.max(p.y);
    }

    /// Smallest bounds enclosing both `self` and `other`.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self::new(
            self.minx.min(other.minx),
            self.miny.min(other.miny),
            self.maxx.max(other.maxx),
            self.maxy.max(other.maxy),
        )
    }

    /// Width along x.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.maxx - self.minx
    }

    /// Height along y.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.maxy - self.miny
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point2 {
        Point2::new((self.minx + self.maxx) / 2.0, (self.miny + self.maxy) / 2.0)
    }

    /// Check if a point is inside the rectangle (edges included).
    #[must_use]
    pub fn contains(&self, p: Point2) -> bool {
        p.x >= self.minx && p.x <= self.maxx && p.y >= self.miny && p.y <= self.maxy
    }

    /// Check if two rectangles overlap (touching edges count).
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.minx <= other.maxx
            && self.maxx >= other.minx
            && self.miny <= other.maxy
            && self.maxy >= other.miny
    }
}

/// An ordered sequence of vertices with a cached bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    points: Vec<Point2>,
    bounds: Option<Bounds>,
}

impl Polyline {
    /// Create a polyline, computing its bounding box once.
    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        let bounds = Bounds::from_points(points.iter().copied());
        Self { points, bounds }
    }

    /// Vertices in order.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Bounding box, `None` when the polyline has no vertices.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the polyline has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the bounding box overlaps `bounds`.
    #[must_use]
    pub fn intersects(&self, bounds: &Bounds) -> bool {
        self.bounds.is_some_and(|b| b.intersects(bounds))
    }
}

impl FromIterator<(f64, f64)> for Polyline {
    fn from_iter<T: IntoIterator<Item = (f64, f64)>>(iter: T) -> Self {
        Self::new(iter.into_iter().map(Point2::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let p1 = Point2::new(0.0, 0.0);
        let p2 = Point2::new(3.0, 4.0);
        assert!((p1.distance(p2) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_bounds_from_points() {
        let b = Bounds::from_points([
            Point2::new(1.0, -2.0),
            Point2::new(-3.0, 4.0),
            Point2::new(0.5, 0.5),
        ])
        .unwrap();
        assert_eq!(b, Bounds::new(-3.0, -2.0, 1.0, 4.0));
        assert!(Bounds::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_bounds_intersects_touching_edges() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(10.0, 5.0, 20.0, 6.0);
        let c = Bounds::new(10.1, 5.0, 20.0, 6.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_bounds_contains() {
        let b = Bounds::new(-1.0, -1.0, 1.0, 1.0);
        assert!(b.contains(Point2::new(1.0, -1.0)));
        assert!(!b.contains(Point2::new(1.5, 0.0)));
    }

    #[test]
    fn test_polyline_caches_bounds() {
        let line: Polyline = [(0.0, 0.0), (5.0, -5.0), (2.0, 8.0)].into_iter().collect();
        assert_eq!(line.len(), 3);
        assert_eq!(line.bounds(), Some(Bounds::new(0.0, -5.0, 5.0, 8.0)));
        assert!(line.intersects(&Bounds::new(4.0, 7.0, 6.0, 9.0)));
    }

    #[test]
    fn test_empty_polyline_never_intersects() {
        let line = Polyline::new(Vec::new());
        assert!(line.is_empty());
        assert!(!line.intersects(&Bounds::new(-1e9, -1e9, 1e9, 1e9)));
    }
}
