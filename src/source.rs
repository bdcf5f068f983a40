//! Geometry sources: the ordered polyline set a session renders from.
//!
//! [`GeometrySource`] is the one contract the renderer sees. Adapters differ
//! only in how they answer the broad-phase [`GeometrySource::query`]:
//!
//! - [`PolylineList`]: linear scan over every polyline's bounding box.
//! - [`GridIndex`]: uniform grid over the total extent; each cell lists the
//!   polylines whose bounding box overlaps it.
//!
//! Both return the same polylines in the same (load) order, so swapping the
//! adapter never changes rendered output.

use crate::geometry::{Bounds, Polyline};

/// Default number of grid cells along each axis for [`GridIndex`].
pub const DEFAULT_GRID_CELLS: usize = 64;

/// Upper bound on grid cells along each axis; larger requests are clamped.
pub const MAX_GRID_CELLS: usize = 1024;

/// An immutable, ordered collection of polylines with an optional spatial index.
pub trait GeometrySource: std::fmt::Debug {
    /// All polylines in load order.
    fn polylines(&self) -> &[Polyline];

    /// Polylines whose bounding box intersects `bounds`, in load order.
    fn query(&self, bounds: &Bounds) -> Vec<&Polyline> {
        self.polylines().iter().filter(|line| line.intersects(bounds)).collect()
    }

    /// Extent of every vertex, `None` when there is nothing to draw.
    fn total_bounds(&self) -> Option<Bounds> {
        self.polylines()
            .iter()
            .filter_map(Polyline::bounds)
            .reduce(Bounds::union)
    }

    /// Number of polylines.
    fn len(&self) -> usize {
        self.polylines().len()
    }

    /// Whether the source has no polylines.
    fn is_empty(&self) -> bool {
        self.polylines().is_empty()
    }
}

/// Plain list of polylines; queries scan every bounding box.
#[derive(Debug, Clone, Default)]
pub struct PolylineList {
    lines: Vec<Polyline>,
}

impl PolylineList {
    /// Wrap a list of polylines.
    #[must_use]
    pub fn new(lines: Vec<Polyline>) -> Self {
        Self { lines }
    }
}

impl GeometrySource for PolylineList {
    fn polylines(&self) -> &[Polyline] {
        &self.lines
    }
}

/// Polylines bucketed into a uniform grid over their total extent.
#[derive(Debug, Clone)]
pub struct GridIndex {
    lines: Vec<Polyline>,
    extent: Option<Bounds>,
    cols: usize,
    rows: usize,
    cell_w: f64,
    cell_h: f64,
    /// Row-major; each cell holds ascending polyline indices.
    cells: Vec<Vec<usize>>,
}

impl GridIndex {
    /// Build an index with `cells_per_axis` cells along each axis, clamped
    /// to `1..=MAX_GRID_CELLS`.
    #[must_use]
    pub fn new(lines: Vec<Polyline>, cells_per_axis: usize) -> Self {
        let n = cells_per_axis.clamp(1, MAX_GRID_CELLS);
        if n != cells_per_axis {
            tracing::warn!(requested = cells_per_axis, used = n, "grid cell count clamped");
        }
        let extent = lines.iter().filter_map(Polyline::bounds).reduce(Bounds::union);
        let (cols, rows, cell_w, cell_h) = match extent {
            Some(e) => (n, n, e.width() / n as f64, e.height() / n as f64),
            None => (0, 0, 0.0, 0.0),
        };

        let mut index = Self {
            lines,
            extent,
            cols,
            rows,
            cell_w,
            cell_h,
            cells: vec![Vec::new(); cols * rows],
        };
        for (i, line) in index.lines.iter().enumerate() {
            let Some(b) = line.bounds() else { continue };
            let Some((c0, r0, c1, r1)) = index.cell_range(&b) else { continue };
            for r in r0..=r1 {
                for c in c0..=c1 {
                    index.cells[r * cols + c].push(i);
                }
            }
        }
        tracing::debug!(lines = index.lines.len(), cols, rows, "built grid index");
        index
    }

    /// Grid dimensions `(cols, rows)`.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Inclusive cell range `(c0, r0, c1, r1)` covered by `bounds`, clamped to the grid.
    fn cell_range(&self, bounds: &Bounds) -> Option<(usize, usize, usize, usize)> {
        let extent = self.extent?;
        if !extent.intersects(bounds) {
            return None;
        }
        let c0 = cell_coord(bounds.minx, extent.minx, self.cell_w, self.cols);
        let c1 = cell_coord(bounds.maxx, extent.minx, self.cell_w, self.cols);
        let r0 = cell_coord(bounds.miny, extent.miny, self.cell_h, self.rows);
        let r1 = cell_coord(bounds.maxy, extent.miny, self.cell_h, self.rows);
        Some((c0, r0, c1, r1))
    }
}

fn cell_coord(v: f64, min: f64, size: f64, n: usize) -> usize {
    if size <= 0.0 || n == 0 {
        return 0;
    }
    let idx = ((v - min) / size).floor();
    if idx <= 0.0 {
        0
    } else {
        (idx as usize).min(n - 1)
    }
}

impl GeometrySource for GridIndex {
    fn polylines(&self) -> &[Polyline] {
        &self.lines
    }

    fn query(&self, bounds: &Bounds) -> Vec<&Polyline> {
        let Some((c0, r0, c1, r1)) = self.cell_range(bounds) else {
            return Vec::new();
        };
        let mut hits: Vec<usize> = Vec::new();
        for r in r0..=r1 {
            for c in c0..=c1 {
                hits.extend_from_slice(&self.cells[r * self.cols + c]);
            }
        }
        hits.sort_unstable();
        hits.dedup();
        hits.into_iter()
            .map(|i| &self.lines[i])
            .filter(|line| line.intersects(bounds))
            .collect()
    }

    fn total_bounds(&self) -> Option<Bounds> {
        self.extent
    }
}

/// Which [`GeometrySource`] adapter backs a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// [`PolylineList`].
    Linear,
    /// [`GridIndex`].
    #[default]
    Grid,
}

impl IndexKind {
    /// Build the selected adapter over `lines`.
    #[must_use]
    pub fn build(self, lines: Vec<Polyline>, grid_cells: usize) -> Box<dyn GeometrySource> {
        match self {
            Self::Linear => Box::new(PolylineList::new(lines)),
            Self::Grid => Box::new(GridIndex::new(lines, grid_cells)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, size: f64) -> Polyline {
        [(x, y), (x + size, y), (x + size, y + size), (x, y + size), (x, y)].into_iter().collect()
    }

    fn sample_lines() -> Vec<Polyline> {
        let mut lines = Vec::new();
        for i in 0..10 {
            for j in 0..10 {
                lines.push(square(f64::from(i) * 100.0, f64::from(j) * 100.0, 50.0));
            }
        }
        // One line spanning the whole extent.
        lines.push([(0.0, 0.0), (1000.0, 1000.0)].into_iter().collect());
        lines
    }

    #[test]
    fn test_list_query_filters_by_bounds() {
        let list = PolylineList::new(sample_lines());
        let hits = list.query(&Bounds::new(110.0, 110.0, 140.0, 140.0));
        // The square at (100, 100) and the diagonal.
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_grid_matches_linear_scan() {
        let list = PolylineList::new(sample_lines());
        let grid = GridIndex::new(sample_lines(), 8);
        let queries = [
            Bounds::new(110.0, 110.0, 140.0, 140.0),
            Bounds::new(-500.0, -500.0, 2000.0, 2000.0),
            Bounds::new(55.0, 55.0, 95.0, 95.0),
            Bounds::new(940.0, 0.0, 960.0, 1000.0),
            Bounds::new(5000.0, 5000.0, 6000.0, 6000.0),
        ];
        for q in &queries {
            let a: Vec<&Polyline> = list.query(q);
            let b: Vec<&Polyline> = grid.query(q);
            assert_eq!(a.len(), b.len(), "query {q:?}");
            for (x, y) in a.iter().zip(&b) {
                assert_eq!(x, y);
            }
        }
    }

    #[test]
    fn test_grid_preserves_load_order() {
        let grid = GridIndex::new(sample_lines(), 4);
        let hits = grid.query(&Bounds::new(-1.0, -1.0, 2000.0, 2000.0));
        assert_eq!(hits.len(), grid.len());
        for (hit, line) in hits.iter().zip(grid.polylines()) {
            assert!(std::ptr::eq(*hit, line));
        }
    }

    #[test]
    fn test_total_bounds() {
        let grid = GridIndex::new(sample_lines(), 4);
        let list = PolylineList::new(sample_lines());
        let expected = Some(Bounds::new(0.0, 0.0, 1000.0, 1000.0));
        assert_eq!(grid.total_bounds(), expected);
        assert_eq!(list.total_bounds(), expected);
    }

    #[test]
    fn test_empty_sources() {
        let grid = GridIndex::new(Vec::new(), 16);
        assert!(grid.is_empty());
        assert_eq!(grid.dimensions(), (0, 0));
        assert!(grid.query(&Bounds::new(-1.0, -1.0, 1.0, 1.0)).is_empty());
        assert!(PolylineList::default().total_bounds().is_none());
    }

    #[test]
    fn test_degenerate_extent() {
        // A vertical line has zero width.
        let lines = vec![[(5.0, 0.0), (5.0, 10.0)].into_iter().collect::<Polyline>()];
        let grid = GridIndex::new(lines, 8);
        assert_eq!(grid.query(&Bounds::new(4.0, 2.0, 6.0, 3.0)).len(), 1);
        assert!(grid.query(&Bounds::new(6.5, 2.0, 7.0, 3.0)).is_empty());
    }

    #[test]
    fn test_grid_cell_count_is_clamped() {
        let grid = GridIndex::new(sample_lines(), usize::MAX);
        assert_eq!(grid.dimensions(), (MAX_GRID_CELLS, MAX_GRID_CELLS));
        let list = PolylineList::new(sample_lines());
        let q = Bounds::new(110.0, 110.0, 140.0, 140.0);
        assert_eq!(grid.query(&q), list.query(&q));

        assert_eq!(GridIndex::new(sample_lines(), 0).dimensions(), (1, 1));
    }

    #[test]
    fn test_index_kind_build() {
        let src = IndexKind::Linear.build(sample_lines(), 8);
        assert_eq!(src.len(), 101);
        let src = IndexKind::Grid.build(sample_lines(), 8);
        assert_eq!(src.len(), 101);
    }
}
