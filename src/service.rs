//! Map service: the single entry point an application renders through.
//!
//! Owns the session's geometry source, overlay points, projection and render
//! settings. The viewport is not owned here; callers pass it in per call.

use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::geometry::{Bounds, Polyline};
use crate::loader::GeoJsonLoader;
use crate::navigation::{SUBPIXELS_X, SUBPIXELS_Y};
use crate::overlay::{visible_points, MapDataUpdate, MapPoint, PointStore, DEFAULT_MARGIN};
use crate::projection::{Projection, WebMercator};
use crate::raster::{render, RenderOptions};
use crate::source::{GeometrySource, IndexKind, DEFAULT_GRID_CELLS};
use crate::viewport::Viewport;

/// Geometry, points and render settings for one viewing session.
#[derive(Debug)]
pub struct MapService {
    geometry: Option<Box<dyn GeometrySource>>,
    points: PointStore,
    projection: Box<dyn Projection>,
    options: RenderOptions,
    margin: f64,
    index: IndexKind,
    grid_cells: usize,
}

impl Default for MapService {
    fn default() -> Self {
        Self::new(Box::new(WebMercator))
    }
}

impl MapService {
    /// Create a service with no geometry, using `projection` for points.
    #[must_use]
    pub fn new(projection: Box<dyn Projection>) -> Self {
        Self {
            geometry: None,
            points: PointStore::default(),
            projection,
            options: RenderOptions::default(),
            margin: DEFAULT_MARGIN,
            index: IndexKind::default(),
            grid_cells: DEFAULT_GRID_CELLS,
        }
    }

    /// Web Mercator service configured from `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            points: PointStore::new(config.overlay.match_epsilon),
            options: config.render_options(),
            margin: config.overlay.margin,
            index: config.render.index,
            grid_cells: config.render.grid_cell_size,
            ..Self::default()
        }
    }

    /// Replace the render options.
    #[must_use]
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the geometry source.
    pub fn set_geometry(&mut self, source: Box<dyn GeometrySource>) {
        tracing::info!(polylines = source.len(), "geometry set");
        self.geometry = Some(source);
    }

    /// Wrap projected polylines in the configured adapter and use them.
    pub fn set_polylines(&mut self, lines: Vec<Polyline>) {
        self.set_geometry(self.index.build(lines, self.grid_cells));
    }

    /// Load a GeoJSON file, project it, and index it with `index`.
    ///
    /// # Errors
    ///
    /// Propagates loader errors; the current geometry is kept on failure.
    pub fn load_geojson(&mut self, path: impl AsRef<Path>, index: IndexKind) -> Result<()> {
        let lines = GeoJsonLoader::load_projected(path, self.projection.as_ref())?;
        self.index = index;
        self.set_polylines(lines);
        Ok(())
    }

    /// The current geometry source.
    #[must_use]
    pub fn geometry(&self) -> Option<&dyn GeometrySource> {
        self.geometry.as_deref()
    }

    /// Projected extent of the geometry, `None` before loading or when empty.
    #[must_use]
    pub fn geometry_bounds(&self) -> Option<Bounds> {
        self.geometry.as_ref().and_then(|g| g.total_bounds())
    }

    /// Append a point.
    pub fn add_point(&mut self, point: MapPoint) {
        self.points.add(point);
    }

    /// Validate an update and replace the point at its location, or append.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidCoordinate`]; the store is unchanged.
    pub fn update_map_data(&mut self, update: &MapDataUpdate) -> Result<()> {
        let point = update.to_point()?;
        self.points.update_at(point);
        Ok(())
    }

    /// All points in insertion order.
    #[must_use]
    pub fn points(&self) -> &[MapPoint] {
        self.points.points()
    }

    /// Remove every point.
    pub fn clear_points(&mut self) {
        self.points.clear();
    }

    /// Points inside the overlay window for this viewport and display.
    #[must_use]
    pub fn visible_points(&self, viewport: &Viewport, width: i32, height: i32) -> Vec<&MapPoint> {
        visible_points(
            self.points.points(),
            viewport,
            self.projection.as_ref(),
            width,
            height,
            self.margin,
        )
    }

    /// Render the map; empty before geometry is set.
    #[must_use]
    pub fn render(&self, viewport: &Viewport, width: i32, height: i32) -> String {
        let Some(geometry) = self.geometry() else {
            return String::new();
        };
        let points = self.visible_points(viewport, width, height);
        render(viewport, Some(geometry), width, height, &points, &self.options)
    }

    /// Visible area in longitude/latitude degrees as `(west, south, east, north)`.
    #[must_use]
    pub fn viewport_lon_lat_bounds(
        &self,
        viewport: &Viewport,
        width: i32,
        height: i32,
    ) -> (f64, f64, f64, f64) {
        let b = viewport.get_bounds(
            f64::from(width.max(0)) * f64::from(SUBPIXELS_X),
            f64::from(height.max(0)) * f64::from(SUBPIXELS_Y),
        );
        let (west, south) = self.projection.inverse(b.minx, b.miny);
        let (east, north) = self.projection.inverse(b.maxx, b.maxy);
        (west, south, east, north)
    }

    /// Projection used for points and loading.
    #[must_use]
    pub fn projection(&self) -> &dyn Projection {
        self.projection.as_ref()
    }
}
