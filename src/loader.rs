//! GeoJSON loading.
//!
//! Reads a GeoJSON document into longitude/latitude line strings. Area
//! geometries contribute their outline: a polygon becomes its exterior ring,
//! which is what a coastline map draws. Points carry no line work and are
//! skipped.

use std::fs;
use std::path::Path;

use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::geometry::{Point2, Polyline};
use crate::projection::Projection;

/// A line in longitude/latitude degrees.
pub type LonLatLine = Vec<(f64, f64)>;

/// A GeoJSON position; anything beyond x and y (altitude) is ignored.
type Position = Vec<f64>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Point {
        #[allow(dead_code)]
        coordinates: IgnoredAny,
    },
    MultiPoint {
        #[allow(dead_code)]
        coordinates: IgnoredAny,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<Geometry>,
    },
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    geometry: Option<Value>,
}

/// Loads line geometry from GeoJSON text or files.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoJsonLoader;

impl GeoJsonLoader {
    /// Read and parse a GeoJSON file.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the file cannot be read, [`Error::GeoJson`] if it is
    /// not a supported GeoJSON document.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Vec<LonLatLine>> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let lines = Self::parse_str(&text)?;
        tracing::info!(path = %path.display(), lines = lines.len(), "loaded GeoJSON");
        Ok(lines)
    }

    /// Parse a FeatureCollection, a Feature, or a bare geometry.
    ///
    /// Features without geometry are skipped; features whose geometry cannot
    /// be read are skipped with a warning. Lines with fewer than two vertices
    /// are dropped.
    ///
    /// # Errors
    ///
    /// [`Error::GeoJson`] for invalid JSON, a missing or unknown `type`, or a
    /// malformed top-level geometry.
    pub fn parse_str(text: &str) -> Result<Vec<LonLatLine>> {
        let doc: Value = serde_json::from_str(text).map_err(|e| Error::GeoJson(e.to_string()))?;
        let kind = doc
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::GeoJson("document has no \"type\"".to_string()))?;

        let mut lines = Vec::new();
        match kind {
            "FeatureCollection" => {
                let features = doc
                    .get("features")
                    .and_then(Value::as_array)
                    .ok_or_else(|| {
                        Error::GeoJson("FeatureCollection has no \"features\" array".to_string())
                    })?;
                for (i, feature) in features.iter().enumerate() {
                    collect_feature(feature, i, &mut lines);
                }
            }
            "Feature" => collect_feature(&doc, 0, &mut lines),
            _ => {
                let geometry: Geometry =
                    serde_json::from_value(doc).map_err(|e| Error::GeoJson(e.to_string()))?;
                collect_geometry(geometry, &mut lines)?;
            }
        }
        Ok(lines)
    }

    /// Project longitude/latitude lines into plane polylines.
    #[must_use]
    pub fn project(lines: &[LonLatLine], projection: &dyn Projection) -> Vec<Polyline> {
        lines
            .iter()
            .map(|line| {
                Polyline::new(
                    line.iter()
                        .map(|&(lon, lat)| {
                            let (x, y) = projection.forward(lon, lat);
                            Point2::new(x, y)
                        })
                        .collect(),
                )
            })
            .collect()
    }

    /// Read a file and project it in one step.
    ///
    /// # Errors
    ///
    /// Same as [`GeoJsonLoader::from_path`].
    pub fn load_projected(
        path: impl AsRef<Path>,
        projection: &dyn Projection,
    ) -> Result<Vec<Polyline>> {
        let lines = Self::from_path(path)?;
        Ok(Self::project(&lines, projection))
    }
}

fn collect_feature(value: &Value, index: usize, lines: &mut Vec<LonLatLine>) {
    let feature: Feature = match serde_json::from_value(value.clone()) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(index, error = %e, "skipping malformed feature");
            return;
        }
    };
    let Some(geometry) = feature.geometry.filter(|g| !g.is_null()) else {
        tracing::trace!(index, "feature without geometry");
        return;
    };
    let result = serde_json::from_value::<Geometry>(geometry)
        .map_err(|e| Error::GeoJson(e.to_string()))
        .and_then(|g| collect_geometry(g, lines));
    if let Err(e) = result {
        tracing::warn!(index, error = %e, "skipping feature geometry");
    }
}

fn collect_geometry(geometry: Geometry, lines: &mut Vec<LonLatLine>) -> Result<()> {
    match geometry {
        Geometry::Point { .. } | Geometry::MultiPoint { .. } => {}
        Geometry::LineString { coordinates } => push_line(&coordinates, lines)?,
        Geometry::MultiLineString { coordinates } => {
            for part in &coordinates {
                push_line(part, lines)?;
            }
        }
        Geometry::Polygon { coordinates } => {
            if let Some(exterior) = coordinates.first() {
                push_line(exterior, lines)?;
            }
        }
        Geometry::MultiPolygon { coordinates } => {
            for polygon in &coordinates {
                if let Some(exterior) = polygon.first() {
                    push_line(exterior, lines)?;
                }
            }
        }
        Geometry::GeometryCollection { geometries } => {
            for g in geometries {
                collect_geometry(g, lines)?;
            }
        }
    }
    Ok(())
}

fn push_line(positions: &[Position], lines: &mut Vec<LonLatLine>) -> Result<()> {
    let line = positions
        .iter()
        .map(|p| match p.as_slice() {
            [x, y, ..] => Ok((*x, *y)),
            _ => Err(Error::GeoJson(format!("position needs two coordinates, got {}", p.len()))),
        })
        .collect::<Result<LonLatLine>>()?;
    if line.len() >= 2 {
        lines.push(line);
    }
    Ok(())
}
