//! Point overlay: validated geographic points and viewport visibility.
//!
//! Points live in longitude/latitude degrees. Visibility is decided in
//! projected space against a window larger than the canvas (`margin`), so
//! markers near the edge do not pop in and out while panning.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::Point2;
use crate::navigation::{SUBPIXELS_X, SUBPIXELS_Y};
use crate::projection::Projection;
use crate::viewport::Viewport;

/// Default overlay window size relative to the canvas.
pub const DEFAULT_MARGIN: f64 = 2.0;

/// Default per-axis tolerance (degrees) for [`PointStore::update_at`].
pub const DEFAULT_MATCH_EPSILON: f64 = 1e-4;

/// Free-form attributes attached to a point.
pub type PointData = BTreeMap<String, serde_json::Value>;

/// A geographic point with optional attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    longitude: f64,
    latitude: f64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    data: PointData,
}

impl MapPoint {
    /// Create a point without attributes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] unless longitude is in
    /// `[-180, 180]` and latitude in `[-90, 90]` (NaN is rejected).
    pub fn new(longitude: f64, latitude: f64) -> Result<Self> {
        Self::with_data(longitude, latitude, PointData::new())
    }

    /// Create a point carrying `data`.
    ///
    /// # Errors
    ///
    /// Same as [`MapPoint::new`].
    pub fn with_data(longitude: f64, latitude: f64, data: PointData) -> Result<Self> {
        if !(-180.0..=180.0).contains(&longitude) || !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::InvalidCoordinate { longitude, latitude });
        }
        Ok(Self { longitude, latitude, data })
    }

    /// Longitude in degrees.
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Latitude in degrees.
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Attached attributes.
    #[must_use]
    pub fn data(&self) -> &PointData {
        &self.data
    }

    /// Whether both coordinates differ from `other`'s by less than `epsilon`.
    #[must_use]
    pub fn is_near(&self, other: &Self, epsilon: f64) -> bool {
        (self.longitude - other.longitude).abs() < epsilon
            && (self.latitude - other.latitude).abs() < epsilon
    }
}

/// Incoming point data, e.g. from a JSON feed. Validated by [`MapDataUpdate::to_point`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDataUpdate {
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Attributes for the point.
    #[serde(default)]
    pub data: PointData,
}

impl MapDataUpdate {
    /// Convert into a validated [`MapPoint`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] for out-of-range coordinates.
    pub fn to_point(&self) -> Result<MapPoint> {
        MapPoint::with_data(self.longitude, self.latitude, self.data.clone())
    }
}

/// Ordered point collection with update-at-location semantics.
#[derive(Debug, Clone)]
pub struct PointStore {
    points: Vec<MapPoint>,
    match_epsilon: f64,
}

impl Default for PointStore {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_EPSILON)
    }
}

impl PointStore {
    /// Create an empty store matching locations within `match_epsilon` degrees.
    #[must_use]
    pub fn new(match_epsilon: f64) -> Self {
        Self { points: Vec::new(), match_epsilon }
    }

    /// Append a point.
    pub fn add(&mut self, point: MapPoint) {
        self.points.push(point);
    }

    /// Replace the first point at (nearly) the same location, or append.
    ///
    /// Returns `true` when an existing point was replaced.
    pub fn update_at(&mut self, point: MapPoint) -> bool {
        let epsilon = self.match_epsilon;
        if let Some(existing) = self.points.iter_mut().find(|p| p.is_near(&point, epsilon)) {
            *existing = point;
            true
        } else {
            self.points.push(point);
            false
        }
    }

    /// Remove every point.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Points in insertion order.
    #[must_use]
    pub fn points(&self) -> &[MapPoint] {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Points whose projection falls inside the overlay window, in input order.
///
/// The window is `viewport.get_bounds(width_chars·2·margin, height_chars·4·margin)`,
/// edges inclusive. Non-positive dimensions select nothing.
#[must_use]
pub fn visible_points<'a>(
    points: &'a [MapPoint],
    viewport: &Viewport,
    projection: &dyn Projection,
    width_chars: i32,
    height_chars: i32,
    margin: f64,
) -> Vec<&'a MapPoint> {
    if width_chars <= 0 || height_chars <= 0 {
        return Vec::new();
    }
    let window = viewport.get_bounds(
        f64::from(width_chars) * f64::from(SUBPIXELS_X) * margin,
        f64::from(height_chars) * f64::from(SUBPIXELS_Y) * margin,
    );
    points
        .iter()
        .filter(|p| {
            let (x, y) = projection.forward(p.longitude, p.latitude);
            window.contains(Point2::new(x, y))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{PlateCarree, WebMercator};

    #[test]
    fn test_valid_point() {
        let p = MapPoint::new(-122.4, 37.8).unwrap();
        assert_eq!((p.longitude(), p.latitude()), (-122.4, 37.8));
        assert!(p.data().is_empty());
        assert!(MapPoint::new(180.0, -90.0).is_ok());
    }

    #[test]
    fn test_invalid_longitude() {
        let err = MapPoint::new(200.0, 0.0).unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinate { longitude, .. } if longitude == 200.0));
    }

    #[test]
    fn test_invalid_latitude() {
        assert!(matches!(MapPoint::new(0.0, -95.0), Err(Error::InvalidCoordinate { .. })));
        assert!(MapPoint::new(f64::NAN, 0.0).is_err());
        assert!(MapPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_update_deserializes_and_validates() {
        let json = r#"{"longitude": 10.0, "latitude": 20.0, "data": {"name": "buoy"}}"#;
        let update: MapDataUpdate = serde_json::from_str(json).unwrap();
        let point = update.to_point().unwrap();
        assert_eq!(point.data()["name"], "buoy");

        let bad = MapDataUpdate { longitude: 0.0, latitude: 91.0, data: PointData::new() };
        assert!(bad.to_point().is_err());
    }

    #[test]
    fn test_update_at_replaces_nearby() {
        let mut store = PointStore::default();
        let mut data = PointData::new();
        data.insert("v".to_string(), serde_json::json!(1));
        store.add(MapPoint::with_data(45.0, -30.0, data).unwrap());

        assert!(store.update_at(MapPoint::new(45.0, -30.0).unwrap()));
        assert_eq!(store.len(), 1);
        assert!(store.points()[0].data().is_empty());

        assert!(store.update_at(MapPoint::new(45.000_05, -30.000_03).unwrap()));
        assert_eq!(store.len(), 1);
        assert_eq!(store.points()[0].longitude(), 45.000_05);
    }

    #[test]
    fn test_update_at_appends_when_far() {
        let mut store = PointStore::default();
        store.add(MapPoint::new(45.0, -30.0).unwrap());
        assert!(!store.update_at(MapPoint::new(45.001, -30.0).unwrap()));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_update_at_replaces_first_match_only() {
        let mut store = PointStore::default();
        store.add(MapPoint::new(1.0, 1.0).unwrap());
        store.add(MapPoint::new(1.0, 1.0).unwrap());
        store.update_at(MapPoint::new(1.000_01, 1.0).unwrap());
        assert_eq!(store.points()[0].longitude(), 1.000_01);
        assert_eq!(store.points()[1].longitude(), 1.0);
    }

    #[test]
    fn test_clear() {
        let mut store = PointStore::default();
        store.add(MapPoint::new(0.0, 0.0).unwrap());
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_visible_points_uses_margin_window() {
        // 10x5 chars -> 20x20 subpixels; scale 1 with margin 2 -> window ±20.
        let vp = Viewport::new(0.0, 0.0, 1.0).unwrap();
        let points = vec![
            MapPoint::new(5.0, 5.0).unwrap(),
            MapPoint::new(15.0, -15.0).unwrap(),
            MapPoint::new(20.0, 20.0).unwrap(),
            MapPoint::new(25.0, 0.0).unwrap(),
        ];
        let visible = visible_points(&points, &vp, &PlateCarree, 10, 5, 2.0);
        let lons: Vec<f64> = visible.iter().map(|p| p.longitude()).collect();
        assert_eq!(lons, vec![5.0, 15.0, 20.0]);

        let tight = visible_points(&points, &vp, &PlateCarree, 10, 5, 1.0);
        assert_eq!(tight.len(), 1);
    }

    #[test]
    fn test_visible_points_degenerate_size() {
        let points = vec![MapPoint::new(0.0, 0.0).unwrap()];
        let vp = Viewport::default();
        assert!(visible_points(&points, &vp, &WebMercator, 0, 10, 2.0).is_empty());
        assert!(visible_points(&points, &vp, &WebMercator, 10, -1, 2.0).is_empty());
    }
}
