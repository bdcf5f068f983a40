//! Map projections from geographic longitude/latitude to the projected plane.
//!
//! The renderer never projects anything itself: geometry arrives already in
//! projected coordinates, and overlay points are projected through a
//! [`Projection`] just before the visibility test.

use std::f64::consts::PI;

/// Earth radius used by EPSG:3857, in meters.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude at which Web Mercator becomes a square (degrees).
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// Forward/inverse transform between longitude/latitude degrees and a plane.
pub trait Projection: std::fmt::Debug + Send + Sync {
    /// Project `(lon, lat)` degrees to plane coordinates.
    fn forward(&self, lon: f64, lat: f64) -> (f64, f64);

    /// Unproject plane coordinates to `(lon, lat)` degrees.
    fn inverse(&self, x: f64, y: f64) -> (f64, f64);
}

/// Spherical Web Mercator (EPSG:3857), meters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WebMercator;

impl Projection for WebMercator {
    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        let lat = lat.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
        let x = EARTH_RADIUS * lon.to_radians();
        let y = EARTH_RADIUS * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
        (x, y)
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let lon = (x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
        (lon, lat)
    }
}

/// Identity projection: longitude and latitude are used as plane coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlateCarree;

impl Projection for PlateCarree {
    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        (lon, lat)
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        (x, y)
    }
}
