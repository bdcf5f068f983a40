//! Error types for trueno-map operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in trueno-map operations.
///
/// Zero-sized render targets and rendering before geometry is loaded are
/// routine conditions, not errors: both render to an empty string.
#[derive(Error, Debug)]
pub enum Error {
    /// Point coordinates outside the WGS84 range.
    #[error(
        "Invalid coordinate: longitude {longitude} must be in [-180, 180] \
         and latitude {latitude} in [-90, 90]"
    )]
    InvalidCoordinate {
        /// Longitude in degrees.
        longitude: f64,
        /// Latitude in degrees.
        latitude: f64,
    },

    /// Zoom factor that is not strictly positive and finite.
    #[error("Invalid zoom factor: {0} (must be > 0)")]
    InvalidZoomFactor(f64),

    /// Viewport scale that is not strictly positive and finite.
    #[error("Invalid scale: {0} (must be > 0)")]
    InvalidScale(f64),

    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed or unsupported GeoJSON document.
    #[error("GeoJSON error: {0}")]
    GeoJson(String),

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed, 0 if unknown).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),
}
