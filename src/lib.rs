//! # Trueno-Map
//!
//! Terminal map viewer that draws vector line work (coastlines, borders) with
//! Unicode braille dot patterns, two dots wide and four tall per character.
//!
//! ## Features
//!
//! - **Pure Rust**: braille rasterization straight to a `String`
//! - **Bounded cost**: viewport culling, zoom-dependent Douglas-Peucker
//!   simplification and on-canvas line walks keep each frame proportional to
//!   the screen, not the dataset
//! - **Pluggable sources**: plain list or uniform-grid spatial index
//! - **Interactive**: ratatui/crossterm viewer with pan, zoom and reset
//!
//! ## Quick Start
//!
//! ```rust
//! use trueno_map::prelude::*;
//!
//! let coast: Polyline = [(-50.0, -20.0), (0.0, 30.0), (50.0, -20.0)].into_iter().collect();
//! let source = PolylineList::new(vec![coast]);
//! let viewport = Viewport::new(0.0, 0.0, 1.0).unwrap();
//!
//! let text = render(&viewport, Some(&source), 40, 10, &[], &RenderOptions::default());
//! assert_eq!(text.lines().count(), 10);
//! ```
//!
//! ## Feature Flags
//!
//! - `tui` (default): interactive terminal application and the `trueno-map` binary
//!
//! ## Academic References
//!
//! - Bresenham, J. E. (1965). "Algorithm for computer control of a digital
//!   plotter." *IBM Systems Journal*, 4(1), 25-30.
//! - Douglas, D. H., & Peucker, T. K. (1973). Line simplification algorithm.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code (Cloudflare incident 2025-11-18)
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Error types.
pub mod error;

/// Geometric primitives (points, bounds, polylines).
pub mod geometry;

/// Navigable view over projected space.
pub mod viewport;

/// Pan/zoom/reset controller.
pub mod navigation;

// ============================================================================
// Rendering Pipeline
// ============================================================================

/// Geometry sources and spatial indexing.
pub mod source;

/// Viewport culling and line simplification.
pub mod cull;

/// Braille rasterizer.
pub mod raster;

/// Point overlay.
pub mod overlay;

// ============================================================================
// Data & Services
// ============================================================================

/// Map projections.
pub mod projection;

/// GeoJSON loading.
pub mod loader;

/// Map service.
pub mod service;

/// Configuration.
pub mod config;

// ============================================================================
// Terminal Application (Feature-Gated)
// ============================================================================

#[cfg(feature = "tui")]
#[cfg_attr(docsrs, doc(cfg(feature = "tui")))]
pub mod tui;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::Config;
pub use error::{Error, Result};
pub use raster::render;
pub use service::MapService;
pub use viewport::Viewport;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::cull::SimplifyOptions;
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{Bounds, Point2, Polyline};
    pub use crate::loader::GeoJsonLoader;
    pub use crate::navigation::{Command, Direction, DisplaySize, Navigator};
    pub use crate::overlay::{MapDataUpdate, MapPoint, PointStore};
    pub use crate::projection::{Projection, WebMercator};
    pub use crate::raster::{render, BrailleGrid, RenderOptions};
    pub use crate::service::MapService;
    pub use crate::source::{GeometrySource, GridIndex, IndexKind, PolylineList};
    pub use crate::viewport::Viewport;
}
