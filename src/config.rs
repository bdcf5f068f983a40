//! Configuration for the map viewer.
//!
//! YAML file with every field optional; precedence is CLI > file > defaults.
//!
//! ```yaml
//! viewport:
//!   center_x: 0.0
//!   center_y: 0.0
//!   scale: 1000000.0
//! navigation:
//!   pan_step: 0.2
//!   zoom_factor: 0.8
//!   vim_keys: false
//! render:
//!   simplify_factor: 1.5
//!   min_tolerance: 500.0
//!   index: grid
//!   grid_cell_size: 64
//! overlay:
//!   margin: 2.0
//!   match_epsilon: 0.0001
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cull::{SimplifyOptions, DEFAULT_MIN_TOLERANCE, DEFAULT_SIMPLIFY_FACTOR};
use crate::error::{Error, Result};
use crate::navigation::{Navigator, DEFAULT_PAN_STEP, DEFAULT_ZOOM_FACTOR};
use crate::overlay::{DEFAULT_MARGIN, DEFAULT_MATCH_EPSILON};
use crate::raster::RenderOptions;
use crate::source::{IndexKind, DEFAULT_GRID_CELLS};
use crate::viewport::{Viewport, DEFAULT_SCALE};

/// Directory name under the platform config dir.
pub const APP_DIR: &str = "trueno-map";

/// Config file name.
pub const CONFIG_FILE: &str = "config.yaml";

/// Initial (and reset) view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Center x in projected units.
    #[serde(default)]
    pub center_x: f64,

    /// Center y in projected units.
    #[serde(default)]
    pub center_y: f64,

    /// Ground units per subpixel.
    #[serde(default = "default_scale")]
    pub scale: f64,
}

fn default_scale() -> f64 {
    DEFAULT_SCALE
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { center_x: 0.0, center_y: 0.0, scale: default_scale() }
    }
}

/// Keyboard navigation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Pan step as a fraction of the visible span.
    #[serde(default = "default_pan_step")]
    pub pan_step: f64,

    /// Zoom-in factor; zoom-out uses the reciprocal.
    #[serde(default = "default_zoom_factor")]
    pub zoom_factor: f64,

    /// Enable vim-style navigation keys (hjkl).
    #[serde(default)]
    pub vim_keys: bool,
}

fn default_pan_step() -> f64 {
    DEFAULT_PAN_STEP
}
fn default_zoom_factor() -> f64 {
    DEFAULT_ZOOM_FACTOR
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self { pan_step: default_pan_step(), zoom_factor: default_zoom_factor(), vim_keys: false }
    }
}

/// Rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Simplification tolerance per unit of scale.
    #[serde(default = "default_simplify_factor")]
    pub simplify_factor: f64,

    /// Simplification tolerance floor in projected units.
    #[serde(default = "default_min_tolerance")]
    pub min_tolerance: f64,

    /// Geometry source adapter (`linear` or `grid`).
    #[serde(default)]
    pub index: IndexKind,

    /// Grid index cells per axis, clamped to `1..=MAX_GRID_CELLS` (1024).
    #[serde(default = "default_grid_cell_size")]
    pub grid_cell_size: usize,
}

fn default_simplify_factor() -> f64 {
    DEFAULT_SIMPLIFY_FACTOR
}
fn default_min_tolerance() -> f64 {
    DEFAULT_MIN_TOLERANCE
}
fn default_grid_cell_size() -> usize {
    DEFAULT_GRID_CELLS
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            simplify_factor: default_simplify_factor(),
            min_tolerance: default_min_tolerance(),
            index: IndexKind::default(),
            grid_cell_size: default_grid_cell_size(),
        }
    }
}

/// Point overlay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Overlay window size relative to the canvas.
    #[serde(default = "default_margin")]
    pub margin: f64,

    /// Per-axis degrees within which an update replaces an existing point.
    #[serde(default = "default_match_epsilon")]
    pub match_epsilon: f64,
}

fn default_margin() -> f64 {
    DEFAULT_MARGIN
}
fn default_match_epsilon() -> f64 {
    DEFAULT_MATCH_EPSILON
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self { margin: default_margin(), match_epsilon: default_match_epsilon() }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Initial view.
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// Navigation settings.
    #[serde(default)]
    pub navigation: NavigationConfig,

    /// Render settings.
    #[serde(default)]
    pub render: RenderConfig,

    /// Overlay settings.
    #[serde(default)]
    pub overlay: OverlayConfig,
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config location: `<config_dir>/trueno-map/config.yaml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::ConfigParse { line, message: e.to_string() }
        })
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// The configured initial view.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScale`] for a non-positive scale.
    pub fn initial_viewport(&self) -> Result<Viewport> {
        Viewport::new(self.viewport.center_x, self.viewport.center_y, self.viewport.scale)
    }

    /// Navigator built from the navigation section. Reset returns to the
    /// configured initial view, or the default view if that is invalid.
    #[must_use]
    pub fn navigator(&self) -> Navigator {
        Navigator::new(self.navigation.pan_step, self.navigation.zoom_factor)
            .with_home(self.initial_viewport().unwrap_or_default())
    }

    /// Render options built from the render section.
    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            simplify: SimplifyOptions {
                factor: self.render.simplify_factor,
                min_tolerance: self.render.min_tolerance,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::new();

        assert_eq!(config.viewport.scale, 1_000_000.0);
        assert_eq!(config.navigation.pan_step, 0.2);
        assert_eq!(config.navigation.zoom_factor, 0.8);
        assert!(!config.navigation.vim_keys);
        assert_eq!(config.render.index, IndexKind::Grid);
        assert_eq!(config.render.grid_cell_size, 64);
        assert_eq!(config.overlay.margin, 2.0);
        assert_eq!(config.overlay.match_epsilon, 1e-4);
    }

    #[test]
    fn test_config_parse_empty_sections() {
        let config = Config::parse("render: {}").unwrap();
        assert_eq!(config.render.simplify_factor, 1.5);
        assert_eq!(config.render.min_tolerance, 500.0);
    }

    #[test]
    fn test_config_parse_full() {
        let yaml = r#"
viewport:
  center_x: 100.0
  center_y: -50.0
  scale: 2000.0
navigation:
  pan_step: 0.1
  zoom_factor: 0.5
  vim_keys: true
render:
  simplify_factor: 0.0
  min_tolerance: 0.0
  index: linear
  grid_cell_size: 16
overlay:
  margin: 1.5
  match_epsilon: 0.001
"#;

        let config = Config::parse(yaml).unwrap();

        let vp = config.initial_viewport().unwrap();
        assert_eq!((vp.center_x, vp.center_y, vp.scale()), (100.0, -50.0, 2000.0));
        assert!(config.navigation.vim_keys);
        assert_eq!(config.navigator().zoom_factor(), 0.5);
        assert_eq!(config.render.index, IndexKind::Linear);
        assert_eq!(config.render.grid_cell_size, 16);
        assert_eq!(config.render_options().simplify, SimplifyOptions::DISABLED);
        assert_eq!(config.overlay.margin, 1.5);
    }

    #[test]
    fn test_config_parse_error_includes_line() {
        let yaml = r#"
viewport:
  center_x: 0.0
  scale: not_a_number
"#;

        let result = Config::parse(yaml);
        assert!(result.is_err());

        let err = result.unwrap_err();
        let display = err.to_string();
        assert!(display.contains('4'), "Error should include line number: {display}");
    }

    #[test]
    fn test_config_unknown_index_rejected() {
        let result = Config::parse("render:\n  index: quadtree\n");
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_invalid_scale_surfaces_on_viewport() {
        let config = Config::parse("viewport:\n  scale: -1.0\n").unwrap();
        assert!(matches!(config.initial_viewport(), Err(Error::InvalidScale(_))));
    }

    #[test]
    fn test_config_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "navigation:\n  pan_step: 0.3").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.navigation.pan_step, 0.3);
    }

    #[test]
    fn test_config_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yaml");
        assert!(matches!(Config::load(&path), Err(Error::ConfigNotFound(_))));

        let config = Config::load_or_default(&path);
        assert_eq!(config.viewport.scale, DEFAULT_SCALE);
    }

    #[test]
    fn test_default_path_layout() {
        if let Some(path) = Config::default_path() {
            assert!(path.ends_with("trueno-map/config.yaml"));
        }
    }
}
