//! Interactive terminal map viewer.
//!
//! A three-row layout: a header with the zoom level and corner coordinates,
//! the braille map filling the middle, and a status bar listing the key
//! bindings. Input is keyboard only.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use trueno_map::tui::App;
//! use trueno_map::{Config, MapService};
//!
//! let config = Config::load_or_default("config.yaml");
//! let mut service = MapService::from_config(&config);
//! service.load_geojson("data/globe.geo.json", config.render.index)?;
//! App::new(&config, service)?.run()?;
//! ```

pub mod app;
pub mod error;
pub mod input;
pub mod widget;

pub use app::App;
pub use error::{AppError, Result};
pub use input::{Action, InputHandler};
