//! Error types for the terminal application.

use std::io;
use thiserror::Error;

/// Result type alias using [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;

/// Errors surfaced by the interactive viewer.
#[derive(Debug, Error)]
pub enum AppError {
    /// Terminal initialization, drawing or event polling failed.
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),

    /// A map operation failed.
    #[error(transparent)]
    Core(#[from] crate::Error),
}
