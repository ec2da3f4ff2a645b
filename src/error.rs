//! Crate error type
//!
//! The simulation itself never fails; errors only come from the edges
//! (files, terminal I/O, building masks from raw pixel buffers).

use thiserror::Error;

/// Errors surfaced by loading, parsing and terminal I/O
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Pixel buffer length does not match `width * height * 4`
    #[error("pixel buffer has {actual} bytes, expected {expected}")]
    MaskSize { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
