//! Error types for the blockscope layout engine.

use thiserror::Error;

/// Primary error type for page analysis operations.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// The page reported a zero (or negative) scroll size, so nothing was
    /// rendered that could be measured. Distinct from an empty block list.
    #[error("invalid page size {width}x{height}: page rendered no measurable content")]
    InvalidPageSize { width: f64, height: f64 },

    #[error("invalid analysis parameters: {0}")]
    InvalidParams(String),

    #[error("element collector failed: {0}")]
    Collector(String),

    #[error("image error: {0}")]
    Image(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for LayoutError {
    fn from(err: image::ImageError) -> Self {
        LayoutError::Image(err.to_string())
    }
}

/// Result type alias for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;
