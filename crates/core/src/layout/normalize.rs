//! Page-fraction normalization.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::geometry::Rect;

/// Total scroll size of a rendered page, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Fails when either dimension is zero, negative or NaN.
    pub fn check(&self) -> Result<()> {
        if self.width > 0.0 && self.height > 0.0 {
            Ok(())
        } else {
            Err(LayoutError::InvalidPageSize {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// A rectangle expressed as fractions of the page width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Divides each rectangle component by the matching page dimension.
pub fn normalize(rect: &Rect, page: PageSize) -> Result<NormalizedRect> {
    page.check()?;
    Ok(NormalizedRect {
        x: rect.x / page.width,
        y: rect.y / page.height,
        width: rect.width / page.width,
        height: rect.height / page.height,
    })
}
