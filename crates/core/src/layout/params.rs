//! Layout analysis parameters.
//!
//! Contains AnalysisParams struct for controlling merging, sampling and reporting.

use crate::error::{LayoutError, Result};
use crate::geometry::{DEFAULT_ADJ_TOLERANCE, DEFAULT_ALIGN_TOLERANCE};

/// Parameters for page analysis.
///
/// Controls how raw elements are merged into blocks, how many blocks are
/// sampled for annotation, and which blocks count as visual components.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisParams {
    /// Two elements whose vertical (or horizontal) centers differ by at most
    /// this many pixels are considered aligned on a row (or column).
    pub align_tolerance: f64,

    /// Aligned elements whose facing edges are at most this many pixels apart
    /// are considered touching.
    pub adj_tolerance: f64,

    /// Drop elements fully contained in an earlier collected element before merging.
    pub dedupe_nested: bool,

    /// Target number of blocks to sample.
    pub sample_count: usize,

    /// Maximum number of failed draws before the sampler gives up.
    pub max_attempts: usize,

    /// Blocks narrower than this are left out of the visual component listing.
    pub min_component_width: f64,

    /// Blocks shorter than this are left out of the visual component listing.
    pub min_component_height: f64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            align_tolerance: DEFAULT_ALIGN_TOLERANCE,
            adj_tolerance: DEFAULT_ADJ_TOLERANCE,
            dedupe_nested: false,
            sample_count: 4,
            max_attempts: 50,
            min_component_width: 30.0,
            min_component_height: 30.0,
        }
    }
}

impl AnalysisParams {
    /// Checks that tolerances and budgets are usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.align_tolerance >= 0.0) {
            return Err(LayoutError::InvalidParams(format!(
                "align_tolerance must be a non-negative number, got {}",
                self.align_tolerance
            )));
        }
        if !(self.adj_tolerance >= 0.0) {
            return Err(LayoutError::InvalidParams(format!(
                "adj_tolerance must be a non-negative number, got {}",
                self.adj_tolerance
            )));
        }
        if self.sample_count > 0 && self.max_attempts == 0 {
            return Err(LayoutError::InvalidParams(
                "max_attempts must be positive when sampling".to_string(),
            ));
        }
        if self.min_component_width < 0.0 || self.min_component_height < 0.0 {
            return Err(LayoutError::InvalidParams(
                "minimum component size cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}
