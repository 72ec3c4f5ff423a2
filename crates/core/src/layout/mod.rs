//! Layout model for rendered pages.
//!
//! This module contains:
//! - Layout element types (RawElement, Block)
//! - Analysis parameters (AnalysisParams)
//! - The adjacency block merger and nested de-duplication
//! - The non-degenerate block sampler
//! - Page-fraction normalization

pub mod element;
pub mod merge;
pub mod normalize;
pub mod params;
pub mod sample;

// Re-export params
pub use params::*;

pub use element::{Block, RawElement};
pub use merge::{dedupe_contained, merge_elements, sort_elements};
pub use normalize::{NormalizedRect, PageSize, normalize};
pub use sample::{crop_block, has_visible_content, sample_blocks};
