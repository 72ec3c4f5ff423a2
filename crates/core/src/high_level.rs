//! High-level page analysis API.
//!
//! Provides the main entry points:
//! - `extract_blocks()` - raw elements to numbered blocks
//! - `analyze_page()` - full collect, merge, sample and report pipeline over a `PageSource`

use image::RgbImage;
use rand::Rng;

use crate::collector::{Category, PageSource};
use crate::error::Result;
use crate::layout::{
    AnalysisParams, Block, PageSize, RawElement, dedupe_contained, merge_elements, sample_blocks,
};
use crate::report::{PageReport, build_report};

/// Everything produced for one analyzed page.
#[derive(Debug, Clone)]
pub struct PageAnalysis {
    pub page_size: PageSize,
    /// All merged blocks, in id order.
    pub blocks: Vec<Block>,
    /// Sampled blocks in selection order, pixel coordinates.
    pub selected: Vec<Block>,
    /// Clean full-page render the samples were checked against.
    pub screenshot: RgbImage,
    pub report: PageReport,
}

/// Turns collected elements into numbered blocks.
///
/// Nested de-duplication, when enabled, runs before any merging.
pub fn extract_blocks(elements: Vec<RawElement>, params: &AnalysisParams) -> Vec<Block> {
    let collected = elements.len();
    let elements = if params.dedupe_nested {
        dedupe_contained(elements)
    } else {
        elements
    };
    if elements.len() != collected {
        tracing::debug!(
            dropped = collected - elements.len(),
            "removed nested duplicate elements"
        );
    }
    merge_elements(elements, params)
}

/// Runs the whole pipeline against one rendered page.
///
/// The page size is read once, before collection. A page without elements
/// produces an empty report rather than an error.
pub fn analyze_page<S, R>(
    source: &mut S,
    params: &AnalysisParams,
    rng: &mut R,
) -> Result<PageAnalysis>
where
    S: PageSource + ?Sized,
    R: Rng + ?Sized,
{
    params.validate()?;

    let page_size = source.page_size()?;
    page_size.check()?;

    let elements = source.list_elements(&Category::ALL)?;
    tracing::debug!(elements = elements.len(), "collected elements");
    if elements.is_empty() {
        tracing::warn!("page yielded no visible elements");
    }

    let blocks = extract_blocks(elements, params);
    let screenshot = source.screenshot()?;
    let selected = sample_blocks(&blocks, &screenshot, params, rng);
    let report = build_report(&blocks, &selected, page_size, params)?;

    tracing::info!(
        blocks = blocks.len(),
        selected = selected.len(),
        "page analyzed"
    );

    Ok(PageAnalysis {
        page_size,
        blocks,
        selected,
        screenshot,
        report,
    })
}
