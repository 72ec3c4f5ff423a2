//! Persisted page report.
//!
//! A `PageReport` carries every block normalized to page fractions, the
//! sampled subset with its text, and the pixel-space visual component listing.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::{AnalysisParams, Block, NormalizedRect, PageSize, normalize};

/// One entry of the aggregate block listing. Text is omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockEntry {
    pub id: u32,
    #[serde(rename = "box")]
    pub rect: NormalizedRect,
}

/// A sampled block with its text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedBlock {
    pub id: u32,
    pub text: String,
    #[serde(rename = "box")]
    pub rect: NormalizedRect,
}

/// A block large enough to be listed as a visual component, in page pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualComponent {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageReport {
    pub all_blocks: Vec<BlockEntry>,
    pub selected_blocks: Vec<SelectedBlock>,
    pub visual_components: Vec<VisualComponent>,
}

impl PageReport {
    /// Report for a page that yielded no elements.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.all_blocks.is_empty()
    }
}

/// Lists blocks at least `min_width` x `min_height` pixels large.
pub fn extract_visual_components(
    blocks: &[Block],
    min_width: f64,
    min_height: f64,
) -> Vec<VisualComponent> {
    blocks
        .iter()
        .filter(|b| b.rect.width >= min_width && b.rect.height >= min_height)
        .map(|b| VisualComponent {
            left: b.rect.x,
            top: b.rect.y,
            width: b.rect.width,
            height: b.rect.height,
            text: b.text.clone(),
        })
        .collect()
}

/// Normalizes `blocks` and `selected` against `page` and assembles the report.
///
/// An invalid page size is reported even when there are no blocks, since it
/// means the page could not be measured at all.
pub fn build_report(
    blocks: &[Block],
    selected: &[Block],
    page: PageSize,
    params: &AnalysisParams,
) -> Result<PageReport> {
    page.check()?;

    let all_blocks = blocks
        .iter()
        .map(|b| -> Result<BlockEntry> {
            Ok(BlockEntry {
                id: b.id,
                rect: normalize(&b.rect, page)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let selected_blocks = selected
        .iter()
        .map(|b| -> Result<SelectedBlock> {
            Ok(SelectedBlock {
                id: b.id,
                text: b.text.clone(),
                rect: normalize(&b.rect, page)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let visual_components =
        extract_visual_components(blocks, params.min_component_width, params.min_component_height);

    Ok(PageReport {
        all_blocks,
        selected_blocks,
        visual_components,
    })
}
