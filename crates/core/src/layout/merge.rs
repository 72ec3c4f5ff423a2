//! Element-to-block merging.
//!
//! Contains sort_elements() for establishing the merge-candidate order,
//! dedupe_contained() for dropping nested duplicate matches, and
//! merge_elements() for folding adjacent elements into blocks.

use crate::geometry::{adjacent, contains, union};

use super::element::{Block, RawElement};
use super::params::AnalysisParams;

/// Sorts elements by top edge, then left edge.
///
/// The sort is stable, so elements sharing an origin keep collection order.
pub fn sort_elements(elements: &mut [RawElement]) {
    elements.sort_by(|a, b| {
        a.rect()
            .y
            .total_cmp(&b.rect().y)
            .then_with(|| a.rect().x.total_cmp(&b.rect().x))
    });
}

/// Drops every element fully contained in an earlier kept element.
///
/// Works in collection order, so the category collected first wins; for two
/// identical rectangles the first occurrence is kept. Runs before merging.
pub fn dedupe_contained(elements: Vec<RawElement>) -> Vec<RawElement> {
    let mut kept: Vec<RawElement> = Vec::with_capacity(elements.len());
    for element in elements {
        let nested = kept
            .iter()
            .any(|outer| contains(element.rect(), outer.rect()));
        if nested {
            tracing::trace!(rect = ?element.rect(), "dropping nested element");
            continue;
        }
        kept.push(element);
    }
    kept
}

/// Folds geometrically adjacent elements into blocks.
///
/// # Algorithm
/// - Sort by `(y, x)`.
/// - Pop the first element as the accumulator and scan the rest left to right.
/// - An adjacent candidate is folded in (text space-joined, rectangles
///   unioned) and removed; the scan index stays put because removal shifts
///   the next candidate into its slot.
/// - A fold can grow the accumulator enough to reach a candidate skipped
///   earlier in the scan, so the scan repeats from the start until a full
///   pass folds nothing. Only then is the accumulator finalized.
///
/// Block ids are 1-based and follow completion order.
pub fn merge_elements(mut elements: Vec<RawElement>, params: &AnalysisParams) -> Vec<Block> {
    sort_elements(&mut elements);

    let mut blocks = Vec::new();
    let mut work = elements;

    while !work.is_empty() {
        let (mut rect, mut text) = work.remove(0).into_parts();
        loop {
            let mut folded = false;
            let mut index = 0;
            while index < work.len() {
                if adjacent(
                    &rect,
                    work[index].rect(),
                    params.align_tolerance,
                    params.adj_tolerance,
                ) {
                    let (cand_rect, cand_text) = work.remove(index).into_parts();
                    text.push(' ');
                    text.push_str(&cand_text);
                    rect = union(&rect, &cand_rect);
                    folded = true;
                } else {
                    index += 1;
                }
            }
            if !folded {
                break;
            }
        }

        let id = blocks.len() as u32 + 1;
        tracing::trace!(id, ?rect, "finalized block");
        blocks.push(Block { id, rect, text });
    }

    tracing::debug!(blocks = blocks.len(), "merge reached fixpoint");
    blocks
}
