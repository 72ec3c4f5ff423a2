//! Rejection sampling of blocks for cropping and annotation.

use image::{RgbImage, imageops};
use rand::Rng;

use crate::geometry::Rect;

use super::element::Block;
use super::params::AnalysisParams;

/// Crops `rect` out of `image`.
///
/// The rectangle is truncated to whole pixels and clamped to the image;
/// returns `None` when nothing of it lies on the image.
pub fn crop_block(image: &RgbImage, rect: &Rect) -> Option<RgbImage> {
    let (img_w, img_h) = image.dimensions();

    let left = rect.x.trunc();
    let top = rect.y.trunc();
    let right = (left + rect.width.trunc()).min(f64::from(img_w));
    let bottom = (top + rect.height.trunc()).min(f64::from(img_h));
    let left = left.max(0.0);
    let top = top.max(0.0);

    if !(right > left && bottom > top) {
        return None;
    }

    let crop = imageops::crop_imm(
        image,
        left as u32,
        top as u32,
        (right - left) as u32,
        (bottom - top) as u32,
    );
    Some(crop.to_image())
}

/// Returns true if the crop holds more than one distinct color.
///
/// A uniform crop (all black, all white, one flat fill) carries no visible
/// content worth annotating.
pub fn has_visible_content(crop: &RgbImage) -> bool {
    let mut pixels = crop.pixels();
    match pixels.next() {
        Some(first) => pixels.any(|p| p != first),
        None => false,
    }
}

/// Draws up to `params.sample_count` distinct blocks whose crops show content.
///
/// Draws are uniform over the blocks not yet examined; every drawn block
/// leaves the pool, so no block is looked at twice. A block with a
/// degenerate crop costs one attempt. Once `params.max_attempts` is spent
/// or the pool is empty the picks made so far are returned, so callers must
/// not assume the target count is reached.
pub fn sample_blocks<R: Rng + ?Sized>(
    blocks: &[Block],
    image: &RgbImage,
    params: &AnalysisParams,
    rng: &mut R,
) -> Vec<Block> {
    let target = params.sample_count.min(blocks.len());
    let mut selected: Vec<Block> = Vec::with_capacity(target);
    let mut pool: Vec<usize> = (0..blocks.len()).collect();
    let mut attempts = 0usize;

    while selected.len() < target && attempts < params.max_attempts && !pool.is_empty() {
        let slot = rng.random_range(0..pool.len());
        let block = &blocks[pool.swap_remove(slot)];

        let visible = crop_block(image, &block.rect).is_some_and(|crop| has_visible_content(&crop));
        if !visible {
            tracing::trace!(id = block.id, "rejecting block with blank crop");
            attempts += 1;
            continue;
        }

        selected.push(block.clone());
    }

    if selected.len() < target {
        tracing::debug!(
            selected = selected.len(),
            target,
            attempts,
            untried = pool.len(),
            "sampler stopped short of its target"
        );
    }
    selected
}
