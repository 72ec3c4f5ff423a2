//! Output tree: input discovery, per-page directories and artifact writing.
//!
//! Layout of one analyzed page:
//! ```text
//! <output>/<stem>/analysis_result.json
//! <output>/<stem>/random_crops_info.json
//! <output>/<stem>/random_crops/original.png
//! <output>/<stem>/random_crops/crop_<id>.png
//! <output>/<stem>/random_crops/layout_with_boxes.png
//! ```

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use image::{Rgb, RgbImage};
use serde::Serialize;

use blockscope_core::layout::{Block, crop_block};
use blockscope_core::report::PageReport;
use blockscope_core::PageAnalysis;

const OUTLINE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const OUTLINE_WIDTH: u32 = 2;
const LABEL_SCALE: u32 = 2;

/// 3x5 bitmaps for the digits 0-9, one row per entry, high bit on the left.
const DIGIT_GLYPHS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// Record persisted per analyzed page.
#[derive(Debug, Serialize)]
pub struct AnalysisResult<'a> {
    pub html_file: String,
    pub elements: &'a PageReport,
    pub screenshot: String,
}

/// Finds `.html` / `.htm` files under `dir`, recursively, sorted by path.
pub fn find_html_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_html_recursively(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_html_recursively(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read dir {}", dir.display()))?;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(dir = %dir.display(), %err, "skipping unreadable directory entry");
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            collect_html_recursively(&path, out)?;
        } else if path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
            .unwrap_or(false)
        {
            out.push(path);
        }
    }
    Ok(())
}

/// Creates `<base>/<prefix>_<timestamp>`, suffixing `_<n>` until the name is free.
pub fn create_unique_output_dir(base: &Path, prefix: &str) -> Result<PathBuf> {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let name = format!("{prefix}_{timestamp}");
    let dir = first_free_path(base, &name);
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create output dir {}", dir.display()))?;
    Ok(dir)
}

/// Picks `<root>/<name>`, or `<root>/<name>_<n>` for the first free `n`.
pub fn first_free_path(root: &Path, name: &str) -> PathBuf {
    let mut path = root.join(name);
    let mut counter = 1;
    while path.exists() {
        path = root.join(format!("{name}_{counter}"));
        counter += 1;
    }
    path
}

/// Output directory for one HTML file, named after its stem.
pub fn page_output_dir(root: &Path, html_file: &Path) -> Result<PathBuf> {
    let stem = html_file
        .file_stem()
        .ok_or_else(|| anyhow!("no file name in {}", html_file.display()))?
        .to_string_lossy();
    Ok(first_free_path(root, &stem))
}

/// Writes `id` in red with its top-left corner at `(x, y)`, clipped to the canvas.
fn draw_label(canvas: &mut RgbImage, x: u32, y: u32, id: u32) {
    let (w, h) = canvas.dimensions();
    let advance = 4 * LABEL_SCALE;
    for (i, digit) in id.to_string().bytes().enumerate() {
        let glyph = &DIGIT_GLYPHS[usize::from(digit - b'0')];
        let gx = x + i as u32 * advance;
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..3u32 {
                if bits & (0b100 >> col) == 0 {
                    continue;
                }
                for dy in 0..LABEL_SCALE {
                    for dx in 0..LABEL_SCALE {
                        let px = gx + col * LABEL_SCALE + dx;
                        let py = y + row as u32 * LABEL_SCALE + dy;
                        if px < w && py < h {
                            canvas.put_pixel(px, py, OUTLINE_COLOR);
                        }
                    }
                }
            }
        }
    }
}

/// Copy of `image` with a red outline and id label on every block in `blocks`.
pub fn draw_outlines(image: &RgbImage, blocks: &[Block]) -> RgbImage {
    let mut canvas = image.clone();
    let (w, h) = canvas.dimensions();
    if w == 0 || h == 0 {
        return canvas;
    }

    for block in blocks {
        let x0 = block.rect.x.max(0.0) as u32;
        let y0 = block.rect.y.max(0.0) as u32;
        let x1 = (block.rect.right().max(0.0) as u32).min(w - 1);
        let y1 = (block.rect.bottom().max(0.0) as u32).min(h - 1);
        if x0 > x1 || y0 > y1 {
            continue;
        }

        for t in 0..OUTLINE_WIDTH {
            for x in x0..=x1 {
                if y0 + t <= y1 {
                    canvas.put_pixel(x, y0 + t, OUTLINE_COLOR);
                }
                if y1 >= y0 + t {
                    canvas.put_pixel(x, y1 - t, OUTLINE_COLOR);
                }
            }
            for y in y0..=y1 {
                if x0 + t <= x1 {
                    canvas.put_pixel(x0 + t, y, OUTLINE_COLOR);
                }
                if x1 >= x0 + t {
                    canvas.put_pixel(x1 - t, y, OUTLINE_COLOR);
                }
            }
        }
        let inset = OUTLINE_WIDTH + 1;
        draw_label(&mut canvas, x0 + inset, y0 + inset, block.id);
    }
    canvas
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("failed to write {}", path.display()))
}

/// Writes every artifact for one analyzed page into `page_dir`.
pub fn write_page_artifacts(
    page_dir: &Path,
    html_file: &Path,
    analysis: &PageAnalysis,
) -> Result<()> {
    let crop_dir = page_dir.join("random_crops");
    fs::create_dir_all(&crop_dir)
        .with_context(|| format!("failed to create {}", crop_dir.display()))?;

    let original = crop_dir.join("original.png");
    analysis
        .screenshot
        .save(&original)
        .with_context(|| format!("failed to save {}", original.display()))?;

    for block in &analysis.selected {
        let Some(crop) = crop_block(&analysis.screenshot, &block.rect) else {
            tracing::warn!(id = block.id, "selected block no longer crops");
            continue;
        };
        let path = crop_dir.join(format!("crop_{}.png", block.id));
        crop.save(&path)
            .with_context(|| format!("failed to save {}", path.display()))?;
    }

    let overlay = draw_outlines(&analysis.screenshot, &analysis.selected);
    let overlay_path = crop_dir.join("layout_with_boxes.png");
    overlay
        .save(&overlay_path)
        .with_context(|| format!("failed to save {}", overlay_path.display()))?;

    let result = AnalysisResult {
        html_file: html_file.display().to_string(),
        elements: &analysis.report,
        screenshot: original.display().to_string(),
    };
    write_json(&page_dir.join("analysis_result.json"), &result)?;
    write_json(
        &page_dir.join("random_crops_info.json"),
        &analysis.report.selected_blocks,
    )?;
    Ok(())
}

/// Removes a partially written page directory.
pub fn remove_page_dir(page_dir: &Path) {
    if page_dir.exists() {
        if let Err(err) = fs::remove_dir_all(page_dir) {
            tracing::warn!(dir = %page_dir.display(), %err, "failed to clean up page output");
        }
    }
}
