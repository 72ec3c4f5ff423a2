//! End-to-end tests of the page pipeline over synthetic pages.

use image::{Rgb, RgbImage};
use rand::SeedableRng;
use rand::rngs::StdRng;

use blockscope_core::collector::{Category, ElementProbe, PageSource, StaticPage};
use blockscope_core::layout::{AnalysisParams, PageSize, RawElement};
use blockscope_core::{LayoutError, Rect, analyze_page};

/// White page with a dark stroke along the top edge of `rect`.
fn ink_rect(image: &mut RgbImage, rect: Rect) {
    let y = rect.y as u32;
    for x in rect.x as u32..(rect.x + rect.width) as u32 {
        image.put_pixel(x, y, Rgb([0, 0, 0]));
    }
}

#[test]
fn test_submit_button_label_end_to_end() {
    let mut image = RgbImage::from_pixel(200, 100, Rgb([255, 255, 255]));
    ink_rect(&mut image, Rect::new(0.0, 0.0, 82.0, 20.0));

    let mut page = StaticPage::new(PageSize::new(200.0, 100.0), image)
        .with_text(Rect::new(0.0, 0.0, 50.0, 20.0), "Sub")
        .with_text(Rect::new(52.0, 0.0, 30.0, 20.0), "mit");

    let mut rng = StdRng::seed_from_u64(1);
    let analysis = analyze_page(&mut page, &AnalysisParams::default(), &mut rng).unwrap();

    assert_eq!(analysis.blocks.len(), 1);
    let block = &analysis.blocks[0];
    assert_eq!(block.id, 1);
    assert_eq!(block.rect, Rect::new(0.0, 0.0, 82.0, 20.0));
    assert_eq!(block.text, "Sub mit");

    assert_eq!(analysis.selected.len(), 1);
    assert_eq!(analysis.report.all_blocks.len(), 1);
    assert_eq!(analysis.report.all_blocks[0].rect.width, 82.0 / 200.0);
    assert_eq!(analysis.report.selected_blocks[0].text, "Sub mit");
    // 20px tall: below the visual component threshold.
    assert!(analysis.report.visual_components.is_empty());
}

#[test]
fn test_page_without_elements_gives_empty_report() {
    let image = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
    let mut page = StaticPage::new(PageSize::new(100.0, 100.0), image);
    let mut rng = StdRng::seed_from_u64(0);

    let analysis = analyze_page(&mut page, &AnalysisParams::default(), &mut rng).unwrap();

    assert!(analysis.blocks.is_empty());
    assert!(analysis.selected.is_empty());
    assert!(analysis.report.is_empty());
}

#[test]
fn test_unmeasurable_page_is_an_error() {
    let image = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
    let mut page = StaticPage::new(PageSize::new(0.0, 0.0), image)
        .with_text(Rect::new(0.0, 0.0, 5.0, 5.0), "x");
    let mut rng = StdRng::seed_from_u64(0);

    let err = analyze_page(&mut page, &AnalysisParams::default(), &mut rng).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidPageSize { .. }));
}

#[test]
fn test_invalid_params_are_rejected_before_collection() {
    let image = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
    let mut page = StaticPage::new(PageSize::new(10.0, 10.0), image);
    let params = AnalysisParams {
        adj_tolerance: -4.0,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(0);

    let err = analyze_page(&mut page, &params, &mut rng).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidParams(_)));
}

/// Source whose navigation failed: every call errors.
struct BrokenSource;

impl PageSource for BrokenSource {
    fn list_elements(&mut self, _: &[Category]) -> blockscope_core::Result<Vec<RawElement>> {
        Err(LayoutError::Collector("navigation timed out".to_string()))
    }

    fn page_size(&mut self) -> blockscope_core::Result<PageSize> {
        Err(LayoutError::Collector("navigation timed out".to_string()))
    }

    fn screenshot(&mut self) -> blockscope_core::Result<RgbImage> {
        Err(LayoutError::Collector("navigation timed out".to_string()))
    }
}

#[test]
fn test_collector_failure_is_page_scoped() {
    let mut rng = StdRng::seed_from_u64(0);
    let err = analyze_page(&mut BrokenSource, &AnalysisParams::default(), &mut rng).unwrap_err();
    assert!(matches!(err, LayoutError::Collector(_)));

    // A following page is unaffected.
    let image = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
    let mut page = StaticPage::new(PageSize::new(10.0, 10.0), image);
    assert!(analyze_page(&mut page, &AnalysisParams::default(), &mut rng).is_ok());
}

#[test]
fn test_form_page_with_nested_dedupe() {
    let mut image = RgbImage::from_pixel(400, 400, Rgb([255, 255, 255]));
    ink_rect(&mut image, Rect::new(0.0, 0.0, 300.0, 200.0));
    ink_rect(&mut image, Rect::new(0.0, 300.0, 300.0, 40.0));

    let mut page = StaticPage::new(PageSize::new(400.0, 400.0), image);
    page.push(
        Category::FormTable,
        ElementProbe {
            rect: Rect::new(0.0, 0.0, 300.0, 200.0),
            text: "Name Submit".to_string(),
            tag: "form".to_string(),
            has_direct_text: false,
            visible: true,
        },
    );
    page.push(
        Category::Button,
        ElementProbe {
            rect: Rect::new(210.0, 160.0, 80.0, 30.0),
            text: "Submit".to_string(),
            tag: "button".to_string(),
            has_direct_text: true,
            visible: true,
        },
    );
    page.push(
        Category::TextBlock,
        ElementProbe {
            rect: Rect::new(0.0, 300.0, 300.0, 40.0),
            text: "Footer".to_string(),
            tag: "p".to_string(),
            has_direct_text: true,
            visible: true,
        },
    );

    let params = AnalysisParams {
        dedupe_nested: true,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(5);
    let analysis = analyze_page(&mut page, &params, &mut rng).unwrap();

    let texts: Vec<&str> = analysis.blocks.iter().map(|b| b.text.as_str()).collect();
    assert_eq!(texts, vec!["Name Submit", "Footer"]);
    assert_eq!(analysis.selected.len(), 2);
    assert_eq!(analysis.report.visual_components.len(), 2);
}
