//! Tests for the element collection contract and probe filtering.

use image::RgbImage;

use blockscope_core::collector::{Category, ElementProbe, PageSource, StaticPage, filter_probes};
use blockscope_core::layout::PageSize;
use blockscope_core::Rect;

fn probe(tag: &str, rect: Rect, text: &str, direct: bool, visible: bool) -> ElementProbe {
    ElementProbe {
        rect,
        text: text.to_string(),
        tag: tag.to_string(),
        has_direct_text: direct,
        visible,
    }
}

#[test]
fn test_filter_drops_invisible_and_zero_area() {
    let probes = vec![
        probe("p", Rect::new(0.0, 0.0, 100.0, 20.0), "kept", true, true),
        probe("p", Rect::new(0.0, 30.0, 100.0, 20.0), "hidden", true, false),
        probe("span", Rect::new(0.0, 60.0, 0.0, 20.0), "no width", true, true),
        probe("img", Rect::new(0.0, 90.0, 50.0, 0.0), "", false, true),
        probe("img", Rect::new(0.0, 90.0, 50.0, 50.0), "", false, true),
    ];

    let kept = filter_probes(probes);

    let texts: Vec<&str> = kept.iter().map(|e| e.text()).collect();
    assert_eq!(texts, vec!["kept", ""]);
    assert_eq!(kept[1].rect().height, 50.0);
}

#[test]
fn test_filter_drops_div_without_direct_text() {
    let probes = vec![
        probe("div", Rect::new(0.0, 0.0, 300.0, 100.0), "nested only", false, true),
        probe("div", Rect::new(0.0, 200.0, 300.0, 100.0), "  own text  ", true, true),
        probe("section", Rect::new(0.0, 400.0, 300.0, 100.0), "nested", false, true),
    ];

    let kept = filter_probes(probes);

    let texts: Vec<&str> = kept.iter().map(|e| e.text()).collect();
    assert_eq!(texts, vec!["own text", "nested"]);
}

#[test]
fn test_categories_are_ordered_and_have_selectors() {
    assert_eq!(Category::ALL.len(), 7);
    assert_eq!(Category::ALL[0], Category::Video);
    assert_eq!(Category::ALL[6], Category::Divider);
    for category in Category::ALL {
        assert!(!category.selector().is_empty());
    }
    assert!(Category::TextBlock.selector().ends_with("div"));
    assert_eq!(Category::Image.selector(), "img");
    assert_eq!(Category::NavBar.as_str(), "nav_bar");
}

#[test]
fn test_static_page_lists_by_category_order() {
    let mut page = StaticPage::new(PageSize::new(400.0, 300.0), RgbImage::new(400, 300));
    page.push(
        Category::Button,
        probe("button", Rect::new(0.0, 0.0, 80.0, 30.0), "Go", true, true),
    );
    page.push(
        Category::Image,
        probe("img", Rect::new(0.0, 100.0, 80.0, 80.0), "", false, true),
    );
    page.push(
        Category::TextBlock,
        probe("p", Rect::new(0.0, 200.0, 80.0, 20.0), "Hello", true, true),
    );

    let elements = page.list_elements(&Category::ALL).unwrap();
    let texts: Vec<&str> = elements.iter().map(|e| e.text()).collect();
    assert_eq!(texts, vec!["", "Hello", "Go"]);

    let only_buttons = page.list_elements(&[Category::Button]).unwrap();
    assert_eq!(only_buttons.len(), 1);

    assert_eq!(page.page_size().unwrap(), PageSize::new(400.0, 300.0));
}

#[test]
fn test_probe_deserializes_with_defaults() {
    let json = r#"{"rect":{"x":1.0,"y":2.0,"width":3.0,"height":4.0},"tag":"img","visible":true}"#;
    let probe: ElementProbe = serde_json::from_str(json).unwrap();
    assert_eq!(probe.text, "");
    assert!(!probe.has_direct_text);
    assert_eq!(probe.rect, Rect::new(1.0, 2.0, 3.0, 4.0));
}
