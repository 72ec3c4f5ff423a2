//! Element collection contract between a rendering engine and the layout engine.
//!
//! A `PageSource` is anything that can list visible elements of a rendered
//! page, report the page's scroll size and capture a full-page screenshot.
//! Browser-backed sources live outside this crate; `StaticPage` serves
//! synthetic fixtures.

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::geometry::Rect;
use crate::layout::{PageSize, RawElement};

/// Semantic element categories, queried in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Video,
    Image,
    TextBlock,
    FormTable,
    Button,
    NavBar,
    Divider,
}

impl Category {
    /// Every category, in collection order.
    pub const ALL: [Category; 7] = [
        Category::Video,
        Category::Image,
        Category::TextBlock,
        Category::FormTable,
        Category::Button,
        Category::NavBar,
        Category::Divider,
    ];

    /// CSS selector matching elements of this category.
    pub fn selector(self) -> &'static str {
        match self {
            Category::Video => "video",
            Category::Image => "img",
            Category::TextBlock => {
                "p, span, a, strong, h1, h2, h3, h4, h5, h6, li, th, td, label, code, pre, div"
            }
            Category::FormTable => "form, table, div.form",
            Category::Button => {
                r#"button, input[type="button"], input[type="submit"], [role="button"], input"#
            }
            Category::NavBar => {
                r#"nav, [role="navigation"], .navbar, [class~="nav"], [class~="navigation"], [class~="menu"], [class~="navbar"], [id="menu"], [id="nav"], [id="navigation"], [id="navbar"]"#
            }
            Category::Divider => {
                r#"hr, [class*="separator"], [class*="divider"], [id="separator"], [id="divider"], [role="separator"]"#
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Video => "video",
            Category::Image => "image",
            Category::TextBlock => "text_block",
            Category::FormTable => "form_table",
            Category::Button => "button",
            Category::NavBar => "nav_bar",
            Category::Divider => "divider",
        }
    }
}

/// What a rendering engine reports about one matched element, before filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementProbe {
    pub rect: Rect,
    #[serde(default)]
    pub text: String,
    /// Lower-case tag name.
    pub tag: String,
    /// Whether the element has a direct, non-blank text node child.
    #[serde(default)]
    pub has_direct_text: bool,
    pub visible: bool,
}

/// Applies the collection filters, keeping probe order.
///
/// Invisible probes, probes without area and `div` wrappers whose text only
/// comes from nested elements are dropped. Kept text is trimmed.
pub fn filter_probes(probes: impl IntoIterator<Item = ElementProbe>) -> Vec<RawElement> {
    probes
        .into_iter()
        .filter(|probe| probe.visible)
        .filter(|probe| !(probe.tag == "div" && !probe.has_direct_text))
        .filter_map(|probe| RawElement::new(probe.rect, probe.text.trim()))
        .collect()
}

/// Capability interface over a rendered page.
pub trait PageSource {
    /// Visible, non-degenerate elements matching `categories`, concatenated
    /// per category in document order.
    fn list_elements(&mut self, categories: &[Category]) -> Result<Vec<RawElement>>;

    /// Total scroll width and height of the page.
    fn page_size(&mut self) -> Result<PageSize>;

    /// Full-page screenshot of the clean render.
    fn screenshot(&mut self) -> Result<RgbImage>;
}

/// In-memory page for tests and offline replays.
///
/// Probes are tagged with the category they were matched under; listing
/// returns them grouped in the requested category order.
#[derive(Debug, Clone)]
pub struct StaticPage {
    size: PageSize,
    probes: Vec<(Category, ElementProbe)>,
    image: RgbImage,
}

impl StaticPage {
    pub fn new(size: PageSize, image: RgbImage) -> Self {
        Self {
            size,
            probes: Vec::new(),
            image,
        }
    }

    /// Adds a probe matched under `category`.
    pub fn push(&mut self, category: Category, probe: ElementProbe) {
        self.probes.push((category, probe));
    }

    /// Adds a visible text element with a direct text node.
    pub fn with_text(mut self, rect: Rect, text: &str) -> Self {
        self.push(
            Category::TextBlock,
            ElementProbe {
                rect,
                text: text.to_string(),
                tag: "span".to_string(),
                has_direct_text: true,
                visible: true,
            },
        );
        self
    }
}

impl PageSource for StaticPage {
    fn list_elements(&mut self, categories: &[Category]) -> Result<Vec<RawElement>> {
        let ordered = categories.iter().flat_map(|category| {
            self.probes
                .iter()
                .filter(move |(c, _)| c == category)
                .map(|(_, probe)| probe.clone())
        });
        Ok(filter_probes(ordered))
    }

    fn page_size(&mut self) -> Result<PageSize> {
        Ok(self.size)
    }

    fn screenshot(&mut self) -> Result<RgbImage> {
        if self.image.width() == 0 || self.image.height() == 0 {
            return Err(LayoutError::Image("static page has no screenshot".to_string()));
        }
        Ok(self.image.clone())
    }
}
