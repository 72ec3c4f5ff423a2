//! blockscope - visual block extraction for rendered HTML pages.
//!
//! Turns the raw element rectangles of a rendered page into merged,
//! numbered blocks, samples a non-degenerate subset of them and reports
//! everything in page-fraction coordinates.

pub mod collector;
pub mod error;
pub mod geometry;
pub mod high_level;
pub mod layout;
pub mod report;

pub use collector::{Category, ElementProbe, PageSource, StaticPage, filter_probes};
pub use error::{LayoutError, Result};
pub use geometry::{Rect, adjacent, contains, union};
pub use high_level::{PageAnalysis, analyze_page, extract_blocks};
pub use report::{PageReport, build_report};
