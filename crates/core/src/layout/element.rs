//! Layout element types.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// One collected DOM element: its rendered box and text content.
///
/// Only constructible with a non-degenerate rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct RawElement {
    rect: Rect,
    text: String,
}

impl RawElement {
    /// Returns `None` when `rect` has zero (or negative) width or height.
    pub fn new(rect: Rect, text: impl Into<String>) -> Option<Self> {
        if rect.is_degenerate() {
            return None;
        }
        Some(Self {
            rect,
            text: text.into(),
        })
    }

    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn into_parts(self) -> (Rect, String) {
        (self.rect, self.text)
    }
}

/// A merged visual unit: one or more raw elements folded together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// 1-based, assigned in merge-completion order.
    pub id: u32,
    pub rect: Rect,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_elements_are_rejected() {
        assert!(RawElement::new(Rect::new(5.0, 5.0, 0.0, 12.0), "x").is_none());
        assert!(RawElement::new(Rect::new(5.0, 5.0, 12.0, -1.0), "x").is_none());

        let el = RawElement::new(Rect::new(5.0, 5.0, 12.0, 12.0), "").unwrap();
        assert_eq!(el.text(), "");
        assert_eq!(el.rect().width, 12.0);
    }
}
