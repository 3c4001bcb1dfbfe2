//! Raw page text as delivered by a page source.

use serde::{Deserialize, Serialize};

/// Text of one PDF page, before any cleaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPage {
    /// Page index (0-based, document order)
    pub index: usize,

    /// Extracted text; `None` when the page has no text layer
    pub text: Option<String>,
}

impl RawPage {
    /// Create a page with text.
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: Some(text.into()),
        }
    }

    /// Create a page without a text layer.
    pub fn empty(index: usize) -> Self {
        Self { index, text: None }
    }

    /// Whether the page has no usable text.
    pub fn is_blank(&self) -> bool {
        self.text.as_deref().map_or(true, |t| t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_pages() {
        assert!(RawPage::empty(0).is_blank());
        assert!(RawPage::new(1, "  \n ").is_blank());
        assert!(!RawPage::new(2, "Results").is_blank());
    }
}
