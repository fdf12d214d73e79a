use std::fmt::Debug;

use crate::anchoring::selector::TextPositionSelector;
use crate::anchoring::text_range::TextRange;
use crate::dom::{Dom, DomRange};
use crate::error::AnchorError;

/// Character offsets into the text of a fixed root element.
///
/// Restoring only works against the same root the anchor was made for, with
/// the text before the range unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextPositionAnchor<N> {
    pub root: N,
    pub start: usize,
    pub end: usize,
}

impl<N: Copy + Eq + Debug> TextPositionAnchor<N> {
    pub fn new(root: N, start: usize, end: usize) -> Self {
        Self { root, start, end }
    }

    pub fn from_range<D: Dom<Node = N>>(
        dom: &D,
        root: N,
        range: &DomRange<N>,
    ) -> Result<Self, AnchorError> {
        let text_range = TextRange::from_range(dom, range)?.relative_to(dom, root)?;
        Ok(Self::new(root, text_range.start.offset, text_range.end.offset))
    }

    pub fn from_selector(root: N, selector: &TextPositionSelector) -> Self {
        Self::new(root, selector.start, selector.end)
    }

    pub fn to_selector(&self) -> TextPositionSelector {
        TextPositionSelector {
            start: self.start,
            end: self.end,
        }
    }

    pub fn to_range<D: Dom<Node = N>>(&self, dom: &D) -> Result<DomRange<N>, AnchorError> {
        TextRange::from_offsets(self.root, self.start, self.end).to_range(dom)
    }
}
