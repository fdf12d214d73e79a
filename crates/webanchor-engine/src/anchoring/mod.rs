//! Anchors that survive re-rendering of highlighted content.
//!
//! A DOM range inside a root element is stored in one of two ways:
//!
//! - [`RangeAnchor`]: XPaths to the elements containing each end, plus
//!   character offsets into those elements' text.
//! - [`TextPositionAnchor`]: character offsets from the start of the root's
//!   text.
//!
//! Both are built on [`TextPosition`] (an offset into one element's text)
//! and [`TextRange`] (a pair of them). All offsets count UTF-16 code units,
//! the unit web views use.

pub mod range_anchor;
pub mod selector;
pub mod text_position;
pub mod text_position_anchor;
pub mod text_range;
pub mod utils;
pub mod xpath;

pub use range_anchor::RangeAnchor;
pub use selector::{RangeSelector, Selector, TextPositionSelector};
pub use text_position::{ResolveDirection, TextPosition};
pub use text_position_anchor::TextPositionAnchor;
pub use text_range::TextRange;

use std::fmt::Debug;

use crate::dom::{Dom, DomRange};
use crate::error::AnchorError;

/// Either anchor kind, for code that handles both formats alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorFormat<N> {
    XPathBased(RangeAnchor<N>),
    OffsetBased(TextPositionAnchor<N>),
}

impl<N: Copy + Eq + Debug> AnchorFormat<N> {
    /// Restore an anchor from whichever selector shape was stored.
    pub fn from_selector<D: Dom<Node = N>>(
        dom: &D,
        root: N,
        selector: &Selector,
    ) -> Result<Self, AnchorError> {
        match selector {
            Selector::Range(selector) => {
                RangeAnchor::from_selector(dom, root, selector).map(Self::XPathBased)
            }
            Selector::TextPosition(selector) => Ok(Self::OffsetBased(
                TextPositionAnchor::from_selector(root, selector),
            )),
        }
    }

    pub fn to_range<D: Dom<Node = N>>(&self, dom: &D) -> Result<DomRange<N>, AnchorError> {
        match self {
            Self::XPathBased(anchor) => Ok(anchor.to_range()),
            Self::OffsetBased(anchor) => anchor.to_range(dom),
        }
    }

    pub fn to_selector<D: Dom<Node = N>>(&self, dom: &D) -> Result<Selector, AnchorError> {
        match self {
            Self::XPathBased(anchor) => anchor.to_selector(dom).map(Selector::from),
            Self::OffsetBased(anchor) => Ok(anchor.to_selector().into()),
        }
    }
}

impl<N> From<RangeAnchor<N>> for AnchorFormat<N> {
    fn from(anchor: RangeAnchor<N>) -> Self {
        Self::XPathBased(anchor)
    }
}

impl<N> From<TextPositionAnchor<N>> for AnchorFormat<N> {
    fn from(anchor: TextPositionAnchor<N>) -> Self {
        Self::OffsetBased(anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{BoundaryPoint, Document, NodeId};
    use pretty_assertions::assert_eq;

    fn doc() -> (Document, NodeId, Vec<NodeId>) {
        let doc = Document::parse(
            r#"<div id="r"><p>Photosynthesis makes <i>glucose</i>.</p><p>Plants store it.</p></div>"#,
        );
        let root = doc.element_by_id("r").unwrap();
        let texts = doc.text_nodes(root).collect();
        (doc, root, texts)
    }

    #[test]
    fn both_formats_restore_the_same_text() {
        let (doc, root, t) = doc();
        let range = DomRange::new(BoundaryPoint::new(t[1], 0), BoundaryPoint::new(t[3], 6));
        let anchors: [AnchorFormat<NodeId>; 2] = [
            RangeAnchor::from_range(root, range).into(),
            TextPositionAnchor::from_range(&doc, root, &range)
                .unwrap()
                .into(),
        ];

        for anchor in anchors {
            let selector = anchor.to_selector(&doc).unwrap();
            let restored = AnchorFormat::from_selector(&doc, root, &selector).unwrap();
            assert_eq!(
                restored.to_range(&doc).unwrap().text(&doc),
                "glucose.Plants"
            );
        }
    }

    #[test]
    fn selector_variant_follows_the_anchor_kind() {
        let (doc, root, t) = doc();
        let range = DomRange::new(BoundaryPoint::new(t[0], 0), BoundaryPoint::new(t[0], 4));
        let xpath = AnchorFormat::from(RangeAnchor::from_range(root, range));
        assert!(matches!(xpath.to_selector(&doc), Ok(Selector::Range(_))));

        let offsets = AnchorFormat::from(TextPositionAnchor::new(root, 0, 4));
        assert_eq!(
            offsets.to_selector(&doc),
            Ok(Selector::TextPosition(TextPositionSelector { start: 0, end: 4 }))
        );
    }
}
