use std::fmt::Debug;

use crate::anchoring::text_position::{ResolveDirection, TextPosition};
use crate::anchoring::utils::resolve_offsets;
use crate::dom::{Dom, DomRange};
use crate::error::AnchorError;

/// A start and end [`TextPosition`]. The start is expected to come first
/// but this is not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange<N> {
    pub start: TextPosition<N>,
    pub end: TextPosition<N>,
}

impl<N: Copy + Eq + Debug> TextRange<N> {
    pub fn new(start: TextPosition<N>, end: TextPosition<N>) -> Self {
        Self { start, end }
    }

    /// Both ends as offsets into `root`.
    pub fn from_offsets(root: N, start: usize, end: usize) -> Self {
        Self::new(TextPosition::new(root, start), TextPosition::new(root, end))
    }

    /// Resolve both ends to text node boundaries.
    ///
    /// Ends inside the same element are resolved in a single pass. Otherwise
    /// each end resolves on its own, with an empty start element snapping
    /// forwards and an empty end element snapping backwards.
    pub fn to_range<D: Dom<Node = N>>(&self, dom: &D) -> Result<DomRange<N>, AnchorError> {
        if self.start.element == self.end.element && self.start.offset <= self.end.offset {
            let offsets = [self.start.offset, self.end.offset];
            let points = resolve_offsets(dom, self.start.element, &offsets);
            return match points.as_slice() {
                &[start, end] => Ok(DomRange::new(start, end)),
                [_] => Err(AnchorError::Unresolvable(self.end.offset)),
                _ => Err(AnchorError::Unresolvable(self.start.offset)),
            };
        }

        let start = self.start.resolve(dom, Some(ResolveDirection::Forwards))?;
        let end = self.end.resolve(dom, Some(ResolveDirection::Backwards))?;
        Ok(DomRange::from_boundaries(dom, start, end))
    }

    pub fn from_range<D: Dom<Node = N>>(dom: &D, range: &DomRange<N>) -> Result<Self, AnchorError> {
        let start = TextPosition::from_point(dom, range.start_container, range.start_offset)?;
        let end = TextPosition::from_point(dom, range.end_container, range.end_offset)?;
        Ok(Self::new(start, end))
    }

    /// Both ends re-expressed as offsets into `element`.
    pub fn relative_to<D: Dom<Node = N>>(&self, dom: &D, element: N) -> Result<Self, AnchorError> {
        Ok(Self::new(
            self.start.relative_to(dom, element)?,
            self.end.relative_to(dom, element)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{BoundaryPoint, Document, NodeId};
    use pretty_assertions::assert_eq;

    fn doc() -> (Document, NodeId, Vec<NodeId>) {
        let doc = Document::parse(
            r#"<div id="r"><p id="a">Hello <em>brave</em> world</p><p id="gap"></p><p id="b">Again</p></div>"#,
        );
        let root = doc.element_by_id("r").unwrap();
        let texts = doc.text_nodes(root).collect();
        (doc, root, texts)
    }

    #[test]
    fn same_element_resolves_in_one_pass() {
        let (doc, root, t) = doc();
        let range = TextRange::from_offsets(root, 2, 8).to_range(&doc).unwrap();
        assert_eq!(range.start(), BoundaryPoint::new(t[0], 2));
        assert_eq!(range.end(), BoundaryPoint::new(t[1], 2));
        assert_eq!(range.text(&doc), "llo br");
    }

    #[test]
    fn same_element_end_past_text_fails() {
        let (doc, root, _) = doc();
        let err = TextRange::from_offsets(root, 2, 99).to_range(&doc).unwrap_err();
        assert_eq!(err, AnchorError::Unresolvable(99));
    }

    #[test]
    fn different_elements_resolve_independently() {
        let (doc, _, t) = doc();
        let a = doc.element_by_id("a").unwrap();
        let b = doc.element_by_id("b").unwrap();
        let range = TextRange::new(TextPosition::new(a, 6), TextPosition::new(b, 5))
            .to_range(&doc)
            .unwrap();
        assert_eq!(range.start(), BoundaryPoint::new(t[1], 0));
        assert_eq!(range.end(), BoundaryPoint::new(t[3], 5));
        assert_eq!(range.text(&doc), "brave worldAgain");
    }

    #[test]
    fn empty_endpoints_snap_outwards() {
        let (doc, _, t) = doc();
        let gap = doc.element_by_id("gap").unwrap();
        let b = doc.element_by_id("b").unwrap();

        let range = TextRange::new(TextPosition::new(gap, 0), TextPosition::new(b, 2))
            .to_range(&doc)
            .unwrap();
        assert_eq!(range.start(), BoundaryPoint::new(t[3], 0));

        let a = doc.element_by_id("a").unwrap();
        let range = TextRange::new(TextPosition::new(a, 0), TextPosition::new(gap, 0))
            .to_range(&doc)
            .unwrap();
        assert_eq!(range.end(), BoundaryPoint::new(t[2], 6));
        assert_eq!(range.text(&doc), "Hello brave world");
    }

    #[test]
    fn reversed_ends_collapse_onto_the_end() {
        let (doc, root, t) = doc();
        let range = TextRange::from_offsets(root, 10, 3).to_range(&doc).unwrap();
        assert!(range.is_collapsed());
        assert_eq!(range.start(), BoundaryPoint::new(t[0], 3));
    }

    #[test]
    fn from_range_and_relative_to() {
        let (doc, root, t) = doc();
        let a = doc.element_by_id("a").unwrap();
        let em = doc.child_at(a, 1).unwrap();
        let range = DomRange::new(BoundaryPoint::new(t[1], 1), BoundaryPoint::new(t[3], 2));

        let text_range = TextRange::from_range(&doc, &range).unwrap();
        let b = doc.element_by_id("b").unwrap();
        assert_eq!(text_range.start, TextPosition::new(em, 1));
        assert_eq!(text_range.end, TextPosition::new(b, 2));

        let rebased = text_range.relative_to(&doc, root).unwrap();
        assert_eq!(rebased, TextRange::from_offsets(root, 7, 19));
    }

    #[test]
    fn from_range_fails_when_an_end_is_invalid() {
        let (doc, _, t) = doc();
        let range = DomRange::new(BoundaryPoint::new(t[0], 0), BoundaryPoint::new(t[0], 40));
        assert!(TextRange::from_range(&doc, &range).is_err());
    }
}
