use std::fmt::Debug;

use crate::anchoring::utils::{previous_siblings_text_length, resolve_offsets};
use crate::dom::{BoundaryPoint, Dom, NodeKind};
use crate::error::AnchorError;

/// Which way to look for text when a position sits in an element that has
/// none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveDirection {
    /// Snap to the start of the next text node in the document.
    Forwards,
    /// Snap to the end of the previous text node in the document.
    Backwards,
}

/// A character offset into the text content of an element.
///
/// `offset` counts UTF-16 code units of the concatenated text of every text
/// node below `element`, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextPosition<N> {
    pub element: N,
    pub offset: usize,
}

impl<N: Copy + Eq + Debug> TextPosition<N> {
    pub fn new(element: N, offset: usize) -> Self {
        Self { element, offset }
    }

    /// Find the text node and local offset this position points at.
    ///
    /// With a direction, a position at offset 0 of an element without text
    /// falls back to the nearest text node after (or before) the element.
    pub fn resolve<D: Dom<Node = N>>(
        &self,
        dom: &D,
        direction: Option<ResolveDirection>,
    ) -> Result<BoundaryPoint<N>, AnchorError> {
        if let Some(point) = resolve_offsets(dom, self.element, &[self.offset])
            .into_iter()
            .next()
        {
            return Ok(point);
        }

        match direction {
            Some(direction) if self.offset == 0 => {
                nearest_text(dom, self.element, direction).ok_or(AnchorError::Unresolvable(0))
            }
            _ => Err(AnchorError::Unresolvable(self.offset)),
        }
    }

    /// Build a position from a node and an offset: text nodes go through
    /// [`TextPosition::from_point`], elements are taken as they are.
    pub fn from_char_offset<D: Dom<Node = N>>(
        dom: &D,
        node: N,
        offset: usize,
    ) -> Result<Self, AnchorError> {
        match dom.kind(node) {
            NodeKind::Text => Self::from_point(dom, node, offset),
            NodeKind::Element => Ok(Self::new(node, offset)),
            found => {
                log::error!("cannot build a text position from a {found:?} node");
                Err(AnchorError::UnsupportedNode {
                    expected: "text or element",
                    found,
                })
            }
        }
    }

    /// Convert a selection-style boundary point (character index in a text
    /// node, child index in an element) into a text position.
    pub fn from_point<D: Dom<Node = N>>(
        dom: &D,
        node: N,
        offset: usize,
    ) -> Result<Self, AnchorError> {
        match dom.kind(node) {
            NodeKind::Text => {
                let max = dom.text_length(node);
                if offset > max {
                    log::error!("text offset {offset} is past the end ({max}) of {node:?}");
                    return Err(AnchorError::OffsetOutOfRange { offset, max });
                }
                let parent = dom.parent_element(node).ok_or_else(|| {
                    log::error!("text node {node:?} has no parent element");
                    AnchorError::NoParentElement
                })?;
                let offset = offset + previous_siblings_text_length(dom, node);
                Ok(Self::new(parent, offset))
            }
            NodeKind::Element => {
                let max = dom.child_count(node);
                if offset > max {
                    log::error!("child offset {offset} is past the end ({max}) of {node:?}");
                    return Err(AnchorError::OffsetOutOfRange { offset, max });
                }
                let length = dom
                    .children(node)
                    .take(offset)
                    .map(|child| dom.text_length(child))
                    .sum();
                Ok(Self::new(node, length))
            }
            found => {
                log::error!("cannot build a text position from a {found:?} point");
                Err(AnchorError::UnsupportedNode {
                    expected: "text or element",
                    found,
                })
            }
        }
    }

    /// The same position expressed as an offset into `parent`, which must be
    /// an ancestor of (or equal to) this position's element.
    pub fn relative_to<D: Dom<Node = N>>(&self, dom: &D, parent: N) -> Result<Self, AnchorError> {
        if !dom.contains(parent, self.element) {
            return Err(AnchorError::NotAncestor);
        }

        let mut element = self.element;
        let mut offset = self.offset;
        while element != parent {
            offset += previous_siblings_text_length(dom, element);
            element = dom.parent(element).ok_or(AnchorError::NotAncestor)?;
        }
        Ok(Self::new(parent, offset))
    }
}

fn nearest_text<D: Dom>(
    dom: &D,
    element: D::Node,
    direction: ResolveDirection,
) -> Option<BoundaryPoint<D::Node>> {
    let mut current = element;
    loop {
        current = match direction {
            ResolveDirection::Forwards => dom.next_in_document(current)?,
            ResolveDirection::Backwards => dom.previous_in_document(current)?,
        };
        if dom.kind(current) == NodeKind::Text {
            let offset = match direction {
                ResolveDirection::Forwards => 0,
                ResolveDirection::Backwards => dom.text_length(current),
            };
            return Some(BoundaryPoint::new(current, offset));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, NodeId};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    // <div id="r"><p>ab<b>cd</b></p><p id="empty"></p><p>ef</p></div>
    fn doc() -> (Document, NodeId) {
        let doc = Document::parse(
            r#"<div id="r"><p id="first">ab<b>cd</b></p><p id="empty"></p><p>ef</p></div>"#,
        );
        let root = doc.element_by_id("r").unwrap();
        (doc, root)
    }

    fn texts(doc: &Document, root: NodeId) -> Vec<NodeId> {
        doc.text_nodes(root).collect()
    }

    #[test]
    fn resolve_walks_nested_text() {
        let (doc, root) = doc();
        let t = texts(&doc, root);
        let point = TextPosition::new(root, 3).resolve(&doc, None).unwrap();
        assert_eq!(point, BoundaryPoint::new(t[1], 1));
        let point = TextPosition::new(root, 6).resolve(&doc, None).unwrap();
        assert_eq!(point, BoundaryPoint::new(t[2], 2));
    }

    #[test]
    fn resolve_past_the_end_fails() {
        let (doc, root) = doc();
        let err = TextPosition::new(root, 7).resolve(&doc, None).unwrap_err();
        assert_eq!(err, AnchorError::Unresolvable(7));
    }

    #[rstest]
    #[case(ResolveDirection::Forwards, 2, 0)]
    #[case(ResolveDirection::Backwards, 1, 2)]
    fn empty_element_snaps_in_direction(
        #[case] direction: ResolveDirection,
        #[case] node: usize,
        #[case] offset: usize,
    ) {
        let (doc, root) = doc();
        let t = texts(&doc, root);
        let empty = doc.element_by_id("empty").unwrap();
        let point = TextPosition::new(empty, 0)
            .resolve(&doc, Some(direction))
            .unwrap();
        assert_eq!(point, BoundaryPoint::new(t[node], offset));
    }

    #[test]
    fn empty_element_without_direction_fails() {
        let (doc, _) = doc();
        let empty = doc.element_by_id("empty").unwrap();
        assert!(TextPosition::new(empty, 0).resolve(&doc, None).is_err());
        let err = TextPosition::new(empty, 1)
            .resolve(&doc, Some(ResolveDirection::Forwards))
            .unwrap_err();
        assert_eq!(err, AnchorError::Unresolvable(1));
    }

    #[test]
    fn forwards_fallback_at_document_end_fails() {
        let doc = Document::parse(r#"<p>x</p><div id="last"></div>"#);
        let last = doc.element_by_id("last").unwrap();
        let result = TextPosition::new(last, 0).resolve(&doc, Some(ResolveDirection::Forwards));
        assert_eq!(result, Err(AnchorError::Unresolvable(0)));
    }

    #[test]
    fn from_point_on_text_adds_previous_siblings() {
        let (doc, _) = doc();
        let first = doc.element_by_id("first").unwrap();
        let b = doc.last_child(first).unwrap();
        let cd = doc.first_child(b).unwrap();
        let ab = doc.first_child(first).unwrap();

        assert_eq!(
            TextPosition::from_point(&doc, ab, 1),
            Ok(TextPosition::new(first, 1))
        );
        // "cd" is the only child of <b>, so its offset stays local
        assert_eq!(
            TextPosition::from_point(&doc, cd, 2),
            Ok(TextPosition::new(b, 2))
        );
        assert_eq!(
            TextPosition::from_point(&doc, ab, 3),
            Err(AnchorError::OffsetOutOfRange { offset: 3, max: 2 })
        );
    }

    #[test]
    fn from_point_on_element_boundaries() {
        let (doc, root) = doc();
        let count = doc.child_count(root);
        assert_eq!(
            TextPosition::from_point(&doc, root, 0),
            Ok(TextPosition::new(root, 0))
        );
        assert_eq!(
            TextPosition::from_point(&doc, root, count),
            Ok(TextPosition::new(root, doc.text_length(root)))
        );
        assert_eq!(
            TextPosition::from_point(&doc, root, 1),
            Ok(TextPosition::new(root, 4))
        );
        assert!(TextPosition::from_point(&doc, root, count + 1).is_err());
    }

    #[test]
    fn from_point_rejects_other_nodes() {
        let doc = Document::parse(r#"<p id="p"><!--c-->x</p>"#);
        let p = doc.element_by_id("p").unwrap();
        let comment = doc.first_child(p).unwrap();
        let err = TextPosition::from_point(&doc, comment, 0).unwrap_err();
        assert!(matches!(err, AnchorError::UnsupportedNode { found: NodeKind::Comment, .. }));
        assert!(TextPosition::from_point(&doc, doc.root(), 0).is_err());
    }

    #[test]
    fn text_node_without_parent_element() {
        let mut doc = Document::new();
        let text = doc.create_text("orphan");
        doc.append_child(doc.root(), text);
        assert_eq!(
            TextPosition::from_point(&doc, text, 1),
            Err(AnchorError::NoParentElement)
        );
    }

    #[test]
    fn from_char_offset_dispatches_on_kind() {
        let (doc, root) = doc();
        let t = texts(&doc, root);
        let first = doc.element_by_id("first").unwrap();
        assert_eq!(
            TextPosition::from_char_offset(&doc, t[0], 2),
            Ok(TextPosition::new(first, 2))
        );
        // element offsets are character offsets here, not child indexes
        assert_eq!(
            TextPosition::from_char_offset(&doc, root, 5),
            Ok(TextPosition::new(root, 5))
        );
    }

    #[test]
    fn relative_to_accumulates_up_the_chain() {
        let (doc, root) = doc();
        let first = doc.element_by_id("first").unwrap();
        let b = doc.last_child(first).unwrap();
        let position = TextPosition::new(b, 1).relative_to(&doc, root).unwrap();
        assert_eq!(position, TextPosition::new(root, 3));

        let same = TextPosition::new(b, 1).relative_to(&doc, b).unwrap();
        assert_eq!(same, TextPosition::new(b, 1));
    }

    #[test]
    fn relative_to_non_ancestor_is_a_contract_violation() {
        let (doc, _) = doc();
        let first = doc.element_by_id("first").unwrap();
        let leaf = doc.last_child(first).unwrap();
        let unrelated = doc.element_by_id("empty").unwrap();
        let err = TextPosition::new(leaf, 0)
            .relative_to(&doc, unrelated)
            .unwrap_err();
        assert_eq!(err, AnchorError::NotAncestor);
        assert!(err.is_contract_violation());
    }
}
