//! Native-range analogue: a pair of boundary points in a [`Dom`] tree.

use std::cmp::Ordering;

use super::{Dom, NodeKind, utf16_slice};

/// A `(node, offset)` position. The offset is a UTF-16 index into text
/// nodes and a child index into every other node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundaryPoint<N> {
    pub node: N,
    pub offset: usize,
}

impl<N> BoundaryPoint<N> {
    pub fn new(node: N, offset: usize) -> Self {
        Self { node, offset }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomRange<N> {
    pub start_container: N,
    pub start_offset: usize,
    pub end_container: N,
    pub end_offset: usize,
}

impl<N: Copy + Eq> DomRange<N> {
    /// A range between two points, taken as given.
    pub fn new(start: BoundaryPoint<N>, end: BoundaryPoint<N>) -> Self {
        Self {
            start_container: start.node,
            start_offset: start.offset,
            end_container: end.node,
            end_offset: end.offset,
        }
    }

    pub fn collapsed(point: BoundaryPoint<N>) -> Self {
        Self::new(point, point)
    }

    /// Set the start, then the end: an end before the start collapses the
    /// range onto the end.
    pub fn from_boundaries<D: Dom<Node = N>>(
        dom: &D,
        start: BoundaryPoint<N>,
        end: BoundaryPoint<N>,
    ) -> Self {
        if compare_boundary_points(dom, end, start) == Ordering::Less {
            Self::collapsed(end)
        } else {
            Self::new(start, end)
        }
    }

    pub fn start(&self) -> BoundaryPoint<N> {
        BoundaryPoint::new(self.start_container, self.start_offset)
    }

    pub fn end(&self) -> BoundaryPoint<N> {
        BoundaryPoint::new(self.end_container, self.end_offset)
    }

    pub fn is_collapsed(&self) -> bool {
        self.start() == self.end()
    }

    /// Deepest node containing both containers.
    pub fn common_ancestor<D: Dom<Node = N>>(&self, dom: &D) -> N {
        let mut container = self.start_container;
        while !dom.contains(container, self.end_container) {
            match dom.parent(container) {
                Some(parent) => container = parent,
                None => break,
            }
        }
        container
    }

    /// `Less` when the point is before the range, `Greater` when after it,
    /// `Equal` when inside (boundaries included).
    pub fn compare_point<D: Dom<Node = N>>(&self, dom: &D, node: N, offset: usize) -> Ordering {
        let point = BoundaryPoint::new(node, offset);
        if compare_boundary_points(dom, point, self.start()) == Ordering::Less {
            Ordering::Less
        } else if compare_boundary_points(dom, point, self.end()) == Ordering::Greater {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// The selected text, as `Range.toString()` reports it.
    pub fn text<D: Dom<Node = N>>(&self, dom: &D) -> String {
        if self.start_container == self.end_container
            && let Some(data) = text_data(dom, self.start_container)
        {
            return utf16_slice(data, self.start_offset, self.end_offset).to_string();
        }

        let mut out = String::new();
        if let Some(data) = text_data(dom, self.start_container) {
            out.push_str(utf16_slice(data, self.start_offset, usize::MAX));
        }
        for text in dom.text_nodes(self.common_ancestor(dom)) {
            if text == self.start_container || text == self.end_container {
                continue;
            }
            let length = dom.text_length(text);
            let contained = compare_boundary_points(dom, BoundaryPoint::new(text, 0), self.start())
                != Ordering::Less
                && compare_boundary_points(dom, BoundaryPoint::new(text, length), self.end())
                    != Ordering::Greater;
            if contained && let Some(data) = dom.data(text) {
                out.push_str(data);
            }
        }
        if let Some(data) = text_data(dom, self.end_container) {
            out.push_str(utf16_slice(data, 0, self.end_offset));
        }
        out
    }

    /// Move the boundaries the way a live range follows `node` being split
    /// at `offset` into `node` and `new_node`. `parent` and `index` locate
    /// `node` before the split.
    pub fn follow_split(
        &mut self,
        node: N,
        new_node: N,
        offset: usize,
        parent: Option<N>,
        index: usize,
    ) {
        if self.start_container == node && self.start_offset > offset {
            self.start_container = new_node;
            self.start_offset -= offset;
        }
        if self.end_container == node && self.end_offset > offset {
            self.end_container = new_node;
            self.end_offset -= offset;
        }
        if let Some(parent) = parent {
            if self.start_container == parent && self.start_offset == index + 1 {
                self.start_offset += 1;
            }
            if self.end_container == parent && self.end_offset == index + 1 {
                self.end_offset += 1;
            }
        }
    }
}

fn text_data<D: Dom>(dom: &D, node: D::Node) -> Option<&str> {
    if dom.kind(node) == NodeKind::Text {
        dom.data(node)
    } else {
        None
    }
}

/// Relative position of two boundary points in the same tree.
pub fn compare_boundary_points<D: Dom>(
    dom: &D,
    a: BoundaryPoint<D::Node>,
    b: BoundaryPoint<D::Node>,
) -> Ordering {
    if a.node == b.node {
        return a.offset.cmp(&b.offset);
    }
    if dom.document_order(a.node, b.node) == Ordering::Greater {
        return compare_boundary_points(dom, b, a).reverse();
    }
    if dom.contains(a.node, b.node) {
        let mut child = b.node;
        while let Some(parent) = dom.parent(child) {
            if parent == a.node {
                break;
            }
            child = parent;
        }
        if dom.index_in_parent(child) < a.offset {
            return Ordering::Greater;
        }
    }
    Ordering::Less
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, NodeId};
    use pretty_assertions::assert_eq;

    struct Fixture {
        doc: Document,
        root: NodeId,
        p1: NodeId,
        ab: NodeId,
        cd: NodeId,
        ef: NodeId,
    }

    // <div id="r"><p>ab<b>cd</b></p><p>ef</p></div>
    fn fixture() -> Fixture {
        let doc = Document::parse(r#"<div id="r"><p>ab<b>cd</b></p><p>ef</p></div>"#);
        let root = doc.element_by_id("r").unwrap();
        let p1 = doc.child_at(root, 0).unwrap();
        let texts: Vec<_> = doc.text_nodes(root).collect();
        Fixture {
            root,
            p1,
            ab: texts[0],
            cd: texts[1],
            ef: texts[2],
            doc,
        }
    }

    #[test]
    fn boundary_points_in_same_node_compare_offsets() {
        let f = fixture();
        let a = BoundaryPoint::new(f.ab, 1);
        let b = BoundaryPoint::new(f.ab, 2);
        assert_eq!(compare_boundary_points(&f.doc, a, b), Ordering::Less);
        assert_eq!(compare_boundary_points(&f.doc, b, a), Ordering::Greater);
        assert_eq!(compare_boundary_points(&f.doc, a, a), Ordering::Equal);
    }

    #[test]
    fn ancestor_offsets_compare_against_child_index() {
        let f = fixture();
        // (p1, 1) sits between "ab" and <b>
        let between = BoundaryPoint::new(f.p1, 1);
        assert_eq!(
            compare_boundary_points(&f.doc, between, BoundaryPoint::new(f.ab, 2)),
            Ordering::Greater
        );
        assert_eq!(
            compare_boundary_points(&f.doc, between, BoundaryPoint::new(f.cd, 0)),
            Ordering::Less
        );
        assert_eq!(
            compare_boundary_points(&f.doc, BoundaryPoint::new(f.cd, 0), between),
            Ordering::Greater
        );
    }

    #[test]
    fn compare_point_and_common_ancestor() {
        let f = fixture();
        let range = DomRange::new(BoundaryPoint::new(f.ab, 1), BoundaryPoint::new(f.cd, 1));
        assert_eq!(range.compare_point(&f.doc, f.ab, 0), Ordering::Less);
        assert_eq!(range.compare_point(&f.doc, f.ab, 1), Ordering::Equal);
        assert_eq!(range.compare_point(&f.doc, f.cd, 2), Ordering::Greater);
        assert_eq!(range.common_ancestor(&f.doc), f.p1);
    }

    #[test]
    fn text_spans_partial_and_whole_nodes() {
        let f = fixture();
        let range = DomRange::new(BoundaryPoint::new(f.ab, 1), BoundaryPoint::new(f.ef, 1));
        assert_eq!(range.text(&f.doc), "bcde");
        assert_eq!(range.common_ancestor(&f.doc), f.root);

        let single = DomRange::new(BoundaryPoint::new(f.cd, 0), BoundaryPoint::new(f.cd, 1));
        assert_eq!(single.text(&f.doc), "c");

        let elements = DomRange::new(BoundaryPoint::new(f.root, 0), BoundaryPoint::new(f.root, 2));
        assert_eq!(elements.text(&f.doc), "abcdef");
    }

    #[test]
    fn from_boundaries_collapses_backwards_ranges() {
        let f = fixture();
        let start = BoundaryPoint::new(f.ef, 1);
        let end = BoundaryPoint::new(f.ab, 0);
        let range = DomRange::from_boundaries(&f.doc, start, end);
        assert!(range.is_collapsed());
        assert_eq!(range.start(), end);

        let forward = DomRange::from_boundaries(&f.doc, end, start);
        assert_eq!(forward, DomRange::new(end, start));
    }

    #[test]
    fn follow_split_moves_boundaries_past_the_split() {
        let mut doc = Document::parse(r#"<p id="p">abcdef</p>"#);
        let p = doc.element_by_id("p").unwrap();
        let text = doc.first_child(p).unwrap();
        let mut range = DomRange::new(BoundaryPoint::new(text, 2), BoundaryPoint::new(text, 5));

        let tail = doc.split_text(text, 2).unwrap();
        range.follow_split(text, tail, 2, Some(p), 0);
        assert_eq!(range.start(), BoundaryPoint::new(text, 2));
        assert_eq!(range.end(), BoundaryPoint::new(tail, 3));
        assert_eq!(range.text(&doc), "cde");
    }
}
