use crate::dom::{BoundaryPoint, Dom};

/// `textContent` length of elements and text nodes, 0 otherwise.
pub fn node_text_length<D: Dom>(dom: &D, node: D::Node) -> usize {
    dom.text_length(node)
}

/// Combined text length of every sibling before `node`.
pub fn previous_siblings_text_length<D: Dom>(dom: &D, node: D::Node) -> usize {
    let mut length = 0;
    let mut sibling = dom.previous_sibling(node);
    while let Some(s) = sibling {
        length += node_text_length(dom, s);
        sibling = dom.previous_sibling(s);
    }
    length
}

/// Map text offsets within `element` to `(text node, local offset)` points
/// in one pass over its text nodes.
///
/// `offsets` must be sorted ascending. An offset equal to the total text
/// length resolves to the end of the last text node. Offsets that cannot be
/// matched are logged and left out, so the result can be shorter than the
/// input.
pub fn resolve_offsets<D: Dom>(
    dom: &D,
    element: D::Node,
    offsets: &[usize],
) -> Vec<BoundaryPoint<D::Node>> {
    let mut results = Vec::with_capacity(offsets.len());
    let mut pending = offsets.iter().copied().peekable();
    let mut length = 0;
    let mut last = None;

    for text in dom.text_nodes(element) {
        let text_length = dom.text_length(text);
        while let Some(&offset) = pending.peek() {
            if length + text_length <= offset {
                break;
            }
            results.push(BoundaryPoint::new(text, offset - length));
            pending.next();
        }
        length += text_length;
        last = Some((text, text_length));
    }

    if let Some((text, text_length)) = last {
        while pending.next_if_eq(&length).is_some() {
            results.push(BoundaryPoint::new(text, text_length));
        }
    }

    for offset in pending {
        log::error!("text offset {offset} exceeds the text length {length} of {element:?}");
    }
    results
}
