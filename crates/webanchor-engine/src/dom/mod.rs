//! # DOM adapter
//!
//! The anchoring algorithms only need read access to a DOM-like tree: node
//! kinds, parent/child/sibling links, element names and attributes, and the
//! character data of text nodes. [`Dom`] captures exactly that, so the same
//! code runs against a browser bridge, a parsed HTML file ([`Document`]) or
//! any other tree the host keeps around.
//!
//! Node handles are small `Copy` values owned by the tree. Anchors hold
//! handles, never nodes, and are only meaningful while the tree they were
//! created from is unchanged.
//!
//! ## Offsets
//!
//! Every length and offset in this crate counts UTF-16 code units, the unit
//! of `String.length` in the web view that produced (or will consume) the
//! anchors. Use [`utf16_len`] and [`utf16_to_byte`] when slicing Rust
//! strings.

pub mod document;
pub mod html;
pub mod range;

use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::Hash;

pub use document::{Document, NodeId, Payload};
pub use range::{BoundaryPoint, DomRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Doctype,
    Element,
    Text,
    Comment,
    ProcessingInstruction,
}

/// Read access to a DOM-like tree.
///
/// Implementors provide the structural links; everything else (iteration,
/// text lengths, document order) is derived from them.
pub trait Dom {
    /// Handle to a node in the tree.
    type Node: Copy + Eq + Hash + Debug;

    fn kind(&self, node: Self::Node) -> NodeKind;
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;
    fn first_child(&self, node: Self::Node) -> Option<Self::Node>;
    fn last_child(&self, node: Self::Node) -> Option<Self::Node>;
    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;
    fn previous_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    /// Lowercase local name of an element, `None` for other nodes.
    fn tag_name(&self, node: Self::Node) -> Option<&str>;

    /// Character data of text and comment nodes.
    fn data(&self, node: Self::Node) -> Option<&str>;

    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;

    fn children(&self, node: Self::Node) -> Children<'_, Self> {
        Children {
            dom: self,
            next: self.first_child(node),
        }
    }

    fn child_count(&self, node: Self::Node) -> usize {
        self.children(node).count()
    }

    fn child_at(&self, node: Self::Node, index: usize) -> Option<Self::Node> {
        self.children(node).nth(index)
    }

    /// Position of `node` among its parent's children (0 for the root).
    fn index_in_parent(&self, node: Self::Node) -> usize {
        let mut index = 0;
        let mut current = self.previous_sibling(node);
        while let Some(sibling) = current {
            index += 1;
            current = self.previous_sibling(sibling);
        }
        index
    }

    fn parent_element(&self, node: Self::Node) -> Option<Self::Node> {
        self.parent(node)
            .filter(|&parent| self.kind(parent) == NodeKind::Element)
    }

    /// `node` and everything below it, in pre-order.
    fn descendants(&self, node: Self::Node) -> Descendants<'_, Self> {
        Descendants {
            dom: self,
            root: node,
            next: Some(node),
        }
    }

    /// Text nodes below `node` (inclusive) in document order.
    fn text_nodes(&self, node: Self::Node) -> impl Iterator<Item = Self::Node> + '_ {
        self.descendants(node)
            .filter(move |&n| self.kind(n) == NodeKind::Text)
    }

    /// Inclusive ancestor test: true when `node` is `ancestor` or below it.
    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Length of `textContent` in UTF-16 code units for elements and text
    /// nodes, 0 for every other kind.
    fn text_length(&self, node: Self::Node) -> usize {
        match self.kind(node) {
            NodeKind::Text => self.data(node).map_or(0, utf16_len),
            NodeKind::Element => self
                .text_nodes(node)
                .map(|text| self.data(text).map_or(0, utf16_len))
                .sum(),
            _ => 0,
        }
    }

    fn text_content(&self, node: Self::Node) -> String {
        self.text_nodes(node)
            .filter_map(|text| self.data(text))
            .collect()
    }

    /// The DOM `nodeName`, with element names in lowercase.
    fn node_name(&self, node: Self::Node) -> String {
        match self.kind(node) {
            NodeKind::Document => "#document".to_string(),
            NodeKind::Doctype => "#doctype".to_string(),
            NodeKind::Text => "#text".to_string(),
            NodeKind::Comment => "#comment".to_string(),
            NodeKind::ProcessingInstruction => "#processing-instruction".to_string(),
            NodeKind::Element => self.tag_name(node).unwrap_or_default().to_ascii_lowercase(),
        }
    }

    /// Next node in document order across the whole tree.
    fn next_in_document(&self, node: Self::Node) -> Option<Self::Node> {
        if let Some(child) = self.first_child(node) {
            return Some(child);
        }
        next_skipping_children(self, node, None)
    }

    /// Previous node in document order across the whole tree.
    fn previous_in_document(&self, node: Self::Node) -> Option<Self::Node> {
        let Some(mut current) = self.previous_sibling(node) else {
            return self.parent(node);
        };
        while let Some(last) = self.last_child(current) {
            current = last;
        }
        Some(current)
    }

    /// Tree order of two nodes: ancestors precede their descendants.
    fn document_order(&self, a: Self::Node, b: Self::Node) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        let path_a = index_path(self, a);
        let path_b = index_path(self, b);
        path_a.cmp(&path_b)
    }
}

/// Indexes of `node` and its ancestors from the top of the tree down.
fn index_path<D: Dom + ?Sized>(dom: &D, node: D::Node) -> Vec<usize> {
    let mut path = Vec::new();
    let mut current = node;
    while let Some(parent) = dom.parent(current) {
        path.push(dom.index_in_parent(current));
        current = parent;
    }
    path.reverse();
    path
}

/// Following node in pre-order once `node`'s subtree is done, staying
/// inside `root` when given.
fn next_skipping_children<D: Dom + ?Sized>(
    dom: &D,
    node: D::Node,
    root: Option<D::Node>,
) -> Option<D::Node> {
    let mut current = node;
    loop {
        if Some(current) == root {
            return None;
        }
        if let Some(sibling) = dom.next_sibling(current) {
            return Some(sibling);
        }
        current = dom.parent(current)?;
    }
}

pub struct Children<'a, D: Dom + ?Sized> {
    dom: &'a D,
    next: Option<D::Node>,
}

impl<D: Dom + ?Sized> Iterator for Children<'_, D> {
    type Item = D::Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = self.dom.next_sibling(node);
        Some(node)
    }
}

/// Pre-order walk of a subtree, root included.
pub struct Descendants<'a, D: Dom + ?Sized> {
    dom: &'a D,
    root: D::Node,
    next: Option<D::Node>,
}

impl<D: Dom + ?Sized> Iterator for Descendants<'_, D> {
    type Item = D::Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = match self.dom.first_child(node) {
            Some(child) => Some(child),
            None => next_skipping_children(self.dom, node, Some(self.root)),
        };
        Some(node)
    }
}

/// Length of `s` in UTF-16 code units.
pub fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Byte index of the UTF-16 `offset` in `s`.
///
/// Offsets past the end clamp to `s.len()`; an offset inside a surrogate
/// pair rounds up to the end of that character.
pub fn utf16_to_byte(s: &str, offset: usize) -> usize {
    let mut units = 0;
    for (byte, ch) in s.char_indices() {
        if units >= offset {
            return byte;
        }
        units += ch.len_utf16();
    }
    s.len()
}

/// Substring of `s` between two UTF-16 offsets.
pub fn utf16_slice(s: &str, start: usize, end: usize) -> &str {
    let start = utf16_to_byte(s, start);
    let end = utf16_to_byte(s, end).max(start);
    &s[start..end]
}
