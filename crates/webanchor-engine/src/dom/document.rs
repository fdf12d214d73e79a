use super::{Dom, NodeKind, utf16_len, utf16_to_byte};
use crate::error::AnchorError;

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a node holds besides its links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Document,
    Doctype {
        name: String,
    },
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    Comment(String),
    ProcessingInstruction {
        target: String,
        data: String,
    },
}

#[derive(Debug, Clone)]
struct NodeData {
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    previous_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
    payload: Payload,
}

/// An arena-allocated HTML tree.
///
/// Nodes are never freed: detaching a node only unlinks it, so handles stay
/// valid (and point at orphaned subtrees) for the lifetime of the document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document containing only the document node.
    pub fn new() -> Self {
        let mut doc = Self { nodes: Vec::new() };
        doc.push(Payload::Document);
        doc
    }

    /// The document node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn payload(&self, node: NodeId) -> &Payload {
        &self.node(node).payload
    }

    fn node(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.index()]
    }

    fn node_mut(&mut self, node: NodeId) -> &mut NodeData {
        &mut self.nodes[node.index()]
    }

    /// Allocate an unattached node.
    pub fn push(&mut self, payload: Payload) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            parent: None,
            first_child: None,
            last_child: None,
            previous_sibling: None,
            next_sibling: None,
            payload,
        });
        id
    }

    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(Payload::Element {
            name: name.to_ascii_lowercase(),
            attrs: Vec::new(),
        })
    }

    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.push(Payload::Text(data.to_string()))
    }

    /// Unlink `node` from its parent and siblings. Its subtree stays intact.
    pub fn detach(&mut self, node: NodeId) {
        let NodeData {
            parent,
            previous_sibling,
            next_sibling,
            ..
        } = *self.node(node);

        match previous_sibling {
            Some(prev) => self.node_mut(prev).next_sibling = next_sibling,
            None => {
                if let Some(parent) = parent {
                    self.node_mut(parent).first_child = next_sibling;
                }
            }
        }
        match next_sibling {
            Some(next) => self.node_mut(next).previous_sibling = previous_sibling,
            None => {
                if let Some(parent) = parent {
                    self.node_mut(parent).last_child = previous_sibling;
                }
            }
        }

        let data = self.node_mut(node);
        data.parent = None;
        data.previous_sibling = None;
        data.next_sibling = None;
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    /// Insert `child` into `parent` before `reference`, or last when
    /// `reference` is `None`. `child` is detached from its old place first.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        self.detach(child);
        let previous = match reference {
            Some(reference) => self.node(reference).previous_sibling,
            None => self.node(parent).last_child,
        };

        {
            let data = self.node_mut(child);
            data.parent = Some(parent);
            data.previous_sibling = previous;
            data.next_sibling = reference;
        }
        match previous {
            Some(prev) => self.node_mut(prev).next_sibling = Some(child),
            None => self.node_mut(parent).first_child = Some(child),
        }
        match reference {
            Some(reference) => self.node_mut(reference).previous_sibling = Some(child),
            None => self.node_mut(parent).last_child = Some(child),
        }
    }

    /// Insert `new` as the sibling right after `node`. No-op for orphans.
    pub fn insert_after(&mut self, node: NodeId, new: NodeId) {
        if let Some(parent) = self.node(node).parent {
            let reference = self.node(node).next_sibling;
            self.insert_before(parent, new, reference);
        }
    }

    /// Split a text node at a UTF-16 `offset`, returning the new node that
    /// holds the tail. The new node is inserted right after `node`.
    ///
    /// An offset inside a surrogate pair splits after that character, so the
    /// head can end up one unit longer than `offset`.
    pub fn split_text(&mut self, node: NodeId, offset: usize) -> Result<NodeId, AnchorError> {
        let Payload::Text(data) = &self.node(node).payload else {
            return Err(AnchorError::UnsupportedNode {
                expected: "text",
                found: self.kind(node),
            });
        };
        let length = utf16_len(data);
        if offset > length {
            return Err(AnchorError::OffsetOutOfRange {
                offset,
                max: length,
            });
        }

        let byte = utf16_to_byte(data, offset);
        let tail = data[byte..].to_string();
        if let Payload::Text(data) = &mut self.node_mut(node).payload {
            data.truncate(byte);
        }
        let new = self.create_text(&tail);
        self.insert_after(node, new);
        Ok(new)
    }

    /// Replace `element` with its children.
    pub fn unwrap(&mut self, element: NodeId) {
        let Some(parent) = self.node(element).parent else {
            return;
        };
        while let Some(child) = self.node(element).first_child {
            self.insert_before(parent, child, Some(element));
        }
        self.detach(element);
    }

    /// Merge adjacent text nodes and drop empty ones below `node`.
    pub fn normalize(&mut self, node: NodeId) {
        let mut current = self.node(node).first_child;
        while let Some(child) = current {
            current = self.node(child).next_sibling;
            match self.kind(child) {
                NodeKind::Element => self.normalize(child),
                NodeKind::Text => {
                    while let Some(next) = current {
                        let Payload::Text(tail) = &self.node(next).payload else {
                            break;
                        };
                        let tail = tail.clone();
                        if let Payload::Text(data) = &mut self.node_mut(child).payload {
                            data.push_str(&tail);
                        }
                        current = self.node(next).next_sibling;
                        self.detach(next);
                    }
                    if self.data(child).is_some_and(str::is_empty) {
                        self.detach(child);
                    }
                }
                _ => {}
            }
        }
    }

    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) {
        if let Payload::Element { attrs, .. } = &mut self.node_mut(element).payload {
            match attrs.iter_mut().find(|(n, _)| n == name) {
                Some((_, v)) => *v = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn attributes(&self, element: NodeId) -> &[(String, String)] {
        match &self.node(element).payload {
            Payload::Element { attrs, .. } => attrs,
            _ => &[],
        }
    }

    /// First element in document order whose `id` attribute is `id`.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .find(|&n| self.attribute(n, "id") == Some(id))
    }

    /// Elements whose `class` attribute lists `class_name`, in document order.
    pub fn elements_by_class(&self, class_name: &str) -> Vec<NodeId> {
        self.descendants(self.root())
            .filter(|&n| {
                self.attribute(n, "class")
                    .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class_name))
            })
            .collect()
    }
}

impl Dom for Document {
    type Node = NodeId;

    fn kind(&self, node: NodeId) -> NodeKind {
        match self.node(node).payload {
            Payload::Document => NodeKind::Document,
            Payload::Doctype { .. } => NodeKind::Doctype,
            Payload::Element { .. } => NodeKind::Element,
            Payload::Text(_) => NodeKind::Text,
            Payload::Comment(_) => NodeKind::Comment,
            Payload::ProcessingInstruction { .. } => NodeKind::ProcessingInstruction,
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).first_child
    }

    fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).last_child
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).next_sibling
    }

    fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).previous_sibling
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).payload {
            Payload::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    fn data(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).payload {
            Payload::Text(data) | Payload::Comment(data) => Some(data),
            Payload::ProcessingInstruction { data, .. } => Some(data),
            _ => None,
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.attributes(node)
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
