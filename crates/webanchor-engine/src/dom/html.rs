//! HTML parsing (html5ever) and serialization for [`Document`].

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::document::{Document, NodeId, Payload};
use super::Dom;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

impl Document {
    /// Parse a complete HTML document the way a browser would, including the
    /// implied `html`, `head` and `body` elements.
    pub fn parse(html: &str) -> Self {
        let rcdom = parse_document(RcDom::default(), Default::default()).one(html);
        let mut doc = Document::new();
        let root = doc.root();

        // children are pushed in reverse so the first one is popped first
        let mut stack: Vec<(Handle, NodeId)> = rcdom
            .document
            .children
            .borrow()
            .iter()
            .rev()
            .map(|child| (child.clone(), root))
            .collect();

        while let Some((handle, parent)) = stack.pop() {
            let payload = match &handle.data {
                NodeData::Document => continue,
                NodeData::Doctype { name, .. } => Payload::Doctype {
                    name: name.to_string(),
                },
                NodeData::Text { contents } => Payload::Text(contents.borrow().to_string()),
                NodeData::Comment { contents } => Payload::Comment(contents.to_string()),
                NodeData::Element { name, attrs, .. } => Payload::Element {
                    name: name.local.to_string(),
                    attrs: attrs
                        .borrow()
                        .iter()
                        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                        .collect(),
                },
                NodeData::ProcessingInstruction { target, contents } => {
                    Payload::ProcessingInstruction {
                        target: target.to_string(),
                        data: contents.to_string(),
                    }
                }
            };
            let id = doc.push(payload);
            doc.append_child(parent, id);
            for child in handle.children.borrow().iter().rev() {
                stack.push((child.clone(), id));
            }
        }

        doc
    }

    /// Serialize the whole document.
    pub fn to_html(&self) -> String {
        self.inner_html(self.root())
    }

    /// Serialize the children of `node`.
    pub fn inner_html(&self, node: NodeId) -> String {
        let raw = self
            .tag_name(node)
            .is_some_and(|name| RAW_TEXT_ELEMENTS.contains(&name));
        let mut out = String::new();
        for child in self.children(node) {
            self.write_node(child, raw, &mut out);
        }
        out
    }

    fn write_node(&self, node: NodeId, raw_text: bool, out: &mut String) {
        match self.payload(node) {
            Payload::Document => out.push_str(&self.inner_html(node)),
            Payload::Doctype { name } => {
                out.push_str("<!DOCTYPE ");
                out.push_str(name);
                out.push('>');
            }
            Payload::Text(data) if raw_text => out.push_str(data),
            Payload::Text(data) => out.push_str(&html_escape::encode_text(data)),
            Payload::Comment(data) => {
                out.push_str("<!--");
                out.push_str(data);
                out.push_str("-->");
            }
            Payload::ProcessingInstruction { target, data } => {
                out.push_str("<?");
                out.push_str(target);
                out.push(' ');
                out.push_str(data);
                out.push('>');
            }
            Payload::Element { name, attrs } => {
                out.push('<');
                out.push_str(name);
                for (key, value) in attrs {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    out.push_str(&html_escape::encode_double_quoted_attribute(value));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&name.as_str()) {
                    return;
                }
                out.push_str(&self.inner_html(node));
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeKind;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    fn body_of(doc: &Document) -> NodeId {
        doc.descendants(doc.root())
            .find(|&n| doc.tag_name(n) == Some("body"))
            .unwrap()
    }

    fn outer_html(doc: &Document, node: NodeId) -> String {
        let mut out = String::new();
        doc.write_node(node, false, &mut out);
        out
    }

    #[test]
    fn parse_adds_implied_structure() {
        let doc = Document::parse("<p>Hello <b>world</b></p>");
        let body = body_of(&doc);
        assert_eq!(doc.inner_html(body), "<p>Hello <b>world</b></p>");
        assert_eq!(doc.text_content(body), "Hello world");
    }

    #[test]
    fn attributes_and_entities_round_trip() {
        let doc = Document::parse(
            r#"<div id="parent-container" title="a &quot;b&quot;"><p>1 &lt; 2 &amp;&amp; x</p></div>"#,
        );
        let root = doc.element_by_id("parent-container").unwrap();
        assert_eq!(doc.attribute(root, "title"), Some("a \"b\""));
        assert_eq!(doc.text_content(root), "1 < 2 && x");
        assert_snapshot!(
            outer_html(&doc, root),
            @r#"<div id="parent-container" title="a &quot;b&quot;"><p>1 &lt; 2 &amp;&amp; x</p></div>"#
        );
    }

    #[test]
    fn void_and_raw_text_elements() {
        let doc = Document::parse("<p>a<br>b<img src=\"x.png\"></p><script>if (a < b) {}</script>");
        let body = body_of(&doc);
        assert_snapshot!(
            doc.inner_html(body),
            @r#"<p>a<br>b<img src="x.png"></p><script>if (a < b) {}</script>"#
        );
    }

    #[test]
    fn comments_and_doctype_survive() {
        let doc = Document::parse("<!DOCTYPE html><html><head></head><body><!-- note --><p>x</p></body></html>");
        assert_snapshot!(
            doc.to_html(),
            @"<!DOCTYPE html><html><head></head><body><!-- note --><p>x</p></body></html>"
        );
    }

    #[test]
    fn whitespace_text_nodes_are_kept() {
        let doc = Document::parse("<div id=\"r\">\n  <p>a</p>\n</div>");
        let root = doc.element_by_id("r").unwrap();
        let kinds: Vec<_> = doc.children(root).map(|n| doc.kind(n)).collect();
        assert_eq!(kinds, vec![NodeKind::Text, NodeKind::Element, NodeKind::Text]);
    }
}
