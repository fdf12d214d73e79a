//! Location path evaluation over a [`Dom`].
//!
//! Attributes are not nodes in the adapter, so the `attribute` axis selects
//! nothing; attribute predicates read values through [`Dom::attribute`].

use std::collections::HashSet;

use webanchor_xpath::ast::{Axis, LocationPath, NodeTest, Predicate, Step};

use crate::dom::{Dom, NodeKind};

/// Every node `path` selects from `context`, in document order.
pub fn evaluate<D: Dom>(dom: &D, path: &LocationPath, context: D::Node) -> Vec<D::Node> {
    let start = if path.absolute {
        tree_root(dom, context)
    } else {
        context
    };

    let mut current = vec![start];
    for step in &path.steps {
        let mut seen = HashSet::new();
        let mut next = Vec::new();
        for &node in &current {
            for selected in apply_step(dom, step, node) {
                if seen.insert(selected) {
                    next.push(selected);
                }
            }
        }
        next.sort_by(|&a, &b| dom.document_order(a, b));
        current = next;
        if current.is_empty() {
            break;
        }
    }
    current
}

fn tree_root<D: Dom>(dom: &D, node: D::Node) -> D::Node {
    let mut current = node;
    while let Some(parent) = dom.parent(current) {
        current = parent;
    }
    current
}

fn apply_step<D: Dom>(dom: &D, step: &Step, node: D::Node) -> Vec<D::Node> {
    let mut selected: Vec<D::Node> = axis_nodes(dom, step.axis, node)
        .into_iter()
        .filter(|&n| matches_test(dom, &step.test, n))
        .collect();
    for predicate in &step.predicates {
        selected = apply_predicate(dom, predicate, selected);
    }
    selected
}

/// Nodes along `axis` in proximity order: nearest first for reverse axes.
fn axis_nodes<D: Dom>(dom: &D, axis: Axis, node: D::Node) -> Vec<D::Node> {
    match axis {
        Axis::Child => dom.children(node).collect(),
        Axis::Descendant => dom.descendants(node).skip(1).collect(),
        Axis::DescendantOrSelf => dom.descendants(node).collect(),
        Axis::SelfNode => vec![node],
        Axis::Parent => dom.parent(node).into_iter().collect(),
        Axis::Ancestor => std::iter::successors(dom.parent(node), |&n| dom.parent(n)).collect(),
        Axis::AncestorOrSelf => std::iter::successors(Some(node), |&n| dom.parent(n)).collect(),
        Axis::FollowingSibling => {
            std::iter::successors(dom.next_sibling(node), |&n| dom.next_sibling(n)).collect()
        }
        Axis::PrecedingSibling => {
            std::iter::successors(dom.previous_sibling(node), |&n| dom.previous_sibling(n))
                .collect()
        }
        Axis::Attribute => Vec::new(),
    }
}

fn matches_test<D: Dom>(dom: &D, test: &NodeTest, node: D::Node) -> bool {
    let kind = dom.kind(node);
    match test {
        NodeTest::Name(name) => {
            kind == NodeKind::Element
                && dom
                    .tag_name(node)
                    .is_some_and(|tag| tag.eq_ignore_ascii_case(name))
        }
        NodeTest::Wildcard => kind == NodeKind::Element,
        NodeTest::Text => kind == NodeKind::Text,
        NodeTest::Comment => kind == NodeKind::Comment,
        NodeTest::Node => true,
    }
}

fn apply_predicate<D: Dom>(dom: &D, predicate: &Predicate, nodes: Vec<D::Node>) -> Vec<D::Node> {
    match predicate {
        Predicate::Position(position) => position
            .checked_sub(1)
            .and_then(|index| nodes.get(index).copied())
            .into_iter()
            .collect(),
        Predicate::Last => nodes.last().copied().into_iter().collect(),
        Predicate::HasAttribute(name) => nodes
            .into_iter()
            .filter(|&n| dom.attribute(n, name).is_some())
            .collect(),
        Predicate::AttributeEquals { name, value } => nodes
            .into_iter()
            .filter(|&n| dom.attribute(n, name) == Some(value.as_str()))
            .collect(),
        Predicate::AttributeNotEquals { name, value } => nodes
            .into_iter()
            .filter(|&n| dom.attribute(n, name).is_some_and(|v| v != value))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, NodeId};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use webanchor_xpath::parse;

    const HTML: &str = r#"<div id="r"><p class="intro">one</p><section><p>two</p><p lang="fr">three</p></section><!--note--><p>four</p></div>"#;

    fn select(doc: &Document, root: NodeId, xpath: &str) -> Vec<String> {
        let path = parse(xpath).unwrap();
        evaluate(doc, &path, root)
            .into_iter()
            .map(|n| match doc.kind(n) {
                NodeKind::Element => doc.text_content(n),
                _ => format!("{}:{}", doc.node_name(n), doc.data(n).unwrap_or_default()),
            })
            .collect()
    }

    #[rstest]
    #[case("./p", &["one", "four"])]
    #[case("./p[2]", &["four"])]
    #[case("./p[last()]", &["four"])]
    #[case("./P[1]", &["one"])]
    #[case(".//p", &["one", "two", "three", "four"])]
    #[case(".//p[1]", &["one", "two"])]
    #[case("./section/p[position() = 2]", &["three"])]
    #[case("./*[2]/p[1]", &["two"])]
    #[case(".//p[@lang]", &["three"])]
    #[case(".//p[@lang = 'fr']", &["three"])]
    #[case(".//p[@class != 'intro']", &[])]
    #[case("./comment()", &["#comment:note"])]
    #[case("./p[1]/text()[1]", &["#text:one"])]
    #[case(".//p[@lang]/preceding-sibling::p", &["two"])]
    #[case("./p[1]/following-sibling::*", &["twothree", "four"])]
    #[case("./section/p[2]/ancestor::*[1]", &["twothree"])]
    #[case("./section/p[2]/..", &["twothree"])]
    #[case("./p[1]/@class", &[])]
    #[case("./p[3]", &[])]
    #[case("./p[0]", &[])]
    fn selects_nodes(#[case] xpath: &str, #[case] expected: &[&str]) {
        let doc = Document::parse(HTML);
        let root = doc.element_by_id("r").unwrap();
        assert_eq!(select(&doc, root, xpath), expected);
    }

    #[test]
    fn ancestor_positions_count_from_the_context() {
        let doc = Document::parse(HTML);
        let root = doc.element_by_id("r").unwrap();
        let three = parse("./section/p[2]").unwrap();
        let node = evaluate(&doc, &three, root)[0];
        let div = evaluate(&doc, &parse("ancestor::div[1]").unwrap(), node);
        assert_eq!(div, vec![root]);
    }

    #[test]
    fn absolute_paths_start_at_the_document() {
        let doc = Document::parse(HTML);
        let root = doc.element_by_id("r").unwrap();
        let found = evaluate(&doc, &parse("/html/body/div").unwrap(), root);
        assert_eq!(found, vec![root]);
        assert_eq!(evaluate(&doc, &parse("/").unwrap(), root), vec![doc.root()]);
    }

    #[test]
    fn results_are_unique_and_ordered() {
        let doc = Document::parse(HTML);
        let root = doc.element_by_id("r").unwrap();
        let found = evaluate(&doc, &parse(".//p/ancestor-or-self::*").unwrap(), root);
        let names: Vec<_> = found.iter().map(|&n| doc.node_name(n)).collect();
        assert_eq!(
            names,
            vec!["html", "body", "div", "p", "section", "p", "p", "p"]
        );
    }
}
