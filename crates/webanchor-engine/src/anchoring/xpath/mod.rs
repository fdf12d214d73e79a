//! XPaths between nodes and an anchoring root.
//!
//! [`xpath_from_node`] writes positional paths such as `/div[1]/p[2]/text()[1]`
//! relative to the root. [`node_from_xpath`] reads them back, first with a
//! direct walk over element children for paths of that simple shape, then
//! with the general evaluator for anything else.

pub mod evaluate;

use std::sync::OnceLock;

use regex::Regex;

use crate::dom::{Dom, NodeKind};
use crate::error::AnchorError;

/// Path from `root` down to `node`, one `name[position]` segment per level.
///
/// Positions count preceding siblings with the same node name, so text
/// nodes are numbered among text nodes only. The root itself is `/.`.
pub fn xpath_from_node<D: Dom>(
    dom: &D,
    node: D::Node,
    root: D::Node,
) -> Result<String, AnchorError> {
    if node == root {
        return Ok("/.".to_string());
    }

    let mut segments = Vec::new();
    let mut current = node;
    while current != root {
        let name = dom.node_name(current);
        let position = 1 + std::iter::successors(dom.previous_sibling(current), |&n| {
            dom.previous_sibling(n)
        })
        .filter(|&sibling| dom.node_name(sibling) == name)
        .count();

        let segment = match dom.kind(current) {
            NodeKind::Text => "text()".to_string(),
            NodeKind::Comment => "comment()".to_string(),
            _ => name,
        };
        segments.push(format!("{segment}[{position}]"));

        current = dom.parent(current).ok_or_else(|| {
            log::error!("{node:?} is not a descendant of the anchoring root {root:?}");
            AnchorError::NotDescendant
        })?;
    }

    segments.reverse();
    Ok(format!("/{}", segments.join("/")))
}

/// Find the node `xpath` points at below `root`.
pub fn node_from_xpath<D: Dom>(
    dom: &D,
    xpath: &str,
    root: D::Node,
) -> Result<D::Node, AnchorError> {
    match evaluate_simple_xpath(dom, xpath, root) {
        Ok(node) => return Ok(node),
        Err(err) => log::debug!("simple XPath lookup failed ({err}), using the evaluator"),
    }
    evaluate_xpath(dom, &format!(".{xpath}"), root)
}

fn simple_xpath_regex() -> &'static Regex {
    static SIMPLE_XPATH: OnceLock<Regex> = OnceLock::new();
    SIMPLE_XPATH.get_or_init(|| {
        Regex::new(r"^(/[A-Za-z0-9-]+(\[[0-9]+\])?)+$").expect("Invalid simple XPath regex")
    })
}

fn segment_regex() -> &'static Regex {
    static SEGMENT: OnceLock<Regex> = OnceLock::new();
    SEGMENT.get_or_init(|| {
        Regex::new(r"/([A-Za-z0-9-]+)(?:\[([0-9]+)\])?").expect("Invalid XPath segment regex")
    })
}

/// Walk `/name[index]` segments over element children only.
///
/// Fails for any path outside that shape, for index 0 and for segments
/// with no matching child.
pub fn evaluate_simple_xpath<D: Dom>(
    dom: &D,
    xpath: &str,
    root: D::Node,
) -> Result<D::Node, AnchorError> {
    let not_found = || AnchorError::XPathNotFound(xpath.to_string());
    if !simple_xpath_regex().is_match(xpath) {
        log::error!("`{xpath}` is not a simple XPath");
        return Err(not_found());
    }

    let mut element = root;
    for captures in segment_regex().captures_iter(xpath) {
        let name = &captures[1];
        let index = match captures.get(2) {
            Some(index) => index
                .as_str()
                .parse::<usize>()
                .ok()
                .and_then(|i| i.checked_sub(1))
                .ok_or_else(not_found)?,
            None => 0,
        };
        element = nth_child_of_type(dom, element, name, index).ok_or_else(not_found)?;
    }
    Ok(element)
}

/// The `index`-th (0-based) child element of `element` named `name`,
/// compared case-insensitively.
fn nth_child_of_type<D: Dom>(
    dom: &D,
    element: D::Node,
    name: &str,
    index: usize,
) -> Option<D::Node> {
    dom.children(element)
        .filter(|&child| {
            dom.kind(child) == NodeKind::Element
                && dom
                    .tag_name(child)
                    .is_some_and(|tag| tag.eq_ignore_ascii_case(name))
        })
        .nth(index)
}

/// Evaluate any supported location path from `context` and return the
/// first selected node in document order.
pub fn evaluate_xpath<D: Dom>(
    dom: &D,
    xpath: &str,
    context: D::Node,
) -> Result<D::Node, AnchorError> {
    let path = webanchor_xpath::parse(xpath).map_err(|source| AnchorError::InvalidXPath {
        xpath: xpath.to_string(),
        source,
    })?;
    evaluate::evaluate(dom, &path, context)
        .into_iter()
        .next()
        .ok_or_else(|| AnchorError::XPathNotFound(xpath.to_string()))
}
