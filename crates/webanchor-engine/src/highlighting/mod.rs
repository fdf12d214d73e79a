//! Rendering stored highlights into a document.
//!
//! Each highlight is restored through its [`RangeSelector`], then every text
//! node it covers is wrapped in a `span` carrying the highlight class and an
//! inline style. Boundary text nodes are split first so spans cover exactly
//! the highlighted text.

pub mod selection;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::anchoring::{RangeAnchor, RangeSelector, TextPositionSelector};
use crate::dom::{Document, Dom, DomRange, NodeId, NodeKind};
use crate::error::AnchorError;

pub use selection::TextSelection;

pub const DEFAULT_HIGHLIGHT_CLASS: &str = "notebook-highlight";
pub const DEFAULT_BORDER_STYLE: &str = "solid";

/// A saved highlight, as persisted next to the page it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub id: Uuid,
    pub range: RangeSelector,
    pub text_position: TextPositionSelector,
    pub selected_text: String,
    pub background_color: String,
    pub border_color: String,
    #[serde(default = "default_border_style")]
    pub border_style: String,
}

fn default_border_style() -> String {
    DEFAULT_BORDER_STYLE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightOptions {
    /// Class put on every highlight span, and removed again by
    /// [`clear_highlights`].
    pub class_name: String,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            class_name: DEFAULT_HIGHLIGHT_CLASS.to_string(),
        }
    }
}

/// Outcome of [`apply_highlights`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: Vec<Uuid>,
    pub skipped: Vec<(Uuid, AnchorError)>,
    /// Number of spans inserted across all applied highlights.
    pub spans: usize,
}

/// Remove every highlight span, putting its children back in its place, and
/// merge the text nodes that highlighting split apart. Returns the number
/// of spans removed.
pub fn clear_highlights(doc: &mut Document, class_name: &str) -> usize {
    let spans = doc.elements_by_class(class_name);
    for &span in &spans {
        doc.unwrap(span);
    }
    // boundary splits can sit outside any span, so merge across the tree
    let root = doc.root();
    doc.normalize(root);
    spans.len()
}

/// Clear existing highlights, then render `highlights` below `root`.
///
/// Highlights whose selector no longer resolves are skipped and listed in
/// the report; the rest are still applied.
pub fn apply_highlights(
    doc: &mut Document,
    root: NodeId,
    highlights: &[Highlight],
    options: &HighlightOptions,
) -> ApplyReport {
    clear_highlights(doc, &options.class_name);

    let mut report = ApplyReport::default();
    for highlight in highlights {
        match add_highlight(doc, root, highlight, options) {
            Ok(spans) => {
                report.applied.push(highlight.id);
                report.spans += spans;
            }
            Err(err) => {
                log::warn!("cannot restore highlight {}: {err}", highlight.id);
                report.skipped.push((highlight.id, err));
            }
        }
    }
    log::debug!(
        "applied {} highlights ({} spans), skipped {}",
        report.applied.len(),
        report.spans,
        report.skipped.len()
    );
    report
}

fn add_highlight(
    doc: &mut Document,
    root: NodeId,
    highlight: &Highlight,
    options: &HighlightOptions,
) -> Result<usize, AnchorError> {
    let mut range = RangeAnchor::from_selector(doc, root, &highlight.range)?.to_range();
    let text_nodes = highlight_text_nodes(doc, &mut range);

    let style = build_highlight_style(highlight);
    let id = highlight.id.to_string();
    let mut wrapped = 0;
    for text in text_nodes {
        if doc.data(text).is_none_or(str::is_empty) {
            continue;
        }
        let Some(parent) = doc.parent(text) else {
            continue;
        };
        let span = doc.create_element("span");
        doc.set_attribute(span, "class", &options.class_name);
        doc.set_attribute(span, "data-highlight-id", &id);
        doc.set_attribute(span, "style", &style);
        doc.insert_before(parent, span, Some(text));
        doc.append_child(span, text);
        wrapped += 1;
    }
    Ok(wrapped)
}

/// Whole text nodes covered by `range`, minus whitespace-only nodes that are
/// not the sole child of a `span`.
fn highlight_text_nodes(doc: &mut Document, range: &mut DomRange<NodeId>) -> Vec<NodeId> {
    let mut nodes = whole_text_nodes_in_range(doc, range);
    nodes.retain(|&node| {
        let sole_span_child = doc.parent_element(node).is_some_and(|parent| {
            doc.child_count(parent) == 1
                && doc
                    .tag_name(parent)
                    .is_some_and(|tag| tag.eq_ignore_ascii_case("span"))
        });
        sole_span_child || !doc.data(node).unwrap_or_default().trim().is_empty()
    });
    nodes
}

/// Split the text nodes at the range boundaries and return every text node
/// lying inside it. `range` is kept pointing at the same text while nodes
/// are split.
fn whole_text_nodes_in_range(doc: &mut Document, range: &mut DomRange<NodeId>) -> Vec<NodeId> {
    if range.is_collapsed() {
        return Vec::new();
    }
    let ancestor = range.common_ancestor(doc);
    let root = if doc.kind(ancestor) == NodeKind::Element {
        ancestor
    } else {
        match doc.parent_element(ancestor) {
            Some(element) => element,
            None => return Vec::new(),
        }
    };

    let mut nodes = Vec::new();
    let mut next = next_text(doc, root, root);
    while let Some(text) = next {
        let length = doc.text_length(text);
        let in_range = range.compare_point(doc, text, 0).is_le()
            && range.compare_point(doc, text, length).is_ge();

        if in_range {
            if text == range.start_container && range.start_offset > 0 {
                // the tail of the split is visited next
                split_live(doc, range, text, range.start_offset);
            } else {
                if text == range.end_container && range.end_offset < length {
                    split_live(doc, range, text, range.end_offset);
                }
                nodes.push(text);
            }
        }
        next = next_text(doc, text, root);
    }
    nodes
}

fn next_text(doc: &Document, node: NodeId, root: NodeId) -> Option<NodeId> {
    let mut current = node;
    loop {
        current = doc.next_in_document(current)?;
        if !doc.contains(root, current) {
            return None;
        }
        if doc.kind(current) == NodeKind::Text {
            return Some(current);
        }
    }
}

fn split_live(doc: &mut Document, range: &mut DomRange<NodeId>, text: NodeId, offset: usize) {
    let parent = doc.parent(text);
    let index = doc.index_in_parent(text);
    match doc.split_text(text, offset) {
        Ok(tail) => {
            // an offset inside a surrogate pair splits after the whole character
            let head = doc.text_length(text);
            range.follow_split(text, tail, head, parent, index)
        }
        Err(err) => log::error!("cannot split {text:?} at {offset}: {err}"),
    }
}

/// Inline CSS for a highlight span: tinted background, underline border.
pub fn build_highlight_style(highlight: &Highlight) -> String {
    format!(
        "position: relative; padding: 0px; border-top: none; border-right: none; \
         border-bottom: 1px {} {}; background-color: {};",
        highlight.border_style, highlight.border_color, highlight.background_color
    )
}

/// `(background, border)` colours for a highlight drawn in `hex`. The
/// background is the same colour at 20% opacity.
pub fn label_colors(hex: &str) -> (String, String) {
    (format!("{hex}33"), hex.to_string())
}

/// Whether two text-position ranges touch or overlap.
pub fn is_overlapping(a: &TextPositionSelector, b: &TextPositionSelector) -> bool {
    (a.start <= b.end && a.end >= b.start)
        || (a.start >= b.start && a.end <= b.end)
        || (a.start <= b.start && a.end >= b.end)
}

pub fn overlaps_any(existing: &[Highlight], candidate: &TextPositionSelector) -> bool {
    existing
        .iter()
        .any(|highlight| is_overlapping(&highlight.text_position, candidate))
}

/// Wrap page content in the container element highlights are anchored to.
pub fn wrap_content(content: &str, root_id: &str) -> String {
    format!(
        r#"<div id="{}"><div>{content}</div></div>"#,
        html_escape::encode_double_quoted_attribute(root_id)
    )
}
