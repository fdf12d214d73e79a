use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::anchoring::{RangeAnchor, RangeSelector, TextPositionAnchor, TextPositionSelector};
use crate::dom::{Dom, DomRange};
use crate::highlighting::{Highlight, label_colors};

/// What the host is told about the current selection: its text and both
/// anchors, each `None` when it cannot be computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSelection {
    pub selected_text: String,
    pub text_position: Option<TextPositionSelector>,
    pub range: Option<RangeSelector>,
}

impl TextSelection {
    pub fn capture<D: Dom>(dom: &D, root: D::Node, range: &DomRange<D::Node>) -> Self {
        let text_position = TextPositionAnchor::from_range(dom, root, range)
            .map(|anchor| anchor.to_selector())
            .inspect_err(|err| log::debug!("no text position for selection: {err}"))
            .ok();
        let selector = RangeAnchor::from_range(root, *range)
            .to_selector(dom)
            .inspect_err(|err| log::debug!("no range selector for selection: {err}"))
            .ok();

        Self {
            selected_text: range.text(dom),
            text_position,
            range: selector,
        }
    }

    /// Turn the selection into a new highlight drawn in `color`, or `None`
    /// when either anchor is missing.
    pub fn into_highlight(self, color: &str, border_style: &str) -> Option<Highlight> {
        let (background_color, border_color) = label_colors(color);
        Some(Highlight {
            id: Uuid::new_v4(),
            range: self.range?,
            text_position: self.text_position?,
            selected_text: self.selected_text,
            background_color,
            border_color,
            border_style: border_style.to_string(),
        })
    }
}
