//! Persisted anchor shapes.
//!
//! These are the JSON objects hosts store next to a highlight. Key names
//! are fixed by the web view bridge and must not change.

use serde::{Deserialize, Serialize};

/// XPath-based selector: containers are paths relative to the anchoring
/// root, offsets are character offsets into the container's text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeSelector {
    pub start_container: String,
    pub start_offset: usize,
    pub end_container: String,
    pub end_offset: usize,
}

/// Character offsets from the start of the anchoring root's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextPositionSelector {
    pub start: usize,
    pub end: usize,
}

/// Either selector, told apart by its keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selector {
    Range(RangeSelector),
    TextPosition(TextPositionSelector),
}

impl From<RangeSelector> for Selector {
    fn from(selector: RangeSelector) -> Self {
        Selector::Range(selector)
    }
}

impl From<TextPositionSelector> for Selector {
    fn from(selector: TextPositionSelector) -> Self {
        Selector::TextPosition(selector)
    }
}
