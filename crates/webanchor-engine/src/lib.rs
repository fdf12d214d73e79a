pub mod anchoring;
pub mod dom;
pub mod error;
pub mod highlighting;
pub mod io;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use anchoring::{
    AnchorFormat, RangeAnchor, RangeSelector, Selector, TextPosition, TextPositionAnchor,
    TextPositionSelector, TextRange,
};
pub use dom::{BoundaryPoint, Document, Dom, DomRange, NodeId, NodeKind};
pub use error::AnchorError;
pub use highlighting::{
    ApplyReport, Highlight, HighlightOptions, TextSelection, apply_highlights,
    build_highlight_style, clear_highlights, is_overlapping, label_colors, overlaps_any,
    wrap_content,
};
pub use io::*;
