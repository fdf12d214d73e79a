use crate::dom::NodeKind;

/// Why an anchor could not be created or resolved.
///
/// Everything except [`AnchorError::NotAncestor`] is an expected outcome
/// when content changes between saving and restoring a highlight: callers
/// should drop the highlight rather than surface the error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnchorError {
    #[error("selector has no {0} container")]
    MissingContainer(&'static str),

    #[error("no node matches XPath `{0}`")]
    XPathNotFound(String),

    #[error("invalid XPath `{xpath}`: {source}")]
    InvalidXPath {
        xpath: String,
        #[source]
        source: webanchor_xpath::ParseError,
    },

    #[error("node is not a descendant of the anchoring root")]
    NotDescendant,

    #[error("expected {expected} node, found {found:?}")]
    UnsupportedNode {
        expected: &'static str,
        found: NodeKind,
    },

    #[error("offset {offset} is outside 0..={max}")]
    OffsetOutOfRange { offset: usize, max: usize },

    #[error("text node has no parent element")]
    NoParentElement,

    #[error("text offset {0} cannot be resolved to a text node")]
    Unresolvable(usize),

    #[error("element is not an ancestor of the position's element")]
    NotAncestor,
}

impl AnchorError {
    /// True for errors caused by calling code breaking a precondition,
    /// rather than by the content the anchor points into.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, AnchorError::NotAncestor)
    }
}
