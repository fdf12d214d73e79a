use std::fmt::Debug;

use crate::anchoring::selector::RangeSelector;
use crate::anchoring::text_position::TextPosition;
use crate::anchoring::text_range::TextRange;
use crate::anchoring::xpath::{node_from_xpath, xpath_from_node};
use crate::dom::{Dom, DomRange};
use crate::error::AnchorError;

/// A range anchored by XPaths to its container elements, so it survives
/// text edits outside those elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeAnchor<N> {
    pub root: N,
    pub range: DomRange<N>,
}

impl<N: Copy + Eq + Debug> RangeAnchor<N> {
    pub fn new(root: N, range: DomRange<N>) -> Self {
        Self { root, range }
    }

    pub fn from_range(root: N, range: DomRange<N>) -> Self {
        Self::new(root, range)
    }

    /// Resolve a stored selector back into a range below `root`.
    pub fn from_selector<D: Dom<Node = N>>(
        dom: &D,
        root: N,
        selector: &RangeSelector,
    ) -> Result<Self, AnchorError> {
        for (end, container) in [
            ("start", &selector.start_container),
            ("end", &selector.end_container),
        ] {
            if container.is_empty() {
                log::error!("selector has no {end} container");
                return Err(AnchorError::MissingContainer(end));
            }
        }

        let start_node = node_from_xpath(dom, &selector.start_container, root).inspect_err(|err| {
            log::error!("cannot resolve start container {}: {err}", selector.start_container)
        })?;
        let end_node = node_from_xpath(dom, &selector.end_container, root).inspect_err(|err| {
            log::error!("cannot resolve end container {}: {err}", selector.end_container)
        })?;

        let start = TextPosition::from_char_offset(dom, start_node, selector.start_offset)?;
        let end = TextPosition::from_char_offset(dom, end_node, selector.end_offset)?;

        let range = TextRange::new(start, end).to_range(dom)?;
        Ok(Self::new(root, range))
    }

    pub fn to_range(&self) -> DomRange<N> {
        self.range
    }

    /// Describe the range as XPaths to the elements holding its ends.
    ///
    /// The range is first normalized through its text positions, so ends
    /// given as child indexes or at node edges end up in a canonical form.
    pub fn to_selector<D: Dom<Node = N>>(&self, dom: &D) -> Result<RangeSelector, AnchorError> {
        let normalized = TextRange::from_range(dom, &self.range)?.to_range(dom)?;
        let text_range = TextRange::from_range(dom, &normalized)?;

        Ok(RangeSelector {
            start_container: xpath_from_node(dom, text_range.start.element, self.root)?,
            start_offset: text_range.start.offset,
            end_container: xpath_from_node(dom, text_range.end.element, self.root)?,
            end_offset: text_range.end.offset,
        })
    }
}
