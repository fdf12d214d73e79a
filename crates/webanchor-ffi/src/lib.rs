//! UniFFI bindings for webanchor
//!
//! Lets the mobile apps compute and resolve highlight anchors, and render
//! highlights into page HTML, without going through a web view.

use std::sync::Mutex;
use webanchor_engine::{
    AnchorError, ApplyReport, Document, Dom, Highlight, HighlightOptions, NodeId, RangeAnchor,
    RangeSelector, TextPositionAnchor, TextPositionSelector, TextSelection,
};

uniffi::setup_scaffolding!();

// ============ Errors ============

/// Errors that can cross the FFI boundary
/// Note: Field is named `reason` not `message` to avoid conflict with Throwable.message in Kotlin
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FfiError {
    #[error("Invalid document: {reason}")]
    InvalidDocument { reason: String },
    #[error("Anchor error: {reason}")]
    Anchor { reason: String },
    #[error("Invalid highlight: {reason}")]
    InvalidHighlight { reason: String },
}

impl From<AnchorError> for FfiError {
    fn from(err: AnchorError) -> Self {
        FfiError::Anchor {
            reason: err.to_string(),
        }
    }
}

fn to_offset(value: u64) -> Result<usize, FfiError> {
    usize::try_from(value).map_err(|_| FfiError::Anchor {
        reason: format!("offset {value} does not fit this platform"),
    })
}

// ============ Document Handle ============

struct AnchoredPage {
    doc: Document,
    root: NodeId,
}

/// A parsed page with the element highlights are anchored to.
#[derive(uniffi::Object)]
pub struct AnchorDocument {
    inner: Mutex<AnchoredPage>,
}

#[uniffi::export]
impl AnchorDocument {
    /// Parse page HTML. Content without a `root_id` element is wrapped in
    /// one first.
    #[uniffi::constructor]
    pub fn from_html(html: String, root_id: String) -> Result<Self, FfiError> {
        let mut doc = Document::parse(&html);
        if doc.element_by_id(&root_id).is_none() {
            doc = Document::parse(&webanchor_engine::wrap_content(&html, &root_id));
        }
        let root = doc
            .element_by_id(&root_id)
            .ok_or_else(|| FfiError::InvalidDocument {
                reason: format!("no element with id {root_id:?}"),
            })?;

        Ok(Self {
            inner: Mutex::new(AnchoredPage { doc, root }),
        })
    }

    /// Text of the anchoring root; selection offsets index into this.
    pub fn text_content(&self) -> String {
        // Recover from poisoned mutex (another thread panicked while holding lock)
        let page = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        page.doc.text_content(page.root)
    }

    /// Describe a selection given as UTF-16 offsets into the root's text.
    pub fn capture_offsets(&self, start: u64, end: u64) -> Result<SelectionDto, FfiError> {
        let page = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let anchor = TextPositionAnchor::new(page.root, to_offset(start)?, to_offset(end)?);
        let range = anchor.to_range(&page.doc)?;
        Ok(TextSelection::capture(&page.doc, page.root, &range).into())
    }

    /// Map an XPath-based selector to offsets into the root's text.
    pub fn resolve_range_selector(
        &self,
        selector: RangeSelectorDto,
    ) -> Result<TextPositionSelectorDto, FfiError> {
        let page = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let selector = selector.into_engine()?;
        let range = RangeAnchor::from_selector(&page.doc, page.root, &selector)?.to_range();
        let anchor = TextPositionAnchor::from_range(&page.doc, page.root, &range)?;
        Ok(anchor.to_selector().into())
    }

    /// Map root text offsets to an XPath-based selector.
    pub fn resolve_text_position_selector(
        &self,
        selector: TextPositionSelectorDto,
    ) -> Result<RangeSelectorDto, FfiError> {
        let page = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let selector = selector.into_engine()?;
        let range = TextPositionAnchor::from_selector(page.root, &selector).to_range(&page.doc)?;
        let selector = RangeAnchor::from_range(page.root, range).to_selector(&page.doc)?;
        Ok(selector.into())
    }

    /// Replace the rendered highlights with `highlights`.
    pub fn apply_highlights(
        &self,
        highlights: Vec<HighlightDto>,
        class_name: Option<String>,
    ) -> Result<ApplyReportDto, FfiError> {
        let highlights = highlights
            .into_iter()
            .map(HighlightDto::into_engine)
            .collect::<Result<Vec<_>, _>>()?;
        let options = class_name
            .map(|class_name| HighlightOptions { class_name })
            .unwrap_or_default();

        let mut page = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let root = page.root;
        let report = webanchor_engine::apply_highlights(&mut page.doc, root, &highlights, &options);
        Ok(report.into())
    }

    /// The whole page, with any applied highlights.
    pub fn html(&self) -> String {
        let page = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        page.doc.to_html()
    }
}

// ============ DTOs ============

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct RangeSelectorDto {
    pub start_container: String,
    pub start_offset: u64,
    pub end_container: String,
    pub end_offset: u64,
}

impl RangeSelectorDto {
    fn into_engine(self) -> Result<RangeSelector, FfiError> {
        Ok(RangeSelector {
            start_container: self.start_container,
            start_offset: to_offset(self.start_offset)?,
            end_container: self.end_container,
            end_offset: to_offset(self.end_offset)?,
        })
    }
}

impl From<RangeSelector> for RangeSelectorDto {
    fn from(selector: RangeSelector) -> Self {
        Self {
            start_container: selector.start_container,
            start_offset: selector.start_offset as u64,
            end_container: selector.end_container,
            end_offset: selector.end_offset as u64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Record)]
pub struct TextPositionSelectorDto {
    pub start: u64,
    pub end: u64,
}

impl TextPositionSelectorDto {
    fn into_engine(self) -> Result<TextPositionSelector, FfiError> {
        Ok(TextPositionSelector {
            start: to_offset(self.start)?,
            end: to_offset(self.end)?,
        })
    }
}

impl From<TextPositionSelector> for TextPositionSelectorDto {
    fn from(selector: TextPositionSelector) -> Self {
        Self {
            start: selector.start as u64,
            end: selector.end as u64,
        }
    }
}

/// The current selection as the host stores it.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct SelectionDto {
    pub selected_text: String,
    pub text_position: Option<TextPositionSelectorDto>,
    pub range: Option<RangeSelectorDto>,
}

impl From<TextSelection> for SelectionDto {
    fn from(selection: TextSelection) -> Self {
        Self {
            selected_text: selection.selected_text,
            text_position: selection.text_position.map(Into::into),
            range: selection.range.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct HighlightDto {
    /// UUID string
    pub id: String,
    pub range: RangeSelectorDto,
    pub text_position: TextPositionSelectorDto,
    pub selected_text: String,
    pub background_color: String,
    pub border_color: String,
    pub border_style: String,
}

impl HighlightDto {
    fn into_engine(self) -> Result<Highlight, FfiError> {
        let id = self.id.parse().map_err(|e| FfiError::InvalidHighlight {
            reason: format!("bad id {:?}: {e}", self.id),
        })?;
        Ok(Highlight {
            id,
            range: self.range.into_engine()?,
            text_position: self.text_position.into_engine()?,
            selected_text: self.selected_text,
            background_color: self.background_color,
            border_color: self.border_color,
            border_style: self.border_style,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct SkippedHighlightDto {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct ApplyReportDto {
    pub applied: Vec<String>,
    pub skipped: Vec<SkippedHighlightDto>,
    pub spans: u64,
}

impl From<ApplyReport> for ApplyReportDto {
    fn from(report: ApplyReport) -> Self {
        Self {
            applied: report.applied.iter().map(ToString::to_string).collect(),
            skipped: report
                .skipped
                .into_iter()
                .map(|(id, err)| SkippedHighlightDto {
                    id: id.to_string(),
                    reason: err.to_string(),
                })
                .collect(),
            spans: report.spans as u64,
        }
    }
}

// ============ Standalone Functions ============

/// Wrap page content in the container highlights are anchored to.
#[uniffi::export]
pub fn wrap_content(content: String, root_id: String) -> String {
    webanchor_engine::wrap_content(&content, &root_id)
}

/// Whether two highlights touch or overlap. Hosts use this to refuse a new
/// highlight on top of an existing one.
#[uniffi::export]
pub fn is_overlapping(a: TextPositionSelectorDto, b: TextPositionSelectorDto) -> bool {
    let (Ok(a), Ok(b)) = (a.into_engine(), b.into_engine()) else {
        return false;
    };
    webanchor_engine::is_overlapping(&a, &b)
}

/// Inline CSS the web view puts on highlight spans.
#[uniffi::export]
pub fn highlight_style(highlight: HighlightDto) -> Result<String, FfiError> {
    Ok(webanchor_engine::build_highlight_style(
        &highlight.into_engine()?,
    ))
}
