use anyhow::{Context, Result, anyhow};
use ratatui::widgets::ListState;
use std::path::PathBuf;
use webanchor_config::Config;
use webanchor_engine::{
    Document, Dom, Highlight, HighlightOptions, NodeId, NodeKind, TextPosition, TextRange,
    TextSelection, apply_highlights, clear_highlights, io, overlaps_any, wrap_content,
};

const BLOCK_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "td", "th", "pre", "blockquote", "dt", "dd",
    "figcaption", "caption",
];

/// A run of block text that is either inside a highlight or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

pub struct App {
    pub page_path: PathBuf,
    pub highlights_path: PathBuf,
    pub config: Config,
    pub highlights: Vec<Highlight>,
    pub block_state: ListState,
    /// Caret position in the current block, in chars
    pub cursor: usize,
    pub mark: Option<usize>,
    pub status: String,
    pub dirty: bool,
    doc: Document,
    root: NodeId,
    blocks: Vec<NodeId>,
}

impl App {
    pub fn new(page_path: PathBuf, highlights_path: PathBuf, config: Config) -> Result<Self> {
        let html = io::read_html(&page_path)?;
        let mut doc = Document::parse(&html);
        if doc.element_by_id(&config.root_id).is_none() {
            log::info!(
                "no #{} element in {}, wrapping the page",
                config.root_id,
                page_path.display()
            );
            doc = Document::parse(&wrap_content(&html, &config.root_id));
        }
        let root = doc
            .element_by_id(&config.root_id)
            .ok_or_else(|| anyhow!("No #{} element in {}", config.root_id, page_path.display()))?;

        let highlights = io::read_highlights(&highlights_path)
            .with_context(|| format!("Loading {}", highlights_path.display()))?;
        let blocks = collect_blocks(&doc, root);

        let mut app = Self {
            page_path,
            highlights_path,
            config,
            highlights,
            block_state: ListState::default(),
            cursor: 0,
            mark: None,
            status: String::new(),
            dirty: false,
            doc,
            root,
            blocks,
        };
        app.block_state.select(Some(0));

        let report = app.render_highlights();
        app.status = format!(
            "Restored {} highlights, {} could not be anchored",
            report.applied.len(),
            report.skipped.len()
        );
        Ok(app)
    }

    fn options(&self) -> HighlightOptions {
        HighlightOptions {
            class_name: self.config.highlight_class.clone(),
        }
    }

    fn render_highlights(&mut self) -> webanchor_engine::ApplyReport {
        let options = self.options();
        apply_highlights(&mut self.doc, self.root, &self.highlights, &options)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    fn current_block(&self) -> NodeId {
        let index = self.block_state.selected().unwrap_or(0);
        self.blocks.get(index).copied().unwrap_or(self.root)
    }

    pub fn current_text(&self) -> String {
        self.doc.text_content(self.current_block())
    }

    pub fn next_block(&mut self) {
        let i = match self.block_state.selected() {
            Some(i) => (i + 1) % self.blocks.len(),
            None => 0,
        };
        self.select_block(i);
    }

    pub fn previous_block(&mut self) {
        let i = match self.block_state.selected() {
            Some(0) | None => self.blocks.len() - 1,
            Some(i) => i - 1,
        };
        self.select_block(i);
    }

    fn select_block(&mut self, index: usize) {
        self.block_state.select(Some(index));
        self.cursor = 0;
        self.mark = None;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        let length = self.current_text().chars().count();
        self.cursor = (self.cursor + 1).min(length);
    }

    /// Start a selection at the caret, or drop the current one.
    pub fn toggle_mark(&mut self) {
        self.mark = match self.mark {
            Some(_) => None,
            None => Some(self.cursor),
        };
    }

    /// Selected char range in the current block, start first.
    pub fn selection(&self) -> Option<(usize, usize)> {
        let mark = self.mark?;
        Some((mark.min(self.cursor), mark.max(self.cursor)))
    }

    /// Highlight the selected text, unless it overlaps an existing highlight.
    pub fn create_highlight(&mut self) -> Result<()> {
        let Some((start, end)) = self.selection().filter(|(s, e)| s < e) else {
            self.status = "Select some text first (Space marks the start)".to_string();
            return Ok(());
        };

        let block = self.current_block();
        let text = self.current_text();
        // anchors are taken on the bare page, the way they will be restored
        clear_highlights(&mut self.doc, &self.config.highlight_class);
        let range = TextRange::new(
            TextPosition::new(block, utf16_offset(&text, start)),
            TextPosition::new(block, utf16_offset(&text, end)),
        )
        .to_range(&self.doc);
        let highlight = range.ok().and_then(|range| {
            TextSelection::capture(&self.doc, self.root, &range)
                .into_highlight(&self.config.border_color, &self.config.border_style)
        });

        match highlight {
            Some(highlight) if overlaps_any(&self.highlights, &highlight.text_position) => {
                self.status = "Selection overlaps an existing highlight".to_string();
            }
            Some(highlight) => {
                log::info!("created highlight {} ({:?})", highlight.id, highlight.selected_text);
                self.status = format!("Highlighted \"{}\"", highlight.selected_text);
                self.highlights.push(highlight);
                self.dirty = true;
                self.mark = None;
            }
            None => {
                self.status = "Could not anchor the selection".to_string();
            }
        }
        self.render_highlights();
        Ok(())
    }

    /// Remove the highlight under the caret.
    pub fn delete_highlight(&mut self) {
        let text = self.current_text();
        let caret = TextPosition::new(self.current_block(), utf16_offset(&text, self.cursor))
            .relative_to(&self.doc, self.root);
        let Ok(caret) = caret else {
            return;
        };

        let hit = self.highlights.iter().position(|h| {
            h.text_position.start <= caret.offset && caret.offset < h.text_position.end
        });
        match hit {
            Some(index) => {
                let removed = self.highlights.remove(index);
                log::info!("deleted highlight {}", removed.id);
                self.status = format!("Removed \"{}\"", removed.selected_text);
                self.dirty = true;
                self.render_highlights();
            }
            None => self.status = "No highlight under the cursor".to_string(),
        }
    }

    pub fn save(&mut self) -> Result<()> {
        io::write_highlights(&self.highlights_path, &self.highlights)?;
        self.dirty = false;
        self.status = format!("Saved {}", self.highlights_path.display());
        Ok(())
    }

    /// Write the page with highlights rendered in next to the original.
    pub fn export(&mut self) -> Result<PathBuf> {
        let path = self.page_path.with_extension("highlighted.html");
        io::write_html(&path, &self.doc.to_html())?;
        self.status = format!("Exported {}", path.display());
        Ok(path)
    }

    /// Text of each block split into highlighted and plain runs.
    pub fn block_segments(&self) -> Vec<Vec<Segment>> {
        self.blocks
            .iter()
            .map(|&block| segments(&self.doc, block, &self.config.highlight_class))
            .collect()
    }
}

fn is_block(doc: &Document, node: NodeId) -> bool {
    doc.kind(node) == NodeKind::Element
        && doc
            .tag_name(node)
            .is_some_and(|tag| BLOCK_TAGS.contains(&tag))
}

/// Outermost block elements with visible text, in document order.
fn collect_blocks(doc: &Document, root: NodeId) -> Vec<NodeId> {
    let mut blocks: Vec<NodeId> = Vec::new();
    for node in doc.descendants(root) {
        if is_block(doc, node)
            && !blocks.last().is_some_and(|&block| doc.contains(block, node))
            && !doc.text_content(node).trim().is_empty()
        {
            blocks.push(node);
        }
    }
    if blocks.is_empty() {
        blocks.push(root);
    }
    blocks
}

fn segments(doc: &Document, block: NodeId, class_name: &str) -> Vec<Segment> {
    let mut out: Vec<Segment> = Vec::new();
    for text in doc.text_nodes(block) {
        let highlighted = std::iter::successors(doc.parent(text), |&n| doc.parent(n))
            .take_while(|&n| n != block)
            .any(|n| {
                doc.attribute(n, "class")
                    .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class_name))
            });
        let data = doc.data(text).unwrap_or_default();
        match out.last_mut() {
            Some(last) if last.highlighted == highlighted => last.text.push_str(data),
            _ => out.push(Segment {
                text: data.to_string(),
                highlighted,
            }),
        }
    }
    out
}

fn utf16_offset(text: &str, chars: usize) -> usize {
    text.chars().take(chars).map(char::len_utf16).sum()
}
