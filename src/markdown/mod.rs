//! Markdown subset renderer
//!
//! Turns the guide text returned by the model into display blocks. Only the
//! constructs the guide prompt asks for are recognised: `#`/`##`/`###`
//! headings, `-`/`*` bullet items, `**bold**` spans and plain paragraphs.
//! Parsing is a single forward pass over lines with one pending list buffer.

use serde::Serialize;

pub mod render;

pub use render::{to_html, to_terminal};

/// Inline segment of a paragraph or list item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "text", rename_all = "lowercase")]
pub enum Inline {
    Text(String),
    Bold(String),
}

/// Top-level display block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Heading { level: u8, text: String },
    List { items: Vec<Vec<Inline>> },
    Paragraph { spans: Vec<Inline> },
}

const HEADING_PREFIXES: [(&str, u8); 3] = [("### ", 3), ("## ", 2), ("# ", 1)];
const LIST_MARKERS: [&str; 2] = ["- ", "* "];
const BOLD_MARKER: &str = "**";

/// Parse markdown text into display blocks.
///
/// A blank line always closes the current list, so two bullet runs separated
/// by an empty line come out as two list blocks.
#[must_use]
pub fn parse(text: &str) -> Vec<Block> {
    let mut parser = LineParser::default();
    for line in text.lines() {
        parser.feed(line);
    }
    parser.finish()
}

#[derive(Default)]
struct LineParser {
    blocks: Vec<Block>,
    pending_items: Vec<Vec<Inline>>,
}

impl LineParser {
    fn feed(&mut self, line: &str) {
        if let Some((level, text)) = heading(line) {
            self.flush_list();
            self.blocks.push(Block::Heading {
                level,
                text: text.to_string(),
            });
        } else if let Some(item) = list_item(line) {
            self.pending_items.push(split_bold(item));
        } else if line.trim().is_empty() {
            self.flush_list();
        } else {
            self.flush_list();
            self.blocks.push(Block::Paragraph {
                spans: split_bold(line),
            });
        }
    }

    fn flush_list(&mut self) {
        if !self.pending_items.is_empty() {
            let items = std::mem::take(&mut self.pending_items);
            self.blocks.push(Block::List { items });
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush_list();
        self.blocks
    }
}

/// Longest prefix first, otherwise `### x` would read as a level-1 heading.
fn heading(line: &str) -> Option<(u8, &str)> {
    HEADING_PREFIXES
        .iter()
        .find_map(|(prefix, level)| line.strip_prefix(prefix).map(|text| (*level, text)))
}

fn list_item(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    LIST_MARKERS
        .iter()
        .find_map(|marker| trimmed.strip_prefix(marker))
}

/// Split text on paired `**` markers. An unmatched marker stays plain text.
#[must_use]
pub fn split_bold(text: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut rest = text;

    while let Some(open) = rest.find(BOLD_MARKER) {
        let after_open = &rest[open + BOLD_MARKER.len()..];
        let Some(close) = after_open.find(BOLD_MARKER) else {
            break;
        };

        plain.push_str(&rest[..open]);
        if !plain.is_empty() {
            spans.push(Inline::Text(std::mem::take(&mut plain)));
        }
        spans.push(Inline::Bold(after_open[..close].to_string()));
        rest = &after_open[close + BOLD_MARKER.len()..];
    }

    plain.push_str(rest);
    if !plain.is_empty() {
        spans.push(Inline::Text(plain));
    }
    spans
}
