//! Projections of parsed blocks for the browser page and the terminal

use std::fmt::Write;

use super::{Block, Inline};

/// Render blocks as an HTML fragment. All text is escaped.
#[must_use]
pub fn to_html(blocks: &[Block]) -> String {
    let mut html = String::new();
    for block in blocks {
        match block {
            Block::Heading { level, text } => {
                let _ = writeln!(html, "<h{level}>{}</h{level}>", escape_html(text));
            }
            Block::List { items } => {
                html.push_str("<ul>\n");
                for item in items {
                    let _ = writeln!(html, "<li>{}</li>", spans_to_html(item));
                }
                html.push_str("</ul>\n");
            }
            Block::Paragraph { spans } => {
                let _ = writeln!(html, "<p>{}</p>", spans_to_html(spans));
            }
        }
    }
    html
}

fn spans_to_html(spans: &[Inline]) -> String {
    spans
        .iter()
        .map(|span| match span {
            Inline::Text(text) => escape_html(text),
            Inline::Bold(text) => format!("<strong>{}</strong>", escape_html(text)),
        })
        .collect()
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render blocks as plain text for a terminal.
#[must_use]
pub fn to_terminal(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            Block::Heading { level, text } => {
                let underline = match level {
                    1 => '=',
                    2 => '-',
                    _ => '~',
                };
                let _ = writeln!(out, "\n{text}");
                let _ = writeln!(out, "{}", underline.to_string().repeat(text.chars().count()));
            }
            Block::List { items } => {
                for item in items {
                    let _ = writeln!(out, "  • {}", spans_to_plain(item));
                }
            }
            Block::Paragraph { spans } => {
                let _ = writeln!(out, "{}", spans_to_plain(spans));
            }
        }
    }
    out
}

fn spans_to_plain(spans: &[Inline]) -> String {
    spans
        .iter()
        .map(|span| match span {
            Inline::Text(text) | Inline::Bold(text) => text.as_str(),
        })
        .collect()
}
