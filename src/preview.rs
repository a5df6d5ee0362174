//! Plain-text and JSON renderings of the guides on a document
//!
//! Used by the `crosshair` binary to show what the engine drew.

use serde::Serialize;

use crate::guide::{Decorations, LineWindow};
use crate::host::{CursorPosition, DocumentId, TextSource};
use crate::model::InjectedSpan;

/// Drawn in place of an injected space
const PAD_CHAR: char = '·';
/// Drawn at each column marker
const COLUMN_CHAR: char = '│';
/// Drawn under the cursor line
const LINE_CHAR: char = '─';

#[derive(Debug, Serialize)]
pub struct PreviewDump {
    pub file: Option<String>,
    pub enabled: bool,
    pub cursor: CursorPosition,
    pub window: WindowDump,
    pub decorations: Decorations,
    pub spans: Vec<InjectedSpan>,
    pub messages: Vec<String>,
    /// Status message still on screen, if any
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WindowDump {
    pub start: usize,
    pub end: usize,
}

impl From<LineWindow> for WindowDump {
    fn from(window: LineWindow) -> Self {
        Self {
            start: window.start,
            end: window.end,
        }
    }
}

/// Render the window lines with padding and both guides made visible
pub fn render_text(
    source: &impl TextSource,
    doc: DocumentId,
    window: LineWindow,
    decorations: &Decorations,
    spans: &[InjectedSpan],
) -> String {
    let cursor_line = decorations.line.first().map(|pos| pos.line);
    let gutter = window.end.to_string().len();
    let mut out = String::new();
    let mut widest = 0;

    for line in window.lines() {
        let Some(text) = source.line_text(doc, line) else {
            continue;
        };
        let marker = decorations
            .columns
            .iter()
            .find(|pos| pos.line == line)
            .map(|pos| pos.column);

        let mut rendered = String::new();
        let mut width = 0;
        for (col, ch) in text.chars().enumerate() {
            if marker == Some(col) {
                rendered.push(COLUMN_CHAR);
                width += 1;
            }
            let padded = spans
                .iter()
                .any(|s| s.line == line && col >= s.start_column && col < s.start_column + s.length);
            rendered.push(if padded { PAD_CHAR } else { ch });
            width += 1;
        }
        if marker.is_some_and(|col| col >= text.chars().count()) {
            rendered.push(COLUMN_CHAR);
            width += 1;
        }
        widest = widest.max(width);

        let pointer = if cursor_line == Some(line) { '>' } else { ' ' };
        out.push_str(&format!(
            "{}{:>width$} │ {}\n",
            pointer,
            line + 1,
            rendered,
            width = gutter
        ));
        if cursor_line == Some(line) {
            out.push_str(&format!(
                " {:>width$} │ {}\n",
                "",
                LINE_CHAR.to_string().repeat(widest.max(1)),
                width = gutter
            ));
        }
    }
    out
}
