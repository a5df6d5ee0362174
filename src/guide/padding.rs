//! Trailing-space padding and its retraction
//!
//! Padding makes every short line in the window reach the cursor column so
//! the column guide can be drawn there. Every run of spaces inserted is
//! recorded as an [`InjectedSpan`]; retraction only deletes a recorded run if
//! it still consists purely of spaces.

use super::LineWindow;
use crate::host::{CursorPosition, DocumentId, TextEdit, TextSource};
use crate::model::spans::InjectedSpan;

/// Edits to apply plus the spans they create once applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaddingPlan {
    pub edits: Vec<TextEdit>,
    pub spans: Vec<InjectedSpan>,
}

impl PaddingPlan {
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

/// Pad every window line shorter than the cursor column
///
/// Edits are listed in descending line order.
pub fn plan_padding(
    source: &impl TextSource,
    doc: DocumentId,
    cursor: CursorPosition,
    window: LineWindow,
) -> PaddingPlan {
    let Some(line_count) = source.line_count(doc) else {
        return PaddingPlan::default();
    };

    let mut plan = PaddingPlan::default();
    for line in window.lines().rev() {
        if line >= line_count {
            continue;
        }
        let Some(len) = source.line_len(doc, line) else {
            continue;
        };
        let missing = cursor.column.saturating_sub(len);
        if missing == 0 {
            continue;
        }
        plan.edits.push(TextEdit::Insert {
            line,
            column: len,
            text: " ".repeat(missing),
        });
        plan.spans.push(InjectedSpan {
            line,
            start_column: len,
            length: missing,
        });
    }
    plan
}

/// Whether the recorded range still holds nothing but spaces
pub fn span_is_intact(source: &impl TextSource, doc: DocumentId, span: &InjectedSpan) -> bool {
    if span.length == 0 {
        return false;
    }
    let Some(text) = source.line_text(doc, span.line) else {
        return false;
    };
    let mut run = text.chars().skip(span.start_column).take(span.length);
    let mut seen = 0;
    for ch in run.by_ref() {
        if ch != ' ' {
            return false;
        }
        seen += 1;
    }
    seen == span.length
}

/// Delete edits for every recorded span that is still intact
///
/// Stale spans (line gone, range shortened, or non-space content inside) are
/// skipped. Edits are sorted by descending (line, column) so applying them in
/// order never shifts a later one.
pub fn plan_retraction(
    source: &impl TextSource,
    doc: DocumentId,
    spans: &[InjectedSpan],
) -> Vec<TextEdit> {
    let mut valid: Vec<&InjectedSpan> = spans
        .iter()
        .filter(|span| {
            let intact = span_is_intact(source, doc, span);
            if !intact {
                tracing::debug!(
                    "Skipping stale span on doc={} line={} col={} len={}",
                    doc.0,
                    span.line,
                    span.start_column,
                    span.length
                );
            }
            intact
        })
        .collect();

    valid.sort_by(|a, b| {
        b.line
            .cmp(&a.line)
            .then(b.start_column.cmp(&a.start_column))
    });
    // Overlapping records on one line would double-delete
    valid.dedup_by(|later, earlier| {
        later.line == earlier.line && later.start_column + later.length > earlier.start_column
    });

    valid
        .into_iter()
        .map(|span| TextEdit::Delete {
            line: span.line,
            start: span.start_column,
            end: span.start_column + span.length,
        })
        .collect()
}

/// First window line containing a tab character
pub fn find_tab_in_window(
    source: &impl TextSource,
    doc: DocumentId,
    window: LineWindow,
) -> Option<usize> {
    window.lines().find(|&line| {
        source
            .line_text(doc, line)
            .is_some_and(|text| text.contains('\t'))
    })
}

/// Expand tabs to spaces, honoring tab stops
pub fn expand_tabs(text: &str, tab_size: usize) -> String {
    let tab_size = tab_size.max(1);
    let mut result = String::with_capacity(text.len() * 2);
    let mut visual_col = 0;

    for ch in text.chars() {
        if ch == '\t' {
            let spaces = tab_size - (visual_col % tab_size);
            for _ in 0..spaces {
                result.push(' ');
            }
            visual_col += spaces;
        } else {
            result.push(ch);
            visual_col += 1;
        }
    }

    result
}

/// Replace every line of the document that contains a tab
pub fn plan_tab_expansion(
    source: &impl TextSource,
    doc: DocumentId,
    tab_size: usize,
) -> Vec<TextEdit> {
    let Some(line_count) = source.line_count(doc) else {
        return Vec::new();
    };

    (0..line_count)
        .rev()
        .filter_map(|line| {
            let text = source.line_text(doc, line)?;
            if !text.contains('\t') {
                return None;
            }
            Some(TextEdit::Replace {
                line,
                start: 0,
                end: text.chars().count(),
                text: expand_tabs(&text, tab_size),
            })
        })
        .collect()
}
