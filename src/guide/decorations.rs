//! Guide decorations handed to the rendering surface

use serde::Serialize;

use super::LineWindow;
use crate::config::CrosshairConfig;
use crate::host::{CursorPosition, DocumentId, TextSource};

/// Border widths in CSS order: top, right, bottom, left
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BorderSpec {
    pub widths: [String; 4],
    pub color: String,
    /// Whether the border spans the whole line regardless of the range
    pub whole_line: bool,
}

/// Styling for both guides, derived from configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuideStyle {
    pub color: String,
    pub width: String,
}

impl Default for GuideStyle {
    fn default() -> Self {
        Self::from_config(&CrosshairConfig::default())
    }
}

impl GuideStyle {
    pub fn from_config(config: &CrosshairConfig) -> Self {
        Self {
            color: config.border_color.clone(),
            width: config.border_width.clone(),
        }
    }

    /// Horizontal guide: a bottom border under the whole cursor line
    pub fn line_border(&self) -> BorderSpec {
        BorderSpec {
            widths: [
                "0".to_string(),
                "0".to_string(),
                self.width.clone(),
                "0".to_string(),
            ],
            color: self.color.clone(),
            whole_line: true,
        }
    }

    /// Vertical guide: a right border on each zero-width column marker
    pub fn column_border(&self) -> BorderSpec {
        BorderSpec {
            widths: [
                "0".to_string(),
                self.width.clone(),
                "0".to_string(),
                "0".to_string(),
            ],
            color: self.color.clone(),
            whole_line: false,
        }
    }
}

/// Both decoration sets for one document
///
/// Every marker is a zero-width range at the given position. Sets are
/// replaced wholesale on each update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Decorations {
    /// Marker for the horizontal guide (at most one)
    pub line: Vec<CursorPosition>,
    /// Markers for the vertical guide, one per window line
    pub columns: Vec<CursorPosition>,
    pub style: GuideStyle,
}

impl Decorations {
    /// No guides at all
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty() && self.columns.is_empty()
    }
}

/// Place the line marker at the cursor and a column marker on every window line
///
/// A line too short for the cursor column gets its marker at its own end;
/// an empty short line gets none, so the guide never collapses to the margin.
pub fn build_decorations(
    source: &impl TextSource,
    doc: DocumentId,
    cursor: CursorPosition,
    window: LineWindow,
    style: &GuideStyle,
) -> Decorations {
    let line_count = source.line_count(doc).unwrap_or(0);
    let columns = window
        .lines()
        .filter(|&line| line < line_count)
        .filter_map(|line| {
            let len = source.line_len(doc, line)?;
            if len >= cursor.column {
                Some(CursorPosition::new(line, cursor.column))
            } else if len > 0 {
                Some(CursorPosition::new(line, len))
            } else {
                None
            }
        })
        .collect();

    Decorations {
        line: vec![cursor],
        columns,
        style: style.clone(),
    }
}
