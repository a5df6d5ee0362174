//! Host collaborator seams
//!
//! The engine never owns documents. It reads them through [`TextSource`]
//! while handling a message, and asks the runtime to mutate them by
//! returning commands. The runtime executes those commands against a
//! [`Host`].

pub mod memory;

use std::borrow::Cow;
use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::guide::Decorations;
use crate::messages::Msg;
use crate::model::status_bar::StatusIndicator;

pub use memory::{Document, MemoryHost};

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub u64);

/// A cursor position in (line, column) format, both 0-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
pub struct CursorPosition {
    pub line: usize,
    pub column: usize,
}

impl CursorPosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

// ============================================================================
// Edits
// ============================================================================

/// A single text edit against one line of a document
///
/// Columns are char offsets within the line, excluding the line terminator.
/// A batch of edits is applied in the order given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEdit {
    /// Insert text at a position
    Insert {
        line: usize,
        column: usize,
        text: String,
    },
    /// Delete the half-open column range `[start, end)`
    Delete { line: usize, start: usize, end: usize },
    /// Replace the half-open column range `[start, end)` with text
    Replace {
        line: usize,
        start: usize,
        end: usize,
        text: String,
    },
}

impl TextEdit {
    /// Line this edit touches
    pub fn line(&self) -> usize {
        match self {
            TextEdit::Insert { line, .. }
            | TextEdit::Delete { line, .. }
            | TextEdit::Replace { line, .. } => *line,
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Read-only view of the host's documents
///
/// All methods return `None` for documents the host does not know about.
pub trait TextSource {
    /// Number of lines in the document
    fn line_count(&self, doc: DocumentId) -> Option<usize>;

    /// Text of a line without its terminator
    fn line_text(&self, doc: DocumentId, line: usize) -> Option<Cow<'_, str>>;

    /// Monotonic edit counter for the document
    fn version(&self, doc: DocumentId) -> Option<u64>;

    /// Char length of a line without its terminator
    fn line_len(&self, doc: DocumentId, line: usize) -> Option<usize> {
        self.line_text(doc, line).map(|text| text.chars().count())
    }
}

/// User's answer when tabs are found inside the guide window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabChoice {
    /// Expand every tab in the document to spaces
    Convert,
    /// Turn the crosshair off
    Disable,
}

/// The editor the engine is embedded in
///
/// Change notifications for edits requested through [`Host::apply_edits`]
/// must reach the engine before the runtime acknowledges the edit.
pub trait Host: TextSource {
    /// Apply a batch of edits atomically
    ///
    /// # Errors
    /// Returns an error if the host rejected the batch. No edit of the batch
    /// may have been applied in that case.
    fn apply_edits(&mut self, doc: DocumentId, edits: &[TextEdit]) -> anyhow::Result<()>;

    /// Replace both guide decoration sets for a document
    ///
    /// # Errors
    /// Returns an error if the rendering surface is unavailable.
    fn set_decorations(&mut self, doc: DocumentId, decorations: &Decorations)
        -> anyhow::Result<()>;

    /// Show a transient status message
    fn show_message(&mut self, text: &str, duration: Duration);

    /// Ask the user how to handle tabs in the guide window
    ///
    /// `None` means the prompt was dismissed.
    fn choose_tab_policy(&mut self, doc: DocumentId) -> Option<TabChoice>;

    /// The status indicator text or tooltip changed
    fn indicator_changed(&mut self, _indicator: &StatusIndicator) {}

    /// Channel for the host's own notifications, handed over by the runtime
    fn attach(&mut self, _events: Sender<Msg>) {}
}
