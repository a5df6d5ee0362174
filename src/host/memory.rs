//! In-memory host backed by ropey documents
//!
//! Used by the `crosshair` binary and by tests. It applies edits for real,
//! records every decoration set and message it receives, and answers the
//! tab prompt from a scripted queue.

use std::borrow::Cow;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use ropey::Rope;

use super::{DocumentId, Host, TabChoice, TextEdit, TextSource};
use crate::guide::Decorations;
use crate::messages::{DocumentMsg, Msg};
use crate::model::status_bar::StatusIndicator;

/// A text buffer plus the file it came from
#[derive(Debug, Clone)]
pub struct Document {
    /// The text buffer
    pub buffer: Rope,
    /// Path to the file on disk (None for scratch documents)
    pub file_path: Option<PathBuf>,
    /// Whether the buffer has unsaved changes
    pub is_modified: bool,
    /// Edit counter, bumped once per applied batch
    pub version: u64,
}

impl Document {
    /// Create a document with initial text
    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            file_path: None,
            is_modified: false,
            version: 0,
        }
    }

    /// Load a document from a file path
    pub fn from_file(path: PathBuf) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(&path)?;
        Ok(Self {
            buffer: Rope::from(content),
            file_path: Some(path),
            is_modified: false,
            version: 0,
        })
    }

    /// Get the number of lines in the document
    pub fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    /// Get line content as Cow<str> without its terminator
    ///
    /// Returns Cow::Borrowed if the line is stored contiguously in a single chunk.
    pub fn line_cow(&self, line_idx: usize) -> Option<Cow<'_, str>> {
        if line_idx >= self.buffer.len_lines() {
            return None;
        }

        let line = self.buffer.line(line_idx);
        let len = line.len_chars();

        let trim_len = if len > 0 && line.char(len - 1) == '\n' {
            if len > 1 && line.char(len - 2) == '\r' {
                2 // CRLF
            } else {
                1 // LF
            }
        } else {
            0
        };

        let trimmed = line.slice(..len - trim_len);
        match trimmed.as_str() {
            Some(s) => Some(Cow::Borrowed(s)),
            None => Some(Cow::Owned(trimmed.to_string())),
        }
    }

    /// Get the length of a line (excluding the terminator)
    pub fn line_length(&self, line_idx: usize) -> usize {
        self.line_cow(line_idx)
            .map(|line| line.chars().count())
            .unwrap_or(0)
    }

    /// Apply a single edit, validating that it stays inside its line
    pub fn apply_edit(&mut self, edit: &TextEdit) -> Result<()> {
        let line = edit.line();
        if line >= self.line_count() {
            bail!("line {} out of range ({} lines)", line, self.line_count());
        }
        let line_len = self.line_length(line);
        let line_start = self.buffer.line_to_char(line);

        match edit {
            TextEdit::Insert { column, text, .. } => {
                if *column > line_len {
                    bail!("insert column {} past end of line {}", column, line);
                }
                self.buffer.insert(line_start + column, text);
            }
            TextEdit::Delete { start, end, .. } => {
                if start > end || *end > line_len {
                    bail!("delete range {}..{} invalid on line {}", start, end, line);
                }
                self.buffer.remove(line_start + start..line_start + end);
            }
            TextEdit::Replace {
                start, end, text, ..
            } => {
                if start > end || *end > line_len {
                    bail!("replace range {}..{} invalid on line {}", start, end, line);
                }
                self.buffer.remove(line_start + start..line_start + end);
                self.buffer.insert(line_start + start, text);
            }
        }
        Ok(())
    }
}

/// Host that keeps everything in memory
#[derive(Debug, Default)]
pub struct MemoryHost {
    documents: HashMap<DocumentId, Document>,
    next_id: u64,
    /// Last decoration set per document
    pub decorations: HashMap<DocumentId, Decorations>,
    /// Every status message shown, oldest first
    pub messages: Vec<String>,
    /// Every applied edit batch, oldest first
    pub edit_log: Vec<(DocumentId, Vec<TextEdit>)>,
    /// Answers handed out by `choose_tab_policy`, front first
    pub tab_answers: VecDeque<Option<TabChoice>>,
    /// Number of times the tab prompt was shown
    pub prompts_shown: usize,
    /// Last indicator pushed by the engine
    pub indicator: Option<StatusIndicator>,
    /// Reject the next `n` edit batches
    pub reject_edits: usize,
    /// Reject the next `n` decoration sets
    pub reject_decorations: usize,
    events: Option<Sender<Msg>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Echo a `DocumentMsg::Changed` on this channel for every applied batch
    pub fn set_event_sender(&mut self, tx: Sender<Msg>) {
        self.events = Some(tx);
    }

    /// Add a document and return its id
    pub fn open(&mut self, document: Document) -> DocumentId {
        self.next_id += 1;
        let id = DocumentId(self.next_id);
        self.documents.insert(id, document);
        id
    }

    /// Add a document under a caller-chosen id (replaces any existing one)
    pub fn open_as(&mut self, id: DocumentId, document: Document) {
        self.next_id = self.next_id.max(id.0);
        self.documents.insert(id, document);
    }

    /// Drop a document
    pub fn close(&mut self, id: DocumentId) -> Option<Document> {
        self.decorations.remove(&id);
        self.documents.remove(&id)
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(&id)
    }

    /// Edit a document as the user would, bumping its version
    pub fn user_edit(&mut self, id: DocumentId, edit: &TextEdit) -> Result<()> {
        let doc = self
            .documents
            .get_mut(&id)
            .ok_or_else(|| anyhow!("unknown document {}", id.0))?;
        doc.apply_edit(edit)?;
        doc.version += 1;
        doc.is_modified = true;
        Ok(())
    }

    /// Full text of a document
    pub fn text(&self, id: DocumentId) -> Option<String> {
        self.documents.get(&id).map(|doc| doc.buffer.to_string())
    }

    /// Write a document to its file path
    pub fn save(&mut self, id: DocumentId) -> Result<PathBuf> {
        let doc = self
            .documents
            .get_mut(&id)
            .ok_or_else(|| anyhow!("unknown document {}", id.0))?;
        let path = doc
            .file_path
            .clone()
            .ok_or_else(|| anyhow!("document {} has no file path", id.0))?;
        std::fs::write(&path, doc.buffer.to_string())?;
        doc.is_modified = false;
        tracing::info!("Saved {}", path.display());
        Ok(path)
    }
}

impl TextSource for MemoryHost {
    fn line_count(&self, doc: DocumentId) -> Option<usize> {
        self.documents.get(&doc).map(Document::line_count)
    }

    fn line_text(&self, doc: DocumentId, line: usize) -> Option<Cow<'_, str>> {
        self.documents.get(&doc)?.line_cow(line)
    }

    fn version(&self, doc: DocumentId) -> Option<u64> {
        self.documents.get(&doc).map(|d| d.version)
    }
}

impl Host for MemoryHost {
    fn apply_edits(&mut self, doc: DocumentId, edits: &[TextEdit]) -> Result<()> {
        if self.reject_edits > 0 {
            self.reject_edits -= 1;
            bail!("edit rejected by host");
        }

        let document = self
            .documents
            .get(&doc)
            .ok_or_else(|| anyhow!("unknown document {}", doc.0))?;

        // Work on a copy so a failing edit leaves the document untouched
        let mut scratch = document.clone();
        for edit in edits {
            scratch.apply_edit(edit)?;
        }
        scratch.version += 1;
        scratch.is_modified = true;
        self.documents.insert(doc, scratch);
        self.edit_log.push((doc, edits.to_vec()));

        if let Some(tx) = &self.events {
            let _ = tx.send(Msg::Document(DocumentMsg::Changed { document_id: doc }));
        }
        Ok(())
    }

    fn set_decorations(&mut self, doc: DocumentId, decorations: &Decorations) -> Result<()> {
        if self.reject_decorations > 0 {
            self.reject_decorations -= 1;
            bail!("decorations rejected by host");
        }
        if !self.documents.contains_key(&doc) {
            bail!("no editor for document {}", doc.0);
        }
        self.decorations.insert(doc, decorations.clone());
        Ok(())
    }

    fn show_message(&mut self, text: &str, _duration: Duration) {
        self.messages.push(text.to_string());
    }

    fn choose_tab_policy(&mut self, _doc: DocumentId) -> Option<TabChoice> {
        self.prompts_shown += 1;
        self.tab_answers.pop_front().flatten()
    }

    fn indicator_changed(&mut self, indicator: &StatusIndicator) {
        self.indicator = Some(indicator.clone());
    }

    fn attach(&mut self, events: Sender<Msg>) {
        self.set_event_sender(events);
    }
}
