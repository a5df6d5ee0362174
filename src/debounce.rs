//! Cancel-and-reschedule debouncing by generation
//!
//! Each (document, kind) pair has a generation counter. Scheduling bumps it
//! and hands the new value to the timer; when the timer fires, the value is
//! compared with the current one and stale timers are dropped.

use std::collections::HashMap;

use crate::host::DocumentId;

/// Debounce delay after cursor movement, in milliseconds
pub const SELECTION_DEBOUNCE_MS: u64 = 50;

/// Which trigger a timer belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebounceKind {
    /// Cursor movement, editor switch, document open
    Selection,
    /// Document edits (delay from `refreshRate`)
    Edit,
}

#[derive(Debug, Clone, Default)]
pub struct Debouncer {
    /// Shared across keys so a reused document id never revives an old timer
    next_generation: u64,
    pending: HashMap<(DocumentId, DebounceKind), u64>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidate any pending timer and return the generation for a new one
    pub fn bump(&mut self, doc: DocumentId, kind: DebounceKind) -> u64 {
        self.next_generation += 1;
        self.pending.insert((doc, kind), self.next_generation);
        self.next_generation
    }

    /// Whether a fired timer is still the latest one
    pub fn is_current(&self, doc: DocumentId, kind: DebounceKind, generation: u64) -> bool {
        self.pending.get(&(doc, kind)) == Some(&generation)
    }

    /// Mark a fired timer as consumed
    pub fn complete(&mut self, doc: DocumentId, kind: DebounceKind, generation: u64) {
        if self.is_current(doc, kind, generation) {
            self.pending.remove(&(doc, kind));
        }
    }

    /// Invalidate every pending timer for a document
    pub fn cancel(&mut self, doc: DocumentId) {
        self.pending.retain(|(d, _), _| *d != doc);
    }

    /// Whether any timer is pending for a document
    pub fn has_pending(&self, doc: DocumentId) -> bool {
        self.pending.keys().any(|(d, _)| *d == doc)
    }
}
