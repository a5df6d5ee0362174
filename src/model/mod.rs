//! Engine model - the complete state of the crosshair
//!
//! This module contains all the state types following the Elm Architecture pattern.

pub mod phase;
pub mod spans;
pub mod status_bar;

pub use phase::{Job, JobKind, PendingAction, Phase, PhaseKind, Step, Wait};
pub use spans::{InjectedSpan, SpanLedger};
pub use status_bar::{StatusIndicator, StatusState, TransientMessage};

use std::collections::{HashMap, HashSet};

use crate::config::CrosshairConfig;
use crate::debounce::Debouncer;
use crate::host::{CursorPosition, DocumentId};

/// Cursor and document version the guides were last drawn for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedState {
    pub cursor: CursorPosition,
    pub version: Option<u64>,
}

/// The complete engine model
#[derive(Debug)]
pub struct CrosshairModel {
    /// Cached configuration snapshot
    pub config: CrosshairConfig,
    pub phase: Phase,
    /// Padding the engine inserted, per document
    pub spans: SpanLedger,
    /// Focused document, if any
    pub active: Option<DocumentId>,
    /// Last known cursor per document
    pub cursors: HashMap<DocumentId, CursorPosition>,
    /// What each document's guides were last drawn for
    pub applied: HashMap<DocumentId, AppliedState>,
    /// Documents that currently carry guide decorations
    pub decorated: HashSet<DocumentId>,
    /// Documents between will-save and did-save, with the cursor at will-save
    pub saving: HashMap<DocumentId, CursorPosition>,
    pub debouncer: Debouncer,
    /// Requested while a job was running
    pub pending: Option<PendingAction>,
    pub status: StatusState,
    next_ticket: u64,
}

impl CrosshairModel {
    pub fn new(config: CrosshairConfig) -> Self {
        let phase = if config.enabled {
            Phase::Idle
        } else {
            Phase::Disabled
        };
        Self {
            status: StatusState::new(config.enabled),
            config,
            phase,
            spans: SpanLedger::new(),
            active: None,
            cursors: HashMap::new(),
            applied: HashMap::new(),
            decorated: HashSet::new(),
            saving: HashMap::new(),
            debouncer: Debouncer::new(),
            pending: None,
            next_ticket: 0,
        }
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    /// Whether the on/off switch is on (a disable job may still be running)
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Last known cursor for a document, or the document start
    pub fn cursor(&self, doc: DocumentId) -> CursorPosition {
        self.cursors.get(&doc).copied().unwrap_or_default()
    }

    /// Ticket for the next edit batch
    pub fn next_ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }

    /// Drop spans, guide records and timers for a document without touching the text
    pub fn reset_document(&mut self, doc: DocumentId) {
        let dropped = self.spans.forget(doc);
        if dropped > 0 {
            tracing::debug!("Forgot {} spans for doc={}", dropped, doc.0);
        }
        self.applied.remove(&doc);
        self.decorated.remove(&doc);
        self.saving.remove(&doc);
        self.debouncer.cancel(doc);
        if let Some(job) = self.phase.job_mut() {
            job.forget_document(doc);
        }
    }

    /// Drop every piece of per-document state, focus included
    pub fn forget_document(&mut self, doc: DocumentId) {
        self.reset_document(doc);
        self.cursors.remove(&doc);
        if self.active == Some(doc) {
            self.active = None;
        }
    }

    /// Whether the guides already match the cursor and text
    pub fn is_up_to_date(
        &self,
        doc: DocumentId,
        cursor: CursorPosition,
        version: Option<u64>,
    ) -> bool {
        self.applied.get(&doc) == Some(&AppliedState { cursor, version })
    }
}
