//! Engine phase and the job queue that runs while updating
//!
//! ```text
//! Disabled ──toggle──▶ Idle ──debounce fired──▶ Updating(job) ──done──▶ Idle
//!    ▲                   │                            │
//!    └──── Disable job ◀─┴──────────── toggle (deferred until the job ends)
//! ```
//!
//! A job is a queue of steps. Steps that edit the document pause the job
//! until the host acknowledges the edit; the tab prompt pauses it until the
//! user answers. Nothing else may start while a job is in flight.

use std::collections::VecDeque;

use super::spans::InjectedSpan;
use crate::host::{CursorPosition, DocumentId};

/// One unit of work inside a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Delete a document's intact injected spans
    Retract(DocumentId),
    /// Expand every tab in a document to spaces
    ConvertTabs(DocumentId),
    /// Pad short window lines up to the cursor column
    Inject {
        doc: DocumentId,
        cursor: CursorPosition,
    },
    /// Place both guide sets for the cursor
    Decorate {
        doc: DocumentId,
        cursor: CursorPosition,
    },
    /// Remove both guide sets
    Clear(DocumentId),
}

impl Step {
    pub fn document(&self) -> DocumentId {
        match self {
            Step::Retract(doc) | Step::ConvertTabs(doc) | Step::Clear(doc) => *doc,
            Step::Inject { doc, .. } | Step::Decorate { doc, .. } => *doc,
        }
    }
}

/// What a paused job is waiting for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wait {
    /// Acknowledgement of an edit batch
    ///
    /// `record` becomes tracked spans on success, `restore` goes back into the
    /// ledger if the host refused the batch.
    Edits {
        ticket: u64,
        doc: DocumentId,
        record: Vec<InjectedSpan>,
        restore: Vec<InjectedSpan>,
    },
    /// The user's answer to the tab prompt
    TabChoice { doc: DocumentId },
}

/// Why a job runs, which decides where it ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    /// Redraw the guides for the active document
    Refresh,
    /// Strip padding before the host writes a document
    Save,
    /// Strip everything and end disabled
    Disable,
    /// Strip everything on deactivation, leaving configuration alone
    Shutdown,
}

impl JobKind {
    /// Host failures skip one step instead of abandoning the job
    pub fn is_best_effort(self) -> bool {
        matches!(self, JobKind::Disable | JobKind::Shutdown)
    }

    /// Whether the engine is disabled once the job ends
    pub fn ends_disabled(self) -> bool {
        matches!(self, JobKind::Disable | JobKind::Shutdown)
    }
}

/// A queued sequence of steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub kind: JobKind,
    pub steps: VecDeque<Step>,
    pub waiting: Option<Wait>,
}

impl Job {
    pub fn new(kind: JobKind, steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            kind,
            steps: steps.into_iter().collect(),
            waiting: None,
        }
    }

    /// Retract, pad, then decorate one document
    pub fn refresh(doc: DocumentId, cursor: CursorPosition) -> Self {
        Self::new(
            JobKind::Refresh,
            [
                Step::Retract(doc),
                Step::Inject { doc, cursor },
                Step::Decorate { doc, cursor },
            ],
        )
    }

    /// Drop every remaining step for a closed document
    ///
    /// A pending edit acknowledgement for it will no longer record spans, and
    /// a pending tab prompt for it is abandoned. The job must then be driven
    /// again, since nothing else will wake it.
    pub fn forget_document(&mut self, doc: DocumentId) {
        self.steps.retain(|step| step.document() != doc);
        match &mut self.waiting {
            Some(Wait::Edits {
                doc: waiting_doc,
                record,
                restore,
                ..
            }) if *waiting_doc == doc => {
                record.clear();
                restore.clear();
            }
            Some(Wait::TabChoice { doc: waiting_doc }) if *waiting_doc == doc => {
                self.waiting = None;
            }
            _ => {}
        }
    }
}

/// Coarse engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Disabled,
    Idle,
    Updating,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Disabled,
    Idle,
    Updating(Job),
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Disabled => PhaseKind::Disabled,
            Phase::Idle => PhaseKind::Idle,
            Phase::Updating(_) => PhaseKind::Updating,
        }
    }

    pub fn job(&self) -> Option<&Job> {
        match self {
            Phase::Updating(job) => Some(job),
            _ => None,
        }
    }

    pub fn job_mut(&mut self) -> Option<&mut Job> {
        match self {
            Phase::Updating(job) => Some(job),
            _ => None,
        }
    }
}

/// Something requested while a job was in flight, run when it ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Enable {
        persist: bool,
    },
    Disable {
        persist: bool,
        message: Option<String>,
    },
    Shutdown,
}
