//! Bookkeeping for padding the engine inserted

use std::collections::HashMap;

use serde::Serialize;

use crate::host::DocumentId;

/// A run of spaces the engine inserted to pad a short line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InjectedSpan {
    pub line: usize,
    pub start_column: usize,
    pub length: usize,
}

/// Injected spans per document
#[derive(Debug, Clone, Default)]
pub struct SpanLedger {
    spans: HashMap<DocumentId, Vec<InjectedSpan>>,
}

impl SpanLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record spans that were just inserted
    pub fn record(&mut self, doc: DocumentId, spans: impl IntoIterator<Item = InjectedSpan>) {
        let entry = self.spans.entry(doc).or_default();
        entry.extend(spans);
        if entry.is_empty() {
            self.spans.remove(&doc);
        }
    }

    /// Remove and return every span recorded for a document
    pub fn take(&mut self, doc: DocumentId) -> Vec<InjectedSpan> {
        self.spans.remove(&doc).unwrap_or_default()
    }

    /// Spans currently recorded for a document
    pub fn spans(&self, doc: DocumentId) -> &[InjectedSpan] {
        self.spans.get(&doc).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Drop a document's spans without touching its text
    pub fn forget(&mut self, doc: DocumentId) -> usize {
        self.spans.remove(&doc).map(|s| s.len()).unwrap_or(0)
    }

    /// Documents that currently have spans, in id order
    pub fn documents(&self) -> Vec<DocumentId> {
        let mut docs: Vec<DocumentId> = self.spans.keys().copied().collect();
        docs.sort();
        docs
    }

    pub fn total(&self) -> usize {
        self.spans.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}
