//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::time::Duration;

use crosshair::config::{ConfigStore, PartialConfig};
use crosshair::host::{Document, DocumentId, MemoryHost};
use crosshair::messages::{DocumentMsg, Msg};
use crosshair::Runtime;

/// Upper bound for background timers to drain
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Enabled config with a short edit debounce
pub fn fast_config() -> PartialConfig {
    PartialConfig {
        enabled: Some(true),
        refresh_rate: Some(20),
        ..Default::default()
    }
}

/// Runtime over an in-memory host and an in-memory config
pub fn test_runtime(config: PartialConfig) -> Runtime<MemoryHost> {
    let mut runtime = Runtime::new(MemoryHost::new(), ConfigStore::in_memory(config));
    runtime.activate();
    runtime
}

/// Open a scratch document and announce it
pub fn open(runtime: &mut Runtime<MemoryHost>, text: &str) -> DocumentId {
    let doc = runtime.host_mut().open(Document::with_text(text));
    runtime.dispatch(Msg::Document(DocumentMsg::Opened { document_id: doc }));
    doc
}

/// Focus a document with the cursor at (line, column) and wait for the guides
pub fn focus(runtime: &mut Runtime<MemoryHost>, doc: DocumentId, line: usize, column: usize) {
    runtime.dispatch(Msg::focus(doc, line, column));
    settle(runtime);
}

/// Move the cursor within the active document and wait for the guides
pub fn move_to(runtime: &mut Runtime<MemoryHost>, doc: DocumentId, line: usize, column: usize) {
    runtime.dispatch(Msg::cursor_moved(doc, line, column));
    settle(runtime);
}

/// Wait until every timer has fired and every message is handled
pub fn settle(runtime: &mut Runtime<MemoryHost>) {
    assert!(
        runtime.run_until_idle(IDLE_TIMEOUT),
        "runtime did not go idle"
    );
}

pub fn text(runtime: &Runtime<MemoryHost>, doc: DocumentId) -> String {
    runtime.host().text(doc).unwrap_or_default()
}
