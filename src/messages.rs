//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use crate::config::CrosshairConfig;
use crate::debounce::DebounceKind;
use crate::host::{CursorPosition, DocumentId, TabChoice};

/// Editor focus and cursor notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMsg {
    /// A different editor gained focus (or none has focus)
    ActiveEditorChanged {
        document_id: Option<DocumentId>,
        cursor: Option<CursorPosition>,
    },
    /// The primary cursor moved
    SelectionChanged {
        document_id: DocumentId,
        cursor: CursorPosition,
    },
}

/// Document lifecycle notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentMsg {
    /// A document was opened (its id may be a reused one)
    Opened { document_id: DocumentId },
    /// The document text changed, whoever changed it
    Changed { document_id: DocumentId },
    /// The host is about to write the document
    WillSave { document_id: DocumentId },
    /// The host finished writing the document
    DidSave { document_id: DocumentId },
    /// The document is gone
    Closed { document_id: DocumentId },
}

/// Configuration notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigMsg {
    /// The resolved configuration changed
    Changed(CrosshairConfig),
}

/// Engine messages: the toggle command and async results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrosshairMsg {
    /// Flip the on/off switch
    Toggle,
    /// A debounce timer fired
    UpdateReady {
        document_id: DocumentId,
        kind: DebounceKind,
        generation: u64,
    },
    /// The host finished (or refused) an edit batch
    EditsApplied {
        ticket: u64,
        result: Result<(), String>,
    },
    /// The host drew (or failed to draw) a decoration set
    DecorationsApplied {
        document_id: DocumentId,
        result: Result<(), String>,
    },
    /// The user answered the tab prompt (`None` if dismissed)
    TabChoice {
        document_id: DocumentId,
        choice: Option<TabChoice>,
    },
}

/// Lifecycle of the engine itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMsg {
    /// The engine was loaded
    Activate,
    /// The engine is being unloaded
    Deactivate,
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Editor(EditorMsg),
    Document(DocumentMsg),
    Config(ConfigMsg),
    Crosshair(CrosshairMsg),
    App(AppMsg),
}

// Convenience constructors for common messages
impl Msg {
    pub fn toggle() -> Self {
        Msg::Crosshair(CrosshairMsg::Toggle)
    }

    pub fn cursor_moved(document_id: DocumentId, line: usize, column: usize) -> Self {
        Msg::Editor(EditorMsg::SelectionChanged {
            document_id,
            cursor: CursorPosition::new(line, column),
        })
    }

    pub fn focus(document_id: DocumentId, line: usize, column: usize) -> Self {
        Msg::Editor(EditorMsg::ActiveEditorChanged {
            document_id: Some(document_id),
            cursor: Some(CursorPosition::new(line, column)),
        })
    }

    pub fn changed(document_id: DocumentId) -> Self {
        Msg::Document(DocumentMsg::Changed { document_id })
    }
}
