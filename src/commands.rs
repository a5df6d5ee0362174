//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

use crate::debounce::DebounceKind;
use crate::guide::Decorations;
use crate::host::{DocumentId, TextEdit};
use crate::model::status_bar::StatusIndicator;

// ============================================================================
// Command Registry
// ============================================================================

/// Identifies a user-invocable command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    ToggleCrosshair,
}

impl CommandId {
    /// Stable identifier hosts bind keys and menu entries to
    pub fn name(self) -> &'static str {
        match self {
            CommandId::ToggleCrosshair => "crosshair.toggle",
        }
    }
}

/// A command definition for menus and palettes
#[derive(Debug, Clone)]
pub struct CommandDef {
    pub id: CommandId,
    pub label: &'static str,
    pub keybinding: Option<&'static str>,
}

/// Static registry of all available commands
pub static COMMANDS: &[CommandDef] = &[CommandDef {
    id: CommandId::ToggleCrosshair,
    label: "Crosshair: Toggle",
    keybinding: None,
}];

/// Look up a command by its stable name
pub fn find_command(name: &str) -> Option<&'static CommandDef> {
    COMMANDS.iter().find(|def| def.id.name() == name)
}

// ============================================================================
// Side Effects
// ============================================================================

/// Commands returned by update functions
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// No command
    None,
    /// Execute multiple commands in order
    Batch(Vec<Cmd>),
    /// Fire `CrosshairMsg::UpdateReady` after a delay
    DebouncedUpdate {
        document_id: DocumentId,
        kind: DebounceKind,
        generation: u64,
        delay_ms: u64,
    },
    /// Apply an edit batch, then answer with `CrosshairMsg::EditsApplied`
    ApplyEdits {
        document_id: DocumentId,
        edits: Vec<TextEdit>,
        ticket: u64,
    },
    /// Replace both guide sets, then answer with `CrosshairMsg::DecorationsApplied`
    SetDecorations {
        document_id: DocumentId,
        decorations: Decorations,
    },
    /// Show a transient informational message
    ShowMessage { text: String, duration_ms: u64 },
    /// Ask about tabs, then answer with `CrosshairMsg::TabChoice`
    PromptTabPolicy { document_id: DocumentId },
    /// Write the on/off switch to configuration
    PersistEnabled(bool),
    /// Push the status indicator to the host
    UpdateIndicator(StatusIndicator),
}

impl Cmd {
    /// Combine commands, dropping empty ones
    ///
    /// Returns `None` if nothing is left and the single command unwrapped
    /// if only one is.
    pub fn batch(cmds: Vec<Cmd>) -> Option<Cmd> {
        let mut cmds: Vec<Cmd> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => None,
            1 => cmds.pop(),
            _ => Some(Cmd::Batch(cmds)),
        }
    }

    pub fn is_none(&self) -> bool {
        match self {
            Cmd::None => true,
            Cmd::Batch(cmds) => cmds.iter().all(Cmd::is_none),
            _ => false,
        }
    }

    /// All leaf commands in execution order
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::None => Vec::new(),
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            cmd => vec![cmd],
        }
    }
}

impl From<Option<Cmd>> for Cmd {
    fn from(cmd: Option<Cmd>) -> Self {
        cmd.unwrap_or(Cmd::None)
    }
}
