//! Status bar state - the toggle indicator and transient messages

use std::time::{Duration, Instant};

use crate::commands::CommandId;

/// How long informational messages stay visible
pub const MESSAGE_DURATION_MS: u64 = 4000;

/// The clickable status bar item bound to the toggle command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusIndicator {
    /// Text shown in the status bar
    pub text: String,
    /// Hover text
    pub tooltip: String,
    /// Command run when the item is clicked
    pub command: CommandId,
}

impl StatusIndicator {
    /// Indicator for the given on/off state
    pub fn for_state(enabled: bool) -> Self {
        let (text, tooltip) = if enabled {
            ("Crosshair: On", "Click to hide the cursor crosshair")
        } else {
            ("Crosshair: Off", "Click to show the cursor crosshair")
        };
        Self {
            text: text.to_string(),
            tooltip: tooltip.to_string(),
            command: CommandId::ToggleCrosshair,
        }
    }
}

/// A transient status message that auto-expires
#[derive(Debug, Clone)]
pub struct TransientMessage {
    /// The message text
    pub text: String,
    /// When this message expires
    pub expires_at: Instant,
}

impl TransientMessage {
    /// Create a new transient message with the given duration
    pub fn new(text: impl Into<String>, duration: Duration) -> Self {
        Self {
            text: text.into(),
            expires_at: Instant::now() + duration,
        }
    }

    /// Check if this message has expired
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Everything the engine shows outside the text area
#[derive(Debug, Clone)]
pub struct StatusState {
    pub indicator: StatusIndicator,
    pub message: Option<TransientMessage>,
}

impl StatusState {
    pub fn new(enabled: bool) -> Self {
        Self {
            indicator: StatusIndicator::for_state(enabled),
            message: None,
        }
    }

    /// Refresh the indicator; returns true if it changed
    pub fn sync(&mut self, enabled: bool) -> bool {
        let next = StatusIndicator::for_state(enabled);
        if next == self.indicator {
            return false;
        }
        self.indicator = next;
        true
    }

    /// Current message text, if it has not expired
    pub fn current_message(&self) -> Option<&str> {
        self.message
            .as_ref()
            .filter(|m| !m.is_expired())
            .map(|m| m.text.as_str())
    }
}
