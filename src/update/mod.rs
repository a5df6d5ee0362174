//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod app;
mod config;
mod crosshair;
mod document;
mod editor;
mod job;

use crate::commands::Cmd;
use crate::host::TextSource;
use crate::messages::Msg;
use crate::model::CrosshairModel;

#[cfg(any(debug_assertions, feature = "trace-updates"))]
use crate::tracing::PhaseSnapshot;
#[cfg(any(debug_assertions, feature = "trace-updates"))]
use tracing::{debug, span, Level};

pub use app::update_app;
pub use config::update_config;
pub use crosshair::update_crosshair;
pub use document::update_document;
pub use editor::update_editor;
pub use job::TABS_DISABLED_MESSAGE;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds (or with the `trace-updates` feature), this wraps with
/// tracing instrumentation. Otherwise it's a direct dispatch with zero overhead.
#[inline]
pub fn update<S: TextSource>(model: &mut CrosshairModel, source: &S, msg: Msg) -> Option<Cmd> {
    #[cfg(any(debug_assertions, feature = "trace-updates"))]
    {
        update_traced(model, source, msg)
    }
    #[cfg(not(any(debug_assertions, feature = "trace-updates")))]
    {
        update_inner(model, source, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner<S: TextSource>(model: &mut CrosshairModel, source: &S, msg: Msg) -> Option<Cmd> {
    let result = match msg {
        Msg::Editor(m) => editor::update_editor(model, source, m),
        Msg::Document(m) => document::update_document(model, source, m),
        Msg::Config(m) => config::update_config(model, source, m),
        Msg::Crosshair(m) => crosshair::update_crosshair(model, source, m),
        Msg::App(m) => app::update_app(model, source, m),
    };

    let indicator = if model.status.sync(model.config.enabled) {
        Some(Cmd::UpdateIndicator(model.status.indicator.clone()))
    } else {
        None
    };
    match indicator {
        Some(indicator) => Cmd::batch(vec![result.into(), indicator]),
        None => result,
    }
}

/// Traced update wrapper
///
/// Captures before/after engine state and logs diffs for debugging.
/// Filters out noisy messages like cursor movement from logging.
#[cfg(any(debug_assertions, feature = "trace-updates"))]
fn update_traced<S: TextSource>(model: &mut CrosshairModel, source: &S, msg: Msg) -> Option<Cmd> {
    use crate::messages::EditorMsg;

    // Cursor movement arrives in bursts
    let is_noisy = matches!(&msg, Msg::Editor(EditorMsg::SelectionChanged { .. }));

    let msg_name = msg_type_name(&msg);
    let _span = if is_noisy {
        None
    } else {
        Some(span!(Level::DEBUG, "update", msg = %msg_name).entered())
    };

    let before = PhaseSnapshot::from_model(model);

    if !is_noisy {
        debug!(target: "message", msg = %msg_name, "processing");
    }

    let result = update_inner(model, source, msg);

    let after = PhaseSnapshot::from_model(model);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "phase", %diff, "state changed");
    }

    result
}

/// Get a display name for a message type
///
/// Uses Debug formatting to include variant names and arguments.
/// Example outputs:
/// - `Crosshair::Toggle`
/// - `Document::Changed { document_id: DocumentId(1) }`
#[cfg(any(debug_assertions, feature = "trace-updates"))]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Editor(m) => format!("Editor::{:?}", m),
        Msg::Document(m) => format!("Document::{:?}", m),
        Msg::Config(m) => format!("Config::{:?}", m),
        Msg::Crosshair(m) => format!("Crosshair::{:?}", m),
        Msg::App(m) => format!("App::{:?}", m),
    }
}

#[cfg(test)]
mod tests;
