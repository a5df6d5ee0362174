//! State machine tests with a synchronous command executor
//!
//! Timers are collected instead of slept on and fired explicitly, so every
//! interleaving below is deterministic.

use std::collections::VecDeque;
use std::time::Duration;

use super::{update, TABS_DISABLED_MESSAGE};
use crate::commands::Cmd;
use crate::config::CrosshairConfig;
use crate::host::{Document, DocumentId, Host, MemoryHost, TabChoice, TextSource};
use crate::messages::{AppMsg, ConfigMsg, CrosshairMsg, DocumentMsg, EditorMsg, Msg};
use crate::model::{CrosshairModel, PhaseKind};

struct Harness {
    model: CrosshairModel,
    host: MemoryHost,
    queue: VecDeque<Msg>,
    timers: Vec<Msg>,
    persisted: Vec<bool>,
}

impl Harness {
    fn new(config: CrosshairConfig) -> Self {
        Self {
            model: CrosshairModel::new(config),
            host: MemoryHost::new(),
            queue: VecDeque::new(),
            timers: Vec::new(),
            persisted: Vec::new(),
        }
    }

    fn enabled() -> Self {
        Self::new(CrosshairConfig {
            enabled: true,
            ..Default::default()
        })
    }

    fn open(&mut self, text: &str) -> DocumentId {
        let id = self.host.open(Document::with_text(text));
        self.send(Msg::Document(DocumentMsg::Opened { document_id: id }));
        id
    }

    fn send(&mut self, msg: Msg) {
        self.queue.push_back(msg);
        self.drain();
    }

    fn drain(&mut self) {
        while let Some(msg) = self.queue.pop_front() {
            if let Some(cmd) = update(&mut self.model, &self.host, msg) {
                for cmd in cmd.flatten() {
                    self.exec(cmd);
                }
            }
        }
    }

    fn exec(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None | Cmd::Batch(_) => {}
            Cmd::DebouncedUpdate {
                document_id,
                kind,
                generation,
                ..
            } => self.timers.push(Msg::Crosshair(CrosshairMsg::UpdateReady {
                document_id,
                kind,
                generation,
            })),
            Cmd::ApplyEdits {
                document_id,
                edits,
                ticket,
            } => {
                let result = self
                    .host
                    .apply_edits(document_id, &edits)
                    .map_err(|e| e.to_string());
                if result.is_ok() {
                    self.queue.push_back(Msg::changed(document_id));
                }
                self.queue
                    .push_back(Msg::Crosshair(CrosshairMsg::EditsApplied { ticket, result }));
            }
            Cmd::SetDecorations {
                document_id,
                decorations,
            } => {
                let result = self
                    .host
                    .set_decorations(document_id, &decorations)
                    .map_err(|e| e.to_string());
                self.queue
                    .push_back(Msg::Crosshair(CrosshairMsg::DecorationsApplied {
                        document_id,
                        result,
                    }));
            }
            Cmd::ShowMessage { text, duration_ms } => {
                self.host
                    .show_message(&text, Duration::from_millis(duration_ms));
            }
            Cmd::PromptTabPolicy { document_id } => {
                let choice = self.host.choose_tab_policy(document_id);
                self.queue.push_back(Msg::Crosshair(CrosshairMsg::TabChoice {
                    document_id,
                    choice,
                }));
            }
            Cmd::PersistEnabled(enabled) => self.persisted.push(enabled),
            Cmd::UpdateIndicator(indicator) => self.host.indicator_changed(&indicator),
        }
    }

    fn fire_timers(&mut self) {
        for timer in std::mem::take(&mut self.timers) {
            self.send(timer);
        }
    }

    fn focus(&mut self, doc: DocumentId, line: usize, column: usize) {
        self.send(Msg::focus(doc, line, column));
        self.fire_timers();
    }

    fn move_to(&mut self, doc: DocumentId, line: usize, column: usize) {
        self.send(Msg::cursor_moved(doc, line, column));
        self.fire_timers();
    }

    fn text(&self, doc: DocumentId) -> String {
        self.host.text(doc).unwrap_or_default()
    }
}

const TEXT: &str = "ab\nabcdef\nx";
const PADDED_AT_6: &str = "ab    \nabcdef\nx     ";

#[test]
fn test_selection_pads_short_lines_and_decorates() {
    let mut h = Harness::enabled();
    let doc = h.open(TEXT);
    h.focus(doc, 1, 6);

    assert_eq!(h.text(doc), PADDED_AT_6);
    assert_eq!(h.model.spans.spans(doc).len(), 2);
    assert_eq!(h.model.phase_kind(), PhaseKind::Idle);

    let deco = &h.host.decorations[&doc];
    assert_eq!(deco.line.len(), 1);
    assert_eq!(deco.columns.len(), 3);
    assert!(deco.columns.iter().all(|pos| pos.column == 6));
}

#[test]
fn test_unchanged_cursor_does_not_pad_twice() {
    let mut h = Harness::enabled();
    let doc = h.open(TEXT);
    h.focus(doc, 1, 6);
    let edits = h.host.edit_log.len();

    h.move_to(doc, 1, 6);
    h.move_to(doc, 1, 6);

    assert_eq!(h.host.edit_log.len(), edits);
    assert_eq!(h.text(doc), PADDED_AT_6);
}

#[test]
fn test_moving_cursor_retracts_previous_padding() {
    let mut h = Harness::enabled();
    let doc = h.open(TEXT);
    h.focus(doc, 1, 6);
    h.move_to(doc, 1, 1);

    assert_eq!(h.text(doc), TEXT);
    assert!(h.model.spans.is_empty());
}

#[test]
fn test_retraction_spares_user_typed_content() {
    let mut h = Harness::enabled();
    let doc = h.open(TEXT);
    h.focus(doc, 1, 6);

    // The user types inside the padding on line 0
    h.host
        .user_edit(
            doc,
            &crate::host::TextEdit::Insert {
                line: 0,
                column: 3,
                text: "Z".into(),
            },
        )
        .unwrap();
    h.send(Msg::changed(doc));
    h.move_to(doc, 1, 1);

    assert_eq!(h.text(doc), "ab Z   \nabcdef\nx");
}

#[test]
fn test_disabled_engine_ignores_triggers() {
    let mut h = Harness::new(CrosshairConfig::default());
    let doc = h.open(TEXT);
    h.focus(doc, 1, 6);
    h.send(Msg::changed(doc));
    h.fire_timers();

    assert!(h.host.edit_log.is_empty());
    assert!(h.host.decorations.is_empty());
    assert_eq!(h.model.phase_kind(), PhaseKind::Disabled);
}

#[test]
fn test_toggle_enables_persists_and_draws() {
    let mut h = Harness::new(CrosshairConfig::default());
    let doc = h.open(TEXT);
    h.focus(doc, 1, 6);

    h.send(Msg::toggle());

    assert_eq!(h.persisted, vec![true]);
    assert_eq!(h.text(doc), PADDED_AT_6);
    assert_eq!(
        h.host.indicator.as_ref().map(|i| i.text.as_str()),
        Some("Crosshair: On")
    );
}

#[test]
fn test_toggle_off_strips_everything() {
    let mut h = Harness::enabled();
    let doc = h.open(TEXT);
    h.focus(doc, 1, 6);

    h.send(Msg::toggle());

    assert_eq!(h.text(doc), TEXT);
    assert!(h.model.spans.is_empty());
    assert!(h.host.decorations[&doc].is_empty());
    assert_eq!(h.persisted, vec![false]);
    assert_eq!(h.model.phase_kind(), PhaseKind::Disabled);
    assert_eq!(
        h.host.indicator.as_ref().map(|i| i.text.as_str()),
        Some("Crosshair: Off")
    );
}

#[test]
fn test_trigger_during_update_is_coalesced() {
    let mut h = Harness::enabled();
    let doc = h.open("ab\nabcdef");
    h.send(Msg::focus(doc, 1, 6));
    let ready = h.timers.pop().unwrap();

    // Run the timer by hand and hold back the padding acknowledgement
    let cmds = update(&mut h.model, &h.host, ready).unwrap().flatten();
    assert!(matches!(cmds[0], Cmd::ApplyEdits { .. }));
    assert_eq!(h.model.phase_kind(), PhaseKind::Updating);

    // Cursor moves while the edit is in flight: nothing is scheduled
    assert!(update(&mut h.model, &h.host, Msg::cursor_moved(doc, 1, 3)).is_none());
    assert!(update(&mut h.model, &h.host, Msg::changed(doc)).is_none());

    for cmd in cmds {
        h.exec(cmd);
    }
    h.drain();

    // The finished job noticed the stale cursor and scheduled one follow-up
    assert_eq!(h.model.phase_kind(), PhaseKind::Idle);
    assert_eq!(h.timers.len(), 1);
    h.fire_timers();
    assert_eq!(h.text(doc), "ab \nabcdef");
}

#[test]
fn test_stale_timer_is_dropped() {
    let mut h = Harness::enabled();
    let doc = h.open(TEXT);
    h.send(Msg::focus(doc, 1, 6));
    h.send(Msg::cursor_moved(doc, 1, 4));
    assert_eq!(h.timers.len(), 2);

    h.fire_timers();

    // Only the latest timer ran
    assert_eq!(h.host.edit_log.len(), 1);
    assert_eq!(h.text(doc), "ab  \nabcdef\nx   ");
}

#[test]
fn test_edit_uses_refresh_rate_delay() {
    let mut h = Harness::new(CrosshairConfig {
        enabled: true,
        refresh_rate: 250,
        ..Default::default()
    });
    let doc = h.open(TEXT);
    h.focus(doc, 1, 1);

    let cmd = update(&mut h.model, &h.host, Msg::changed(doc));
    assert!(matches!(
        cmd,
        Some(Cmd::DebouncedUpdate { delay_ms: 250, .. })
    ));
}

#[test]
fn test_save_sequence_strips_then_restores_at_captured_cursor() {
    let mut h = Harness::enabled();
    let doc = h.open(TEXT);
    h.focus(doc, 1, 6);

    h.send(Msg::Document(DocumentMsg::WillSave { document_id: doc }));
    assert_eq!(h.text(doc), TEXT);

    // Triggers for the saving document are suppressed
    h.send(Msg::cursor_moved(doc, 1, 2));
    assert!(h.timers.is_empty());

    h.send(Msg::Document(DocumentMsg::DidSave { document_id: doc }));
    assert_eq!(h.text(doc), PADDED_AT_6);

    // The move made during the save is picked up afterwards
    h.fire_timers();
    assert_eq!(h.text(doc), "ab\nabcdef\nx ");
}

#[test]
fn test_did_save_without_will_save_is_ignored() {
    let mut h = Harness::enabled();
    let doc = h.open(TEXT);
    h.focus(doc, 1, 1);
    let edits = h.host.edit_log.len();

    h.send(Msg::Document(DocumentMsg::DidSave { document_id: doc }));
    assert_eq!(h.host.edit_log.len(), edits);
}

#[test]
fn test_close_forgets_spans_without_editing() {
    let mut h = Harness::enabled();
    let doc = h.open(TEXT);
    h.focus(doc, 1, 6);
    let edits = h.host.edit_log.len();

    h.send(Msg::Document(DocumentMsg::Closed { document_id: doc }));
    assert_eq!(h.host.edit_log.len(), edits);
    assert!(h.model.spans.is_empty());
    assert!(h.model.active.is_none());

    // Same identity, text saved with trailing spaces of its own
    h.host.close(doc);
    h.host.open_as(doc, Document::with_text(PADDED_AT_6));
    h.send(Msg::Document(DocumentMsg::Opened { document_id: doc }));
    h.focus(doc, 1, 1);

    assert_eq!(h.text(doc), PADDED_AT_6);
}

#[test]
fn test_tabs_without_auto_convert_disable_quietly() {
    let mut h = Harness::new(CrosshairConfig {
        enabled: true,
        auto_tab_to_space: false,
        ..Default::default()
    });
    let doc = h.open("\tab\nx");
    h.focus(doc, 1, 5);

    assert_eq!(h.model.phase_kind(), PhaseKind::Disabled);
    assert!(!h.model.is_enabled());
    assert!(h.host.edit_log.is_empty());
    assert_eq!(h.host.messages.len(), 1);
    assert_eq!(
        h.model.status.current_message(),
        Some(TABS_DISABLED_MESSAGE)
    );
    assert_eq!(h.host.prompts_shown, 0);
    assert_eq!(h.persisted, vec![false]);
}

#[test]
fn test_tab_prompt_convert_expands_then_pads() {
    let mut h = Harness::enabled();
    h.host.tab_answers.push_back(Some(TabChoice::Convert));
    let doc = h.open("\tx\ny");
    h.focus(doc, 1, 3);

    assert_eq!(h.host.prompts_shown, 1);
    assert_eq!(h.text(doc), "    x\ny  ");
    assert!(h.model.is_enabled());
}

#[test]
fn test_tab_prompt_dismissed_disables() {
    let mut h = Harness::enabled();
    h.host.tab_answers.push_back(None);
    let doc = h.open("\tx\ny");
    h.focus(doc, 1, 3);

    assert_eq!(h.host.prompts_shown, 1);
    assert_eq!(h.text(doc), "\tx\ny");
    assert_eq!(h.model.phase_kind(), PhaseKind::Disabled);
    assert_eq!(h.persisted, vec![false]);
}

#[test]
fn test_rejected_padding_is_retried_on_next_trigger() {
    let mut h = Harness::enabled();
    let doc = h.open(TEXT);
    h.host.reject_edits = 1;
    h.focus(doc, 1, 6);

    assert_eq!(h.text(doc), TEXT);
    assert!(h.model.spans.is_empty());
    assert_eq!(h.model.phase_kind(), PhaseKind::Idle);
    assert!(h.timers.is_empty());

    h.move_to(doc, 1, 6);
    assert_eq!(h.text(doc), PADDED_AT_6);
}

#[test]
fn test_rejected_retraction_keeps_spans() {
    let mut h = Harness::enabled();
    let doc = h.open(TEXT);
    h.focus(doc, 1, 6);

    h.host.reject_edits = 1;
    h.move_to(doc, 1, 1);
    assert_eq!(h.model.spans.spans(doc).len(), 2);

    h.move_to(doc, 1, 2);
    assert_eq!(h.text(doc), "ab\nabcdef\nx ");
}

#[test]
fn test_no_whitespace_decorates_without_edits() {
    let mut h = Harness::new(CrosshairConfig {
        enabled: true,
        add_whitespace: false,
        ..Default::default()
    });
    let doc = h.open(TEXT);
    h.focus(doc, 1, 4);

    assert!(h.host.edit_log.is_empty());
    let columns = &h.host.decorations[&doc].columns;
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[0].column, 2);
    assert_eq!(columns[1].column, 4);
    assert_eq!(columns[2].column, 1);
}

#[test]
fn test_switching_editor_strips_previous_document() {
    let mut h = Harness::enabled();
    let first = h.open(TEXT);
    let second = h.open("hello\nworld");
    h.focus(first, 1, 6);

    h.focus(second, 0, 2);

    assert_eq!(h.text(first), TEXT);
    assert!(h.host.decorations[&first].is_empty());
    assert!(!h.host.decorations[&second].is_empty());
}

#[test]
fn test_guide_config_change_redraws() {
    let mut h = Harness::enabled();
    let doc = h.open(TEXT);
    h.focus(doc, 1, 6);

    let config = CrosshairConfig {
        enabled: true,
        size: 1,
        ..Default::default()
    };
    h.send(Msg::Config(ConfigMsg::Changed(config)));
    h.fire_timers();

    // Radius 1 around line 1 covers lines 1..3
    assert_eq!(h.text(doc), "ab\nabcdef\nx     ");
    assert_eq!(h.host.decorations[&doc].columns.len(), 2);
}

#[test]
fn test_external_disable_does_not_persist() {
    let mut h = Harness::enabled();
    let doc = h.open(TEXT);
    h.focus(doc, 1, 6);

    h.send(Msg::Config(ConfigMsg::Changed(CrosshairConfig::default())));

    assert_eq!(h.text(doc), TEXT);
    assert!(h.persisted.is_empty());
    assert_eq!(h.model.phase_kind(), PhaseKind::Disabled);
}

#[test]
fn test_toggle_during_update_is_deferred() {
    let mut h = Harness::enabled();
    let doc = h.open(TEXT);
    h.send(Msg::focus(doc, 1, 6));
    let ready = h.timers.pop().unwrap();
    let cmds = update(&mut h.model, &h.host, ready).unwrap().flatten();

    assert!(update(&mut h.model, &h.host, Msg::toggle()).is_none());
    assert!(h.model.is_enabled());

    for cmd in cmds {
        h.exec(cmd);
    }
    h.drain();

    assert_eq!(h.text(doc), TEXT);
    assert_eq!(h.persisted, vec![false]);
    assert_eq!(h.model.phase_kind(), PhaseKind::Disabled);
}

#[test]
fn test_deactivate_strips_without_persisting() {
    let mut h = Harness::enabled();
    let doc = h.open(TEXT);
    h.focus(doc, 1, 6);

    h.send(Msg::App(AppMsg::Deactivate));

    assert_eq!(h.text(doc), TEXT);
    assert!(h.persisted.is_empty());
    assert!(h.host.decorations[&doc].is_empty());
}

#[test]
fn test_activate_pushes_indicator() {
    let mut h = Harness::enabled();
    h.send(Msg::App(AppMsg::Activate));
    assert_eq!(
        h.host.indicator.as_ref().map(|i| i.text.as_str()),
        Some("Crosshair: On")
    );
}

#[test]
fn test_focus_lost_clears_active() {
    let mut h = Harness::enabled();
    let doc = h.open(TEXT);
    h.focus(doc, 1, 6);

    h.send(Msg::Editor(EditorMsg::ActiveEditorChanged {
        document_id: None,
        cursor: None,
    }));

    assert_eq!(h.text(doc), TEXT);
    assert!(h.model.active.is_none());
    assert_eq!(h.host.line_count(doc), Some(3));
}

/// Run the focus timer by hand and stop at the tab prompt without answering it
fn hold_at_tab_prompt(h: &mut Harness, doc: DocumentId) {
    h.send(Msg::focus(doc, 1, 6));
    let ready = h.timers.pop().unwrap();
    let cmds = update(&mut h.model, &h.host, ready).unwrap().flatten();
    assert!(matches!(cmds[..], [Cmd::PromptTabPolicy { .. }]));
    assert_eq!(h.model.phase_kind(), PhaseKind::Updating);
}

#[test]
fn test_close_during_tab_prompt_releases_engine() {
    let mut h = Harness::enabled();
    let tabbed = h.open("\tx\ny");
    hold_at_tab_prompt(&mut h, tabbed);

    h.send(Msg::Document(DocumentMsg::Closed {
        document_id: tabbed,
    }));
    assert_eq!(h.model.phase_kind(), PhaseKind::Idle);

    // The answer arrives after the document is gone
    h.send(Msg::Crosshair(CrosshairMsg::TabChoice {
        document_id: tabbed,
        choice: Some(TabChoice::Convert),
    }));
    assert_eq!(h.text(tabbed), "\tx\ny");

    let doc = h.open(TEXT);
    h.focus(doc, 1, 6);
    assert_eq!(h.text(doc), PADDED_AT_6);

    h.send(Msg::toggle());
    assert_eq!(h.model.phase_kind(), PhaseKind::Disabled);
    assert_eq!(h.text(doc), TEXT);
    assert_eq!(h.persisted, vec![false]);
}

#[test]
fn test_reopen_during_tab_prompt_draws_new_text() {
    let mut h = Harness::enabled();
    let doc = h.open("\tx\ny");
    hold_at_tab_prompt(&mut h, doc);

    h.host.open_as(doc, Document::with_text(TEXT));
    h.send(Msg::Document(DocumentMsg::Opened { document_id: doc }));
    assert_eq!(h.model.phase_kind(), PhaseKind::Idle);

    h.fire_timers();
    assert_eq!(h.text(doc), PADDED_AT_6);
    assert_eq!(h.host.prompts_shown, 0);
}

#[test]
fn test_rejected_decorations_are_redrawn_on_next_trigger() {
    let mut h = Harness::enabled();
    let doc = h.open(TEXT);
    h.host.reject_decorations = 1;
    h.focus(doc, 1, 6);

    assert_eq!(h.text(doc), PADDED_AT_6);
    assert!(!h.host.decorations.contains_key(&doc));
    assert!(!h.model.applied.contains_key(&doc));

    // Same cursor, same text: still redrawn
    h.move_to(doc, 1, 6);
    assert_eq!(h.host.decorations[&doc].columns.len(), 3);
    assert_eq!(h.text(doc), PADDED_AT_6);
    assert!(h.model.applied.contains_key(&doc));
}
