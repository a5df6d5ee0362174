//! Editor focus and cursor handlers

use super::job::{enqueue, schedule};
use crate::commands::Cmd;
use crate::debounce::DebounceKind;
use crate::host::TextSource;
use crate::messages::EditorMsg;
use crate::model::{CrosshairModel, JobKind, Phase, Step};

/// Handle editor messages
pub fn update_editor<S: TextSource>(
    model: &mut CrosshairModel,
    source: &S,
    msg: EditorMsg,
) -> Option<Cmd> {
    match msg {
        EditorMsg::ActiveEditorChanged {
            document_id,
            cursor,
        } => {
            let previous = model.active;
            model.active = document_id;
            if let (Some(doc), Some(cursor)) = (document_id, cursor) {
                model.cursors.insert(doc, cursor);
            }
            if model.phase == Phase::Disabled {
                return None;
            }

            let mut cmds = Vec::new();
            if let Some(prev) = previous.filter(|prev| Some(*prev) != document_id) {
                tracing::debug!("Focus left doc={}, stripping its guides", prev.0);
                model.debouncer.cancel(prev);
                cmds.extend(enqueue(
                    model,
                    source,
                    JobKind::Refresh,
                    vec![Step::Retract(prev), Step::Clear(prev)],
                ));
            }
            if let Some(doc) = document_id {
                cmds.extend(schedule(model, source, doc, DebounceKind::Selection));
            }
            Cmd::batch(cmds)
        }

        EditorMsg::SelectionChanged {
            document_id,
            cursor,
        } => {
            model.cursors.insert(document_id, cursor);
            if model.active.is_none() {
                model.active = Some(document_id);
            }
            schedule(model, source, document_id, DebounceKind::Selection)
        }
    }
}
