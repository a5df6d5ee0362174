//! Document lifecycle handlers: edits, the save sequence, open and close

use super::job::{enqueue, resume, schedule, start_job};
use crate::commands::Cmd;
use crate::debounce::DebounceKind;
use crate::host::TextSource;
use crate::messages::DocumentMsg;
use crate::model::{CrosshairModel, Job, JobKind, Phase, Step};

/// Handle document messages
pub fn update_document<S: TextSource>(
    model: &mut CrosshairModel,
    source: &S,
    msg: DocumentMsg,
) -> Option<Cmd> {
    match msg {
        DocumentMsg::Opened { document_id } => {
            // A reused id must not inherit anything from its previous life
            model.reset_document(document_id);
            let resumed = resume(model, source);
            Cmd::batch(vec![
                resumed.into(),
                schedule(model, source, document_id, DebounceKind::Selection).into(),
            ])
        }

        DocumentMsg::Changed { document_id } => {
            // Our own edits land while updating and are ignored here
            schedule(model, source, document_id, DebounceKind::Edit)
        }

        DocumentMsg::WillSave { document_id } => {
            if model.phase == Phase::Disabled {
                return None;
            }
            let cursor = model.cursor(document_id);
            tracing::debug!(
                "Save started for doc={}, holding cursor {}:{}",
                document_id.0,
                cursor.line,
                cursor.column
            );
            model.saving.insert(document_id, cursor);
            model.debouncer.cancel(document_id);
            model.applied.remove(&document_id);
            enqueue(
                model,
                source,
                JobKind::Save,
                vec![Step::Retract(document_id)],
            )
        }

        DocumentMsg::DidSave { document_id } => {
            let cursor = model.saving.remove(&document_id)?;
            if !model.is_enabled() || model.active != Some(document_id) {
                return None;
            }
            tracing::debug!("Save finished for doc={}, redrawing", document_id.0);
            let job = Job::refresh(document_id, cursor);
            match &mut model.phase {
                Phase::Updating(running) => {
                    running.steps.extend(job.steps);
                    None
                }
                Phase::Idle => start_job(model, source, job),
                Phase::Disabled => None,
            }
        }

        DocumentMsg::Closed { document_id } => {
            tracing::debug!("doc={} closed, forgetting its state", document_id.0);
            model.forget_document(document_id);
            resume(model, source)
        }
    }
}
