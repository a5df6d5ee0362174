//! Toggle command and async results (timers, edit acknowledgements, prompts)

use super::job::{abandon_job, begin_disable, drive, enable, finish_job, refresh};
use crate::commands::Cmd;
use crate::host::{TabChoice, TextSource};
use crate::messages::CrosshairMsg;
use crate::model::{CrosshairModel, PendingAction, Phase, Step, Wait};

/// Handle engine messages
pub fn update_crosshair<S: TextSource>(
    model: &mut CrosshairModel,
    source: &S,
    msg: CrosshairMsg,
) -> Option<Cmd> {
    match msg {
        CrosshairMsg::Toggle => {
            let enabled = match &model.pending {
                Some(PendingAction::Shutdown) => return None,
                Some(PendingAction::Enable { .. }) => true,
                Some(PendingAction::Disable { .. }) => false,
                None => model.config.enabled,
            };
            if enabled {
                begin_disable(model, source, true, None)
            } else {
                enable(model, source, true)
            }
        }

        CrosshairMsg::UpdateReady {
            document_id,
            kind,
            generation,
        } => {
            if !model.debouncer.is_current(document_id, kind, generation) {
                tracing::trace!(
                    "Dropping stale timer for doc={} gen={}",
                    document_id.0,
                    generation
                );
                return None;
            }
            model.debouncer.complete(document_id, kind, generation);

            if model.phase != Phase::Idle
                || model.active != Some(document_id)
                || model.saving.contains_key(&document_id)
            {
                return None;
            }
            refresh(model, source, document_id)
        }

        CrosshairMsg::EditsApplied { ticket, result } => {
            let waiting_ticket = match model.phase.job().and_then(|job| job.waiting.as_ref()) {
                Some(Wait::Edits { ticket, .. }) => Some(*ticket),
                _ => None,
            };
            if waiting_ticket != Some(ticket) {
                tracing::debug!("Ignoring acknowledgement for unknown ticket {}", ticket);
                return None;
            }
            let Some(job) = model.phase.job_mut() else {
                return None;
            };
            let best_effort = job.kind.is_best_effort();
            let Some(Wait::Edits {
                doc,
                record,
                restore,
                ..
            }) = job.waiting.take()
            else {
                return None;
            };

            match result {
                Ok(()) => {
                    model.spans.record(doc, record);
                    drive(model, source)
                }
                Err(e) => {
                    tracing::warn!("Host rejected edits for doc={}: {}", doc.0, e);
                    model.spans.record(doc, restore);
                    model.applied.remove(&doc);
                    if best_effort {
                        drive(model, source)
                    } else {
                        let mut cmds = Vec::new();
                        finish_job(model, source, false, &mut cmds);
                        Cmd::batch(cmds)
                    }
                }
            }
        }

        CrosshairMsg::DecorationsApplied {
            document_id,
            result,
        } => {
            if let Err(e) = result {
                // Not drawn, so the next trigger at this cursor must not be skipped
                tracing::warn!("Host rejected decorations for doc={}: {}", document_id.0, e);
                model.applied.remove(&document_id);
            }
            None
        }

        CrosshairMsg::TabChoice {
            document_id,
            choice,
        } => {
            let awaited = matches!(
                model.phase.job().and_then(|job| job.waiting.as_ref()),
                Some(Wait::TabChoice { doc }) if *doc == document_id
            );
            if !awaited {
                tracing::debug!("Ignoring tab choice for doc={}", document_id.0);
                return None;
            }

            match choice {
                Some(TabChoice::Convert) => {
                    if let Some(job) = model.phase.job_mut() {
                        job.waiting = None;
                        job.steps.push_front(Step::ConvertTabs(document_id));
                    }
                    drive(model, source)
                }
                Some(TabChoice::Disable) | None => {
                    abandon_job(model);
                    begin_disable(model, source, true, None)
                }
            }
        }
    }
}
