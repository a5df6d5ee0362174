//! Job runner for the updating phase
//!
//! Steps run back to back until one needs the host (an edit batch or the tab
//! prompt). The job then pauses until the matching acknowledgement arrives
//! and `drive` is called again.

use std::time::Duration;

use crate::commands::Cmd;
use crate::debounce::{DebounceKind, SELECTION_DEBOUNCE_MS};
use crate::guide::{
    build_decorations, find_tab_in_window, plan_padding, plan_retraction, plan_tab_expansion,
    Decorations, GuideStyle, LineWindow,
};
use crate::host::{DocumentId, TextEdit, TextSource};
use crate::model::status_bar::{TransientMessage, MESSAGE_DURATION_MS};
use crate::model::{
    AppliedState, CrosshairModel, InjectedSpan, Job, JobKind, PendingAction, Phase, Step, Wait,
};

/// Shown when tabs stop the guide and conversion is off
pub const TABS_DISABLED_MESSAGE: &str =
    "Crosshair disabled: tabs near the cursor. Set autoTabToSpace to convert them.";

enum StepOutcome {
    Continue,
    Paused,
    TabsRefused,
}

/// Enter the updating phase with a job and run it as far as possible
pub(crate) fn start_job<S: TextSource>(
    model: &mut CrosshairModel,
    source: &S,
    job: Job,
) -> Option<Cmd> {
    if model.phase.job().is_some() {
        tracing::warn!("start_job: a job is already running, dropping {:?}", job.kind);
        return None;
    }
    tracing::debug!(kind = ?job.kind, steps = job.steps.len(), "starting job");
    model.phase = Phase::Updating(job);
    drive(model, source)
}

/// Run queued steps until the job pauses or ends
pub(crate) fn drive<S: TextSource>(model: &mut CrosshairModel, source: &S) -> Option<Cmd> {
    let mut cmds = Vec::new();
    loop {
        let step = match model.phase.job_mut() {
            Some(job) if job.waiting.is_none() => job.steps.pop_front(),
            _ => break,
        };
        let Some(step) = step else {
            finish_job(model, source, true, &mut cmds);
            break;
        };
        match run_step(model, source, step, &mut cmds) {
            StepOutcome::Continue => {}
            StepOutcome::Paused => break,
            StepOutcome::TabsRefused => {
                abandon_job(model);
                cmds.extend(begin_disable(
                    model,
                    source,
                    true,
                    Some(TABS_DISABLED_MESSAGE.to_string()),
                ));
                break;
            }
        }
    }
    Cmd::batch(cmds)
}

fn run_step<S: TextSource>(
    model: &mut CrosshairModel,
    source: &S,
    step: Step,
    cmds: &mut Vec<Cmd>,
) -> StepOutcome {
    match step {
        Step::Retract(doc) => {
            let spans = model.spans.take(doc);
            if spans.is_empty() {
                return StepOutcome::Continue;
            }
            let edits = plan_retraction(source, doc, &spans);
            request_edits(model, doc, edits, Vec::new(), spans, cmds)
        }
        Step::ConvertTabs(doc) => {
            let edits = plan_tab_expansion(source, doc, model.config.tab_size);
            tracing::info!("Expanding tabs on {} lines of doc={}", edits.len(), doc.0);
            request_edits(model, doc, edits, Vec::new(), Vec::new(), cmds)
        }
        Step::Inject { doc, cursor } => {
            let Some(line_count) = source.line_count(doc) else {
                return StepOutcome::Continue;
            };
            let window = LineWindow::around(cursor.line, line_count, model.config.size);

            if let Some(line) = find_tab_in_window(source, doc, window) {
                tracing::info!("Tab found on line {} of doc={}", line, doc.0);
                if !model.config.auto_tab_to_space {
                    return StepOutcome::TabsRefused;
                }
                // Retry once the user has answered
                if let Some(job) = model.phase.job_mut() {
                    job.steps.push_front(Step::Inject { doc, cursor });
                    job.waiting = Some(Wait::TabChoice { doc });
                }
                cmds.push(Cmd::PromptTabPolicy { document_id: doc });
                return StepOutcome::Paused;
            }

            if !model.config.add_whitespace {
                return StepOutcome::Continue;
            }
            let plan = plan_padding(source, doc, cursor, window);
            request_edits(model, doc, plan.edits, plan.spans, Vec::new(), cmds)
        }
        Step::Decorate { doc, cursor } => {
            let Some(line_count) = source.line_count(doc) else {
                return StepOutcome::Continue;
            };
            let window = LineWindow::around(cursor.line, line_count, model.config.size);
            let style = GuideStyle::from_config(&model.config);
            let decorations = build_decorations(source, doc, cursor, window, &style);

            model.decorated.insert(doc);
            model.applied.insert(
                doc,
                AppliedState {
                    cursor,
                    version: source.version(doc),
                },
            );
            cmds.push(Cmd::SetDecorations {
                document_id: doc,
                decorations,
            });
            StepOutcome::Continue
        }
        Step::Clear(doc) => {
            if model.decorated.remove(&doc) {
                cmds.push(Cmd::SetDecorations {
                    document_id: doc,
                    decorations: Decorations::empty(),
                });
            }
            model.applied.remove(&doc);
            StepOutcome::Continue
        }
    }
}

fn request_edits(
    model: &mut CrosshairModel,
    doc: DocumentId,
    edits: Vec<TextEdit>,
    record: Vec<InjectedSpan>,
    restore: Vec<InjectedSpan>,
    cmds: &mut Vec<Cmd>,
) -> StepOutcome {
    if edits.is_empty() {
        return StepOutcome::Continue;
    }
    let ticket = model.next_ticket();
    if let Some(job) = model.phase.job_mut() {
        job.waiting = Some(Wait::Edits {
            ticket,
            doc,
            record,
            restore,
        });
    }
    cmds.push(Cmd::ApplyEdits {
        document_id: doc,
        edits,
        ticket,
    });
    StepOutcome::Paused
}

/// Continue a job whose wait was dropped, e.g. a prompt for a closed document
pub(crate) fn resume<S: TextSource>(model: &mut CrosshairModel, source: &S) -> Option<Cmd> {
    match model.phase.job() {
        Some(job) if job.waiting.is_none() => drive(model, source),
        _ => None,
    }
}

/// Drop the running job without running its remaining steps
pub(crate) fn abandon_job(model: &mut CrosshairModel) {
    let Some(kind) = model.phase.job().map(|job| job.kind) else {
        return;
    };
    tracing::debug!(?kind, "abandoning job");
    model.phase = if kind.ends_disabled() {
        Phase::Disabled
    } else {
        Phase::Idle
    };
}

/// Leave the updating phase, then run whatever was requested meanwhile
///
/// A job that ran to completion also catches up with triggers that were
/// dropped while it ran.
pub(crate) fn finish_job<S: TextSource>(
    model: &mut CrosshairModel,
    source: &S,
    completed: bool,
    cmds: &mut Vec<Cmd>,
) {
    let Phase::Updating(job) = std::mem::replace(&mut model.phase, Phase::Idle) else {
        return;
    };
    if job.kind.ends_disabled() {
        model.phase = Phase::Disabled;
    }
    tracing::debug!(kind = ?job.kind, completed, "job finished");

    if let Some(action) = model.pending.take() {
        cmds.extend(run_pending(model, source, action));
    } else if completed && model.phase == Phase::Idle {
        cmds.extend(catch_up(model, source));
    }
}

fn run_pending<S: TextSource>(
    model: &mut CrosshairModel,
    source: &S,
    action: PendingAction,
) -> Option<Cmd> {
    tracing::debug!(?action, "running deferred action");
    match action {
        PendingAction::Enable { persist } => enable(model, source, persist),
        PendingAction::Disable { persist, message } => {
            begin_disable(model, source, persist, message)
        }
        PendingAction::Shutdown => begin_shutdown(model, source),
    }
}

/// Schedule a redraw if the active document moved on while a job ran
fn catch_up<S: TextSource>(model: &mut CrosshairModel, source: &S) -> Option<Cmd> {
    let doc = model.active?;
    if model.saving.contains_key(&doc) {
        return None;
    }
    source.line_count(doc)?;
    let cursor = model.cursor(doc);
    match model.applied.get(&doc) {
        Some(applied) if applied.cursor == cursor => {
            if applied.version == source.version(doc) {
                None
            } else {
                schedule(model, source, doc, DebounceKind::Edit)
            }
        }
        _ => schedule(model, source, doc, DebounceKind::Selection),
    }
}

/// Start a debounce timer for a trigger on the active document
///
/// Only idle engines schedule. While a job runs the trigger is dropped and
/// picked up when the job finishes.
pub(crate) fn schedule<S: TextSource>(
    model: &mut CrosshairModel,
    source: &S,
    doc: DocumentId,
    kind: DebounceKind,
) -> Option<Cmd> {
    if model.phase != Phase::Idle {
        return None;
    }
    if model.active != Some(doc) {
        return None;
    }
    if model.saving.contains_key(&doc) {
        tracing::debug!("schedule: doc={} is being saved, skipping", doc.0);
        return None;
    }
    source.line_count(doc)?;

    let generation = model.debouncer.bump(doc, kind);
    let delay_ms = match kind {
        DebounceKind::Selection => SELECTION_DEBOUNCE_MS,
        DebounceKind::Edit => model.config.refresh_rate,
    };
    Some(Cmd::DebouncedUpdate {
        document_id: doc,
        kind,
        generation,
        delay_ms,
    })
}

/// Redraw a document's guides at its last known cursor
///
/// Skipped when the guides already match the cursor and the text.
pub(crate) fn refresh<S: TextSource>(
    model: &mut CrosshairModel,
    source: &S,
    doc: DocumentId,
) -> Option<Cmd> {
    if model.phase != Phase::Idle {
        return None;
    }
    source.line_count(doc)?;
    let cursor = model.cursor(doc);
    if model.is_up_to_date(doc, cursor, source.version(doc)) {
        tracing::trace!("refresh: doc={} already up to date", doc.0);
        return None;
    }
    start_job(model, source, Job::refresh(doc, cursor))
}

/// Queue steps on the running job, or run them as a new job
pub(crate) fn enqueue<S: TextSource>(
    model: &mut CrosshairModel,
    source: &S,
    kind: JobKind,
    steps: Vec<Step>,
) -> Option<Cmd> {
    match &mut model.phase {
        Phase::Updating(job) => {
            job.steps.extend(steps);
            None
        }
        Phase::Idle => start_job(model, source, Job::new(kind, steps)),
        Phase::Disabled => None,
    }
}

/// Record a deferred action unless it merely restores the current switch
fn defer(model: &mut CrosshairModel, action: PendingAction) {
    if matches!(model.pending, Some(PendingAction::Shutdown)) {
        return;
    }
    let target = matches!(action, PendingAction::Enable { .. });
    model.pending = if target == model.config.enabled {
        None
    } else {
        Some(action)
    };
}

/// Retract every span and clear every decoration set
fn strip_job(model: &CrosshairModel, kind: JobKind) -> Job {
    let mut decorated: Vec<DocumentId> = model.decorated.iter().copied().collect();
    decorated.sort();
    let steps = model
        .spans
        .documents()
        .into_iter()
        .map(Step::Retract)
        .chain(decorated.into_iter().map(Step::Clear));
    Job::new(kind, steps)
}

/// Turn the crosshair on and draw the active document right away
pub(crate) fn enable<S: TextSource>(
    model: &mut CrosshairModel,
    source: &S,
    persist: bool,
) -> Option<Cmd> {
    if model.phase.job().is_some() {
        defer(model, PendingAction::Enable { persist });
        return None;
    }
    if model.phase != Phase::Disabled {
        return None;
    }

    tracing::info!("Crosshair enabled");
    model.config.enabled = true;
    model.phase = Phase::Idle;
    model.applied.clear();

    let mut cmds = Vec::new();
    if persist {
        cmds.push(Cmd::PersistEnabled(true));
    }
    if let Some(doc) = model.active {
        cmds.extend(refresh(model, source, doc));
    }
    Cmd::batch(cmds)
}

/// Turn the crosshair off, stripping padding and guides everywhere
pub(crate) fn begin_disable<S: TextSource>(
    model: &mut CrosshairModel,
    source: &S,
    persist: bool,
    message: Option<String>,
) -> Option<Cmd> {
    if model.phase.job().is_some() {
        defer(model, PendingAction::Disable { persist, message });
        return None;
    }
    if model.phase == Phase::Disabled && !model.config.enabled {
        return None;
    }

    tracing::info!("Crosshair disabled");
    model.config.enabled = false;
    model.saving.clear();
    if !matches!(model.pending, Some(PendingAction::Shutdown)) {
        model.pending = None;
    }

    let mut cmds = Vec::new();
    if persist {
        cmds.push(Cmd::PersistEnabled(false));
    }
    if let Some(text) = message {
        cmds.push(show_message(model, text));
    }
    model.phase = Phase::Idle;
    let job = strip_job(model, JobKind::Disable);
    cmds.extend(start_job(model, source, job));
    Cmd::batch(cmds)
}

/// Strip padding and guides on unload, leaving configuration alone
pub(crate) fn begin_shutdown<S: TextSource>(
    model: &mut CrosshairModel,
    source: &S,
) -> Option<Cmd> {
    if model.phase.job().is_some() {
        model.pending = Some(PendingAction::Shutdown);
        return None;
    }
    tracing::info!("Crosshair shutting down");
    model.saving.clear();
    model.phase = Phase::Idle;
    let job = strip_job(model, JobKind::Shutdown);
    start_job(model, source, job)
}

/// Record a transient message and ask the host to show it
pub(crate) fn show_message(model: &mut CrosshairModel, text: String) -> Cmd {
    let duration = Duration::from_millis(MESSAGE_DURATION_MS);
    model.status.message = Some(TransientMessage::new(text.clone(), duration));
    Cmd::ShowMessage {
        text,
        duration_ms: MESSAGE_DURATION_MS,
    }
}
