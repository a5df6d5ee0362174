//! Engine lifecycle handlers

use super::job::{begin_shutdown, schedule};
use crate::commands::Cmd;
use crate::debounce::DebounceKind;
use crate::host::TextSource;
use crate::messages::AppMsg;
use crate::model::CrosshairModel;

/// Handle app lifecycle messages
pub fn update_app<S: TextSource>(
    model: &mut CrosshairModel,
    source: &S,
    msg: AppMsg,
) -> Option<Cmd> {
    match msg {
        AppMsg::Activate => {
            tracing::info!(enabled = model.is_enabled(), "Crosshair activated");
            let mut cmds = vec![Cmd::UpdateIndicator(model.status.indicator.clone())];
            if let Some(doc) = model.active {
                cmds.extend(schedule(model, source, doc, DebounceKind::Selection));
            }
            Cmd::batch(cmds)
        }
        AppMsg::Deactivate => begin_shutdown(model, source),
    }
}
