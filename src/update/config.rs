//! Configuration change handler

use super::job::{begin_disable, enable, schedule};
use crate::commands::Cmd;
use crate::debounce::DebounceKind;
use crate::host::TextSource;
use crate::messages::ConfigMsg;
use crate::model::CrosshairModel;

/// Handle configuration messages
pub fn update_config<S: TextSource>(
    model: &mut CrosshairModel,
    source: &S,
    msg: ConfigMsg,
) -> Option<Cmd> {
    match msg {
        ConfigMsg::Changed(config) => {
            let previous = std::mem::replace(&mut model.config, config);
            let wanted = model.config.enabled;

            if previous.enabled != wanted {
                // The switch is flipped by enable/disable themselves
                model.config.enabled = previous.enabled;
                return if wanted {
                    enable(model, source, false)
                } else {
                    begin_disable(model, source, false, None)
                };
            }

            if !wanted || !previous.affects_guides(&model.config) {
                return None;
            }
            tracing::debug!("Guide settings changed, redrawing");
            model.applied.clear();
            let doc = model.active?;
            schedule(model, source, doc, DebounceKind::Selection)
        }
    }
}
