//! Event loop driving the engine against a host

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::commands::Cmd;
use crate::config::ConfigStore;
use crate::host::{DocumentId, Host};
use crate::messages::{AppMsg, ConfigMsg, CrosshairMsg, DocumentMsg, Msg};
use crate::model::CrosshairModel;
use crate::update::update;

/// Longest single wait inside `run_until_idle`
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Owns the engine, its host and its configuration
///
/// Commands returned by `update` are executed here. Host calls run inline and
/// post their results back on the message channel; debounce timers run on
/// their own threads and post `UpdateReady` when they fire.
pub struct Runtime<H: Host> {
    model: CrosshairModel,
    host: H,
    config: ConfigStore,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
    /// Timer threads that have not fired yet
    pending_timers: Arc<AtomicUsize>,
}

impl<H: Host> Runtime<H> {
    pub fn new(mut host: H, config: ConfigStore) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        host.attach(msg_tx.clone());
        Self {
            model: CrosshairModel::new(config.resolved()),
            host,
            config,
            msg_tx,
            msg_rx,
            pending_timers: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn model(&self) -> &CrosshairModel {
        &self.model
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Sender for posting messages from other threads
    pub fn sender(&self) -> Sender<Msg> {
        self.msg_tx.clone()
    }

    pub fn pending_timers(&self) -> usize {
        self.pending_timers.load(Ordering::SeqCst)
    }

    /// Load the engine and push the initial indicator
    pub fn activate(&mut self) {
        self.dispatch(Msg::App(AppMsg::Activate));
    }

    /// Handle one message, then everything it produced synchronously
    pub fn dispatch(&mut self, msg: Msg) {
        self.handle(msg);
        self.process_async_messages();
    }

    /// Process messages until no timer is pending and the channel is empty
    ///
    /// Returns false if `timeout` elapsed first.
    pub fn run_until_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            // Read the counter first: a timer decrements only after sending
            let quiet = self.pending_timers() == 0;
            let handled = self.process_async_messages();
            if quiet && handled == 0 {
                return true;
            }

            let now = Instant::now();
            if now >= deadline {
                tracing::warn!(
                    "run_until_idle: timed out with {} timers pending",
                    self.pending_timers()
                );
                return false;
            }
            match self.msg_rx.recv_timeout((deadline - now).min(POLL_INTERVAL)) {
                Ok(msg) => self.handle(msg),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return true,
            }
        }
    }

    /// Run the save sequence around a host write
    ///
    /// Padding is stripped before `write` runs and drawn again afterwards at
    /// the cursor captured when the save started.
    pub fn save_document<T>(
        &mut self,
        doc: DocumentId,
        write: impl FnOnce(&mut H) -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        self.dispatch(Msg::Document(DocumentMsg::WillSave { document_id: doc }));
        let result = write(&mut self.host);
        self.dispatch(Msg::Document(DocumentMsg::DidSave { document_id: doc }));
        result
    }

    /// Re-read the configuration files and hand the result to the engine
    pub fn reload_config(&mut self) {
        self.config.reload();
        let resolved = self.config.resolved();
        self.dispatch(Msg::Config(ConfigMsg::Changed(resolved)));
    }

    /// Strip every guide and bit of padding, then wait for the work to finish
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        self.dispatch(Msg::App(AppMsg::Deactivate));
        self.run_until_idle(timeout)
    }

    /// Give back the host, e.g. to inspect documents after shutdown
    pub fn into_host(self) -> H {
        self.host
    }

    fn handle(&mut self, msg: Msg) {
        if let Some(cmd) = update(&mut self.model, &self.host, msg) {
            self.process_cmd(cmd);
        }
    }

    fn process_async_messages(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.handle(msg);
            handled += 1;
        }
        handled
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
            Cmd::DebouncedUpdate {
                document_id,
                kind,
                generation,
                delay_ms,
            } => {
                let tx = self.msg_tx.clone();
                let pending = Arc::clone(&self.pending_timers);
                pending.fetch_add(1, Ordering::SeqCst);
                std::thread::spawn(move || {
                    std::thread::sleep(Duration::from_millis(delay_ms));
                    let _ = tx.send(Msg::Crosshair(CrosshairMsg::UpdateReady {
                        document_id,
                        kind,
                        generation,
                    }));
                    pending.fetch_sub(1, Ordering::SeqCst);
                });
            }
            Cmd::ApplyEdits {
                document_id,
                edits,
                ticket,
            } => {
                tracing::trace!(
                    "apply_edits doc={} ticket={} edits={:?}",
                    document_id.0,
                    ticket,
                    edits
                );
                let result = self
                    .host
                    .apply_edits(document_id, &edits)
                    .map_err(|e| e.to_string());
                if let Err(e) = &result {
                    tracing::warn!("apply_edits failed for doc={}: {}", document_id.0, e);
                }
                let _ = self
                    .msg_tx
                    .send(Msg::Crosshair(CrosshairMsg::EditsApplied { ticket, result }));
            }
            Cmd::SetDecorations {
                document_id,
                decorations,
            } => {
                let result = self
                    .host
                    .set_decorations(document_id, &decorations)
                    .map_err(|e| e.to_string());
                if let Err(e) = &result {
                    tracing::warn!("set_decorations failed for doc={}: {}", document_id.0, e);
                }
                let _ = self.msg_tx.send(Msg::Crosshair(CrosshairMsg::DecorationsApplied {
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
                tracing::debug!("Tab prompt for doc={} answered {:?}", document_id.0, choice);
                let _ = self.msg_tx.send(Msg::Crosshair(CrosshairMsg::TabChoice {
                    document_id,
                    choice,
                }));
            }
            Cmd::PersistEnabled(enabled) => match self.config.set_enabled(enabled) {
                Ok(scope) => tracing::info!("Persisted enabled={} to {:?} config", enabled, scope),
                Err(e) => tracing::warn!("Failed to persist enabled={}: {}", enabled, e),
            },
            Cmd::UpdateIndicator(indicator) => {
                self.host.indicator_changed(&indicator);
            }
        }
    }
}
