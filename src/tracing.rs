//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging
//! job sequencing, padding bookkeeping, and state transitions.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=phase=debug,message=debug` - scoped filtering
//! - `RUST_LOG=crosshair::update=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/crosshair/logs/crosshair.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::{CrosshairModel, PhaseKind};

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG env var for filtering.
/// File logging writes to `~/.config/crosshair/logs/crosshair.log` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "crosshair.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    // A second init (tests, embedding hosts) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

/// Lightweight snapshot of engine state for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseSnapshot {
    pub phase: PhaseKind,
    pub enabled: bool,
    pub pending_steps: usize,
    pub span_count: usize,
    pub decorated: usize,
    pub saving: usize,
}

impl PhaseSnapshot {
    pub fn from_model(model: &CrosshairModel) -> Self {
        Self {
            phase: model.phase_kind(),
            enabled: model.config.enabled,
            pending_steps: model.phase.job().map_or(0, |job| job.steps.len()),
            span_count: model.spans.total(),
            decorated: model.decorated.len(),
            saving: model.saving.len(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &PhaseSnapshot) -> Option<String> {
        let mut changes = Vec::new();
        if self.phase != other.phase {
            changes.push(format!("phase: {:?} → {:?}", self.phase, other.phase));
        }
        if self.enabled != other.enabled {
            changes.push(format!("enabled: {} → {}", self.enabled, other.enabled));
        }
        if self.span_count != other.span_count {
            changes.push(format!(
                "spans: {} → {}",
                self.span_count, other.span_count
            ));
        }
        if self.decorated != other.decorated {
            changes.push(format!(
                "decorated: {} → {}",
                self.decorated, other.decorated
            ));
        }
        if self.saving != other.saving {
            changes.push(format!("saving: {} → {}", self.saving, other.saving));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
