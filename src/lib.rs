//! Crosshair - cursor guide engine
//!
//! This crate draws a horizontal and a vertical guide through the cursor of
//! a host editor, padding short lines with trailing spaces so the vertical
//! guide stays straight. The engine follows the Elm Architecture pattern:
//! host events become [`Msg`]s, [`update`](update::update) returns [`Cmd`]s,
//! and a [`Runtime`] executes them against a [`Host`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod debounce;
pub mod guide;
pub mod host;
pub mod messages;
pub mod model;
pub mod preview;
pub mod runtime;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::{ConfigStore, CrosshairConfig};
pub use host::{CursorPosition, DocumentId, Host, MemoryHost, TextSource};
pub use messages::Msg;
pub use model::CrosshairModel;
pub use runtime::Runtime;
