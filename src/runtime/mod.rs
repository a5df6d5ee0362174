//! Runtime module - drives the engine against a host
//!
//! - `app` - message loop, command execution and debounce timers

pub mod app;

pub use app::Runtime;
