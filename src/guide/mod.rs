//! Crosshair geometry: the line window, padding, and decoration placement
//!
//! Everything here is pure: functions read a [`TextSource`](crate::host::TextSource)
//! and return plans. Applying them is the runtime's job.

pub mod decorations;
pub mod padding;
pub mod window;

pub use decorations::{build_decorations, BorderSpec, Decorations, GuideStyle};
pub use padding::{
    expand_tabs, find_tab_in_window, plan_padding, plan_retraction, plan_tab_expansion,
    span_is_intact, PaddingPlan,
};
pub use window::LineWindow;
