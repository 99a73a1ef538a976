//! Terminal front end: the tree widget, the query prompt and the event loop.
//!
//! [`TreeWidget`] is usable on its own with any ratatui backend; [`App`] and
//! [`run`] wire it to a [`BuildRuntime`](crate::build::BuildRuntime) for the
//! interactive `sprig` session.

mod app;
mod input;
mod runtime;
mod status;
mod widget;

pub use app::{App, Outcome};
pub use input::QueryInput;
pub use runtime::run;
pub use status::{NoStatus, StatusProvider};
pub use widget::{StatusLine, TreeWidget, branch_prefix, line_label, stats_summary};
