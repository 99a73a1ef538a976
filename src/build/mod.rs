//! Off-thread builds with generation-tagged results.

mod commands;
mod runtime;
mod worker;

pub use commands::{BuildCommand, BuildRequest, BuildResult};
pub use runtime::BuildRuntime;
pub use worker::spawn;
