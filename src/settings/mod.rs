//! Configuration loading and resolution.
//!
//! `load` layers config files, `SPRIG__` environment variables and CLI flags
//! into a [`ResolvedConfig`] ready to drive a build.

mod loader;
mod raw;
mod resolved;
mod sources;
mod util;

pub use loader::load;
pub use resolved::ResolvedConfig;
