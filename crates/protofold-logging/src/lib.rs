//! protofold-logging - Tracing subscriber setup
//!
//! Library crates in the workspace only emit `tracing` events. This crate is
//! where a binary turns them into output:
//! - [`LogLevel`] parsed from flags and config files
//! - [`init_logging`] for a fixed level, adjustable later through [`ReloadHandle`]
//! - [`init_from_env`] honouring `RUST_LOG`

mod level;
mod subscriber;

pub use level::{LogLevel, ParseLevelError};
pub use subscriber::{ReloadHandle, init_from_env, init_logging, subscriber_with_writer};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{LogLevel, ReloadHandle, init_from_env, init_logging};
}
