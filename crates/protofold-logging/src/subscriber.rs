//! Global subscriber installation and runtime level changes

use crate::LogLevel;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, reload};

/// Handle for changing the level of a subscriber installed by [`init_logging`]
pub struct ReloadHandle {
    handle: Mutex<Option<reload::Handle<LevelFilter, Registry>>>,
}

impl ReloadHandle {
    pub fn new() -> Self {
        Self {
            handle: Mutex::new(None),
        }
    }

    /// Get the global reload handle
    pub fn global() -> &'static ReloadHandle {
        static INSTANCE: OnceCell<ReloadHandle> = OnceCell::new();
        INSTANCE.get_or_init(ReloadHandle::new)
    }

    fn set_handle(&self, handle: reload::Handle<LevelFilter, Registry>) {
        *self.handle.lock() = Some(handle);
    }

    /// Whether a reloadable subscriber has been installed
    pub fn is_installed(&self) -> bool {
        self.handle.lock().is_some()
    }

    /// Replace the active level
    pub fn set_level(&self, level: LogLevel) -> Result<(), String> {
        let guard = self.handle.lock();
        match guard.as_ref() {
            Some(handle) => handle
                .reload(level.to_filter())
                .map_err(|e| format!("failed to reload log filter: {e}")),
            None => Err("log level cannot change: init_logging was not used".to_string()),
        }
    }
}

impl Default for ReloadHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Build (without installing) a subscriber writing human-readable lines to `writer`.
pub fn subscriber_with_writer<W>(level: LogLevel, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry().with(level.to_filter()).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_target(false)
            .with_ansi(false),
    )
}

/// Install a global subscriber logging to stderr at `level`.
///
/// Returns `false` (and changes nothing) if a global subscriber is already
/// installed. The level can be changed later through [`ReloadHandle::global`].
pub fn init_logging(level: LogLevel) -> bool {
    let (filter, handle) = reload::Layer::new(level.to_filter());
    let subscriber = tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false),
    );

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return false;
    }
    ReloadHandle::global().set_handle(handle);
    true
}

/// Install a global subscriber logging to stderr, filtered by `RUST_LOG` when
/// it is set and parses, otherwise by `default`.
///
/// Returns `false` if a global subscriber is already installed.
pub fn init_from_env(default: LogLevel) -> bool {
    let filter = EnvFilter::builder()
        .with_default_directive(default.to_filter().into())
        .from_env_lossy();
    let subscriber = tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false),
    );

    tracing::subscriber::set_global_default(subscriber).is_ok()
}
