//! protofold-cli - Command implementations behind the `protofold` binary
//!
//! - `analyze`: JSON analysis (entities, classifications) per schema file
//! - `report`: plain-text report rendered with the fragment algebra
//! - `check`: validate a protofold.toml

pub mod commands;
pub mod config;
pub mod emit;

pub use commands::{OutputKind, RunSummary, check, load_schemas, run};
pub use emit::{JsonEmitter, ReportEmitter};
