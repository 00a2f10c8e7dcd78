//! protofold-fragment - Composable text fragments for code generators
//!
//! This crate provides:
//! - [`Fragment`], an immutable unit of generated text that renders the same
//!   bytes every time
//! - [`Monoid`] with [`concat`], [`fold`] and [`fold_map`] so emitters build
//!   output by composition instead of cursors, buffers or indent counters
//! - [`naming`] helpers shared by every emitter
//!
//! # Example
//!
//! ```
//! use protofold_fragment::{Fragment, fold_map, when};
//!
//! let fields = ["id", "email"];
//! let body = fold_map(fields, |f| Fragment::line(format!("{f} string")));
//! let out = Fragment::block("type User struct {", body, "}")
//!     .append(when(true, Fragment::comment("generated")));
//!
//! assert_eq!(out.render(), "type User struct {\n\tid string\n\temail string\n}\n// generated\n");
//! ```

mod fragment;
mod monoid;
pub mod naming;

pub use fragment::{DEFAULT_INDENT, Fragment, join, when, when_some};
pub use monoid::{Monoid, concat, fold, fold_map};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{Fragment, Monoid, concat, fold, fold_map, join, when, when_some};
}
