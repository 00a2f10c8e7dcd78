//! protofold-wire - Schema-less option metadata reader
//!
//! This crate provides:
//! - [`find_field`] / [`find_all`] to pull raw values for a field number out of
//!   an opaque metadata blob without any compiled description of its schema
//! - [`ExtensionValue`] for lazy, recursive lookups inside nested blobs
//! - [`FieldTable`] to decode a whole options message through one
//!   field-number → handler dispatch table
//!
//! Every lookup is infallible at the surface: truncated or corrupt input ends
//! the walk and whatever has not been found yet is reported as absent.

mod error;
mod reader;
mod table;

pub use error::WireError;
pub use reader::{
    ExtensionValue, Fields, MAX_FIELD_NUMBER, MAX_VARINT_LEN, WireType, WireValue, decode_varint,
    fields, find_all, find_field, packed_varints,
};
pub use table::{FieldHandler, FieldTable};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ExtensionValue, FieldTable, WireType, WireValue, find_all, find_field, packed_varints,
    };
}
