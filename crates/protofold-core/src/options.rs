//! Entity annotation decoding
//!
//! The annotation lives in a declaration's options under the configured
//! extension number. A length-delimited payload is itself an options blob:
//!
//! | field | name | type |
//! |-------|------|------|
//! | 1 | `collection` | string |
//! | 2 | `id_field` | string |
//!
//! Any other payload shape still marks the declaration as an entity.

use once_cell::sync::Lazy;
use protofold_wire::{ExtensionValue, FieldTable, WireValue};
use serde::Serialize;

/// Overrides carried by an entity annotation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntityOptions {
    /// Storage collection replacing the derived name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,

    /// Preferred identifier field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_field: Option<String>,
}

static ENTITY_OPTIONS: Lazy<FieldTable<EntityOptions>> = Lazy::new(|| {
    FieldTable::<EntityOptions>::new()
        .on(1, |o, v| o.collection = non_blank(v))
        .on(2, |o, v| o.id_field = non_blank(v))
});

fn non_blank(value: WireValue<'_>) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

impl EntityOptions {
    /// Decode an annotation payload; malformed bytes yield whatever was read first.
    pub fn decode(payload: &[u8]) -> Self {
        ENTITY_OPTIONS.decode(payload)
    }
}

/// Read the entity annotation from a declaration's options blob.
///
/// Returns `None` when the annotation is absent (or the blob is malformed
/// before it is reached).
pub fn entity_annotation(options: &[u8], extension_number: u32) -> Option<EntityOptions> {
    let annotation = ExtensionValue::new(options, extension_number);
    let value = annotation.value()?;
    Some(match value.as_bytes() {
        Some(payload) => EntityOptions::decode(payload),
        None => EntityOptions::default(),
    })
}
