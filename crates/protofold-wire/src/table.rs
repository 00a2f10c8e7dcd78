//! Field-number → handler dispatch for options messages
//!
//! A [`FieldTable`] replaces a hand-written tag walk per options type: each
//! options struct registers one handler per field number it understands and
//! the table performs the single walk.
//!
//! # Examples
//!
//! ```
//! use protofold_wire::FieldTable;
//!
//! #[derive(Default)]
//! struct Billing {
//!     plans: Vec<String>,
//!     metered: bool,
//! }
//!
//! let table = FieldTable::<Billing>::new()
//!     .on(1, |b, v| b.plans.extend(v.as_str().map(String::from)))
//!     .on(2, |b, v| b.metered = v.as_bool().unwrap_or(false));
//!
//! // plans: "pro", metered: true
//! let blob = [0x0a, 0x03, b'p', b'r', b'o', 0x10, 0x01];
//! let billing = table.decode(&blob);
//!
//! assert_eq!(billing.plans, vec!["pro".to_string()]);
//! assert!(billing.metered);
//! ```

use crate::reader::{WireValue, fields};
use std::collections::BTreeMap;
use std::fmt;

/// Applies one decoded field to the target options value.
pub type FieldHandler<T> = fn(&mut T, WireValue<'_>);

/// Ordered field-number → handler table.
pub struct FieldTable<T> {
    handlers: BTreeMap<u32, FieldHandler<T>>,
}

impl<T> FieldTable<T> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Register the handler for `field_number`, replacing any previous one.
    pub fn on(mut self, field_number: u32, handler: FieldHandler<T>) -> Self {
        self.handlers.insert(field_number, handler);
        self
    }

    /// Whether a handler is registered for `field_number`
    pub fn handles(&self, field_number: u32) -> bool {
        self.handlers.contains_key(&field_number)
    }

    /// Registered field numbers, ascending.
    pub fn field_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.handlers.keys().copied()
    }

    /// Walk `bytes` once, applying the handler of every recognised field in
    /// encounter order. Unknown fields are skipped; a malformed blob stops the
    /// walk and leaves `target` with whatever was applied before that point.
    pub fn decode_into(&self, bytes: &[u8], target: &mut T) {
        let mut walk = fields(bytes);
        for (field_number, value) in walk.by_ref() {
            if let Some(handler) = self.handlers.get(&field_number) {
                handler(target, value);
            }
        }
        if let Some(err) = walk.error() {
            tracing::debug!(error = %err, "options decode stopped early");
        }
    }
}

impl<T: Default> FieldTable<T> {
    /// Decode `bytes` into a fresh `T::default()`.
    pub fn decode(&self, bytes: &[u8]) -> T {
        let mut target = T::default();
        self.decode_into(bytes, &mut target);
        target
    }
}

impl<T> Default for FieldTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FieldTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTable")
            .field("fields", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
