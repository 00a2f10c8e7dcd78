//! Tag/length/value walk over opaque metadata bytes
//!
//! # Wire Layout
//!
//! ```text
//! +-----------------+-----------------------------+
//! | tag (varint)    | value                       |
//! | field << 3 | wt | varint / 8 / len+bytes / 4  |
//! +-----------------+-----------------------------+
//! ```
//!
//! Only wire types 0, 1, 2 and 5 are understood. Groups (3, 4) and the
//! reserved types (6, 7) end the walk like any other malformed input.

use crate::WireError;

/// Maximum encoded length of a 64-bit varint.
pub const MAX_VARINT_LEN: usize = 10;

/// Largest field number a tag may carry.
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// Decode a base-128 varint from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed, or `None` if the input
/// is truncated or the encoding does not fit in 64 bits.
///
/// # Examples
///
/// ```
/// use protofold_wire::decode_varint;
///
/// assert_eq!(decode_varint(&[0x96, 0x01]), Some((150, 2)));
/// assert_eq!(decode_varint(&[0x96]), None);
/// ```
pub fn decode_varint(bytes: &[u8]) -> Option<(u64, usize)> {
    read_varint(bytes).ok()
}

fn read_varint(bytes: &[u8]) -> Result<(u64, usize), WireError> {
    let mut value: u64 = 0;
    for (i, &byte) in bytes.iter().take(MAX_VARINT_LEN).enumerate() {
        // The tenth byte may only contribute the top bit.
        if i == MAX_VARINT_LEN - 1 && byte > 1 {
            return Err(WireError::VarintOverflow);
        }
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte < 0x80 {
            return Ok((value, i + 1));
        }
    }
    Err(WireError::Truncated)
}

/// Wire types this reader can skip over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    Varint,
    Fixed64,
    LengthDelimited,
    Fixed32,
}

impl WireType {
    /// Map the low three tag bits to a wire type.
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(WireType::Varint),
            1 => Some(WireType::Fixed64),
            2 => Some(WireType::LengthDelimited),
            5 => Some(WireType::Fixed32),
            _ => None,
        }
    }

    /// The three-bit code used in tags.
    pub fn bits(self) -> u8 {
        match self {
            WireType::Varint => 0,
            WireType::Fixed64 => 1,
            WireType::LengthDelimited => 2,
            WireType::Fixed32 => 5,
        }
    }
}

/// A raw field value borrowed from a metadata blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireValue<'a> {
    Varint(u64),
    Fixed64(u64),
    Bytes(&'a [u8]),
    Fixed32(u32),
}

impl<'a> WireValue<'a> {
    pub fn wire_type(&self) -> WireType {
        match self {
            WireValue::Varint(_) => WireType::Varint,
            WireValue::Fixed64(_) => WireType::Fixed64,
            WireValue::Bytes(_) => WireType::LengthDelimited,
            WireValue::Fixed32(_) => WireType::Fixed32,
        }
    }

    pub fn as_varint(&self) -> Option<u64> {
        match *self {
            WireValue::Varint(v) => Some(v),
            _ => None,
        }
    }

    /// Interpret a varint as a boolean (any non-zero value is true).
    pub fn as_bool(&self) -> Option<bool> {
        self.as_varint().map(|v| v != 0)
    }

    pub fn as_fixed64(&self) -> Option<u64> {
        match *self {
            WireValue::Fixed64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_fixed32(&self) -> Option<u32> {
        match *self {
            WireValue::Fixed32(v) => Some(v),
            _ => None,
        }
    }

    /// The payload of a length-delimited value.
    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match *self {
            WireValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// The payload of a length-delimited value, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&'a str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Treat a length-delimited payload as a nested blob and look up `field_number` in it.
    pub fn nested(&self, field_number: u32) -> Option<WireValue<'a>> {
        self.as_bytes().and_then(|b| find_field(b, field_number))
    }

    /// Unpack a packed repeated scalar.
    ///
    /// A single varint (the unpacked encoding) yields one element.
    pub fn packed(&self) -> Vec<u64> {
        match *self {
            WireValue::Varint(v) => vec![v],
            WireValue::Bytes(b) => packed_varints(b),
            _ => Vec::new(),
        }
    }
}

/// Iterator over the `(field_number, value)` pairs of a metadata blob.
///
/// Iteration ends at the end of input or at the first malformed byte; in the
/// latter case [`Fields::error`] reports why.
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    remaining: &'a [u8],
    error: Option<WireError>,
}

impl<'a> Fields<'a> {
    /// The reason the walk stopped early, if it did.
    pub fn error(&self) -> Option<WireError> {
        self.error
    }

    fn read_field(&mut self) -> Result<(u32, WireValue<'a>), WireError> {
        let (tag, tag_len) = read_varint(self.remaining)?;
        let field_number = tag >> 3;
        if field_number == 0 || field_number > u64::from(MAX_FIELD_NUMBER) {
            return Err(WireError::InvalidFieldNumber(field_number));
        }
        // Bounded by MAX_FIELD_NUMBER above.
        let field_number = field_number as u32;
        let bits = (tag & 0x7) as u8;
        let wire_type = WireType::from_bits(bits).ok_or(WireError::UnsupportedWireType(bits))?;

        let rest = &self.remaining[tag_len..];
        let (value, consumed) = match wire_type {
            WireType::Varint => {
                let (v, n) = read_varint(rest)?;
                (WireValue::Varint(v), n)
            }
            WireType::Fixed64 => {
                let raw: [u8; 8] = take(rest, 8)?.try_into().map_err(|_| WireError::Truncated)?;
                (WireValue::Fixed64(u64::from_le_bytes(raw)), 8)
            }
            WireType::Fixed32 => {
                let raw: [u8; 4] = take(rest, 4)?.try_into().map_err(|_| WireError::Truncated)?;
                (WireValue::Fixed32(u32::from_le_bytes(raw)), 4)
            }
            WireType::LengthDelimited => {
                let (length, len_len) = read_varint(rest)?;
                let body = &rest[len_len..];
                let out_of_range = WireError::LengthOutOfRange {
                    length,
                    remaining: body.len(),
                };
                let length = usize::try_from(length).map_err(|_| out_of_range)?;
                if length > body.len() {
                    return Err(out_of_range);
                }
                (WireValue::Bytes(&body[..length]), len_len + length)
            }
        };

        self.remaining = &rest[consumed..];
        Ok((field_number, value))
    }
}

fn take(bytes: &[u8], n: usize) -> Result<&[u8], WireError> {
    bytes.get(..n).ok_or(WireError::Truncated)
}

impl<'a> Iterator for Fields<'a> {
    type Item = (u32, WireValue<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.error.is_some() || self.remaining.is_empty() {
            return None;
        }
        match self.read_field() {
            Ok(field) => Some(field),
            Err(err) => {
                tracing::trace!(error = %err, "metadata walk stopped");
                self.error = Some(err);
                self.remaining = &[];
                None
            }
        }
    }
}

/// Walk every field of a metadata blob.
pub fn fields(bytes: &[u8]) -> Fields<'_> {
    Fields {
        remaining: bytes,
        error: None,
    }
}

/// Return the first value carried by `field_number`, or `None` if the field is
/// absent or the blob is malformed before it is reached.
///
/// # Examples
///
/// ```
/// use protofold_wire::find_field;
///
/// // field 7, length-delimited, "plan:pro"
/// let blob = [0x3a, 0x08, b'p', b'l', b'a', b'n', b':', b'p', b'r', b'o'];
///
/// assert_eq!(find_field(&blob, 7).and_then(|v| v.as_str()), Some("plan:pro"));
/// assert!(find_field(&blob, 8).is_none());
/// ```
pub fn find_field(bytes: &[u8], field_number: u32) -> Option<WireValue<'_>> {
    fields(bytes)
        .find(|(number, _)| *number == field_number)
        .map(|(_, value)| value)
}

/// Return every value carried by `field_number`, in encounter order.
pub fn find_all(bytes: &[u8], field_number: u32) -> Vec<WireValue<'_>> {
    fields(bytes)
        .filter(|(number, _)| *number == field_number)
        .map(|(_, value)| value)
        .collect()
}

/// Decode a run of back-to-back varints (a packed repeated scalar).
///
/// Decoding stops at the first malformed varint.
pub fn packed_varints(mut bytes: &[u8]) -> Vec<u64> {
    let mut values = Vec::new();
    while !bytes.is_empty() {
        match read_varint(bytes) {
            Ok((value, n)) => {
                values.push(value);
                bytes = &bytes[n..];
            }
            Err(_) => break,
        }
    }
    values
}

/// One field of one declaration's metadata blob, decoded on demand.
///
/// Holding an `ExtensionValue` costs nothing until a query is made, and every
/// query re-reads the same immutable span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionValue<'a> {
    blob: &'a [u8],
    field_number: u32,
}

impl<'a> ExtensionValue<'a> {
    pub fn new(blob: &'a [u8], field_number: u32) -> Self {
        Self { blob, field_number }
    }

    pub fn field_number(&self) -> u32 {
        self.field_number
    }

    /// The first raw value for this field.
    pub fn value(&self) -> Option<WireValue<'a>> {
        find_field(self.blob, self.field_number)
    }

    pub fn is_present(&self) -> bool {
        self.value().is_some()
    }

    /// The payload bytes, when the field is length-delimited.
    pub fn raw(&self) -> Option<&'a [u8]> {
        self.value().and_then(|v| v.as_bytes())
    }

    /// Scope a lookup to `field_number` inside this field's payload.
    ///
    /// Returns `None` when this field is absent or not length-delimited.
    pub fn child(&self, field_number: u32) -> Option<ExtensionValue<'a>> {
        self.raw().map(|blob| ExtensionValue::new(blob, field_number))
    }
}

#[cfg(test)]
#[path = "reader/reader_tests.rs"]
mod reader_tests;
