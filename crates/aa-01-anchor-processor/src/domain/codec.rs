//! # Canonical Codec
//!
//! Deterministic JSON encoding used as the exact input to hashing and
//! signing.
//!
//! ## Rules
//!
//! - Struct fields in declaration order; map keys in `BTreeMap` order
//! - No insignificant whitespace; `,` and `:` separators
//! - Output is pure ASCII: `"` and `\` and control characters use the short
//!   or `\u00XX` escapes, everything outside `0x20..=0x7E` is written as
//!   `\uXXXX` (UTF-16 surrogate pairs above the BMP), lowercase hex
//!
//! `decode` is strict: it accepts only bytes that re-encode to themselves, so
//! trailing data, extra whitespace, unknown fields and alternative escapes
//! are all rejected.

use super::errors::CodecError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use std::io;

/// Compact formatter that escapes every non-printable-ASCII character.
#[derive(Debug, Default, Clone, Copy)]
pub struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if (' '..='~').contains(&ch) {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..index])?;

            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = index + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

/// Encode `value` canonically.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(256);
    let mut serializer = Serializer::with_formatter(&mut out, CanonicalFormatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| CodecError::Serialize(e.to_string()))?;
    Ok(out)
}

/// Encode `value` canonically as a `String`.
pub fn encode_to_string<T: Serialize + ?Sized>(value: &T) -> Result<String, CodecError> {
    let bytes = encode(value)?;
    // Canonical output is ASCII by construction
    String::from_utf8(bytes).map_err(|e| CodecError::Serialize(e.to_string()))
}

/// Decode a record without the canonical round-trip check.
///
/// Only for intermediate wire shapes; records that are hashed or signed go
/// through [`decode`].
pub fn decode_loose<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(bytes).map_err(|e| CodecError::Malformed(e.to_string()))
}

/// Decode a record, requiring `bytes` to be its canonical encoding.
pub fn decode<T: DeserializeOwned + Serialize>(bytes: &[u8]) -> Result<T, CodecError> {
    let value: T = decode_loose(bytes)?;
    ensure_canonical(&value, bytes)?;
    Ok(value)
}

/// Fail with `NonCanonical` unless `bytes == encode(value)`.
pub fn ensure_canonical<T: Serialize + ?Sized>(value: &T, bytes: &[u8]) -> Result<(), CodecError> {
    if encode(value)? == bytes {
        Ok(())
    } else {
        Err(CodecError::NonCanonical)
    }
}
