//! # Address Derivation
//!
//! ```text
//! address = namespace_prefix (6) || sender_public_key[..6] || content_hash[-58..]
//! ```
//!
//! 70 lowercase hex chars. The sender-key segment is 6 hex chars, i.e. 16^6
//! (about 1.7e7) buckets; the hash suffix keeps 232 bits, so distinct payloads
//! landing on the same address are not a practical concern. Keys and hashes
//! are lowercased before use.

use super::errors::AddressError;
use shared_crypto::{is_hex, sha512_hex};
use std::fmt;

/// Hex chars of the namespace prefix.
pub const NAMESPACE_PREFIX_LENGTH: usize = 6;
/// Hex chars taken from the front of the sender key.
pub const SENDER_SEGMENT_LENGTH: usize = 6;
/// Hex chars taken from the end of the content hash.
pub const HASH_SEGMENT_LENGTH: usize = 58;
/// Total address width.
pub const ADDRESS_LENGTH: usize =
    NAMESPACE_PREFIX_LENGTH + SENDER_SEGMENT_LENGTH + HASH_SEGMENT_LENGTH;

/// First 6 hex chars of sha512(family_name).
pub fn namespace_prefix(family_name: &str) -> String {
    let mut digest = sha512_hex(family_name.as_bytes());
    digest.truncate(NAMESPACE_PREFIX_LENGTH);
    digest
}

/// A 70-char state address.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateAddress(String);

impl StateAddress {
    /// Wrap an address read back from the host.
    pub fn parse(address: &str) -> Result<Self, AddressError> {
        if address.len() != ADDRESS_LENGTH || !is_hex(address) {
            return Err(AddressError::NotHex("address"));
        }
        Ok(Self(address.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the address lies under `prefix`.
    pub fn in_namespace(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for StateAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StateAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive the state address for a (sender, content hash) pair.
pub fn derive_address(
    namespace_prefix: &str,
    sender_public_key: &str,
    content_hash: &str,
) -> Result<StateAddress, AddressError> {
    if namespace_prefix.len() != NAMESPACE_PREFIX_LENGTH || !is_hex(namespace_prefix) {
        return Err(AddressError::InvalidNamespacePrefix {
            expected: NAMESPACE_PREFIX_LENGTH,
            actual: namespace_prefix.to_string(),
        });
    }
    if sender_public_key.len() < SENDER_SEGMENT_LENGTH {
        return Err(AddressError::SenderKeyTooShort {
            needed: SENDER_SEGMENT_LENGTH,
            actual: sender_public_key.len(),
        });
    }
    if content_hash.len() < HASH_SEGMENT_LENGTH {
        return Err(AddressError::ContentHashTooShort {
            needed: HASH_SEGMENT_LENGTH,
            actual: content_hash.len(),
        });
    }
    if !is_hex(sender_public_key) {
        return Err(AddressError::NotHex("sender_public_key"));
    }
    if !is_hex(content_hash) {
        return Err(AddressError::NotHex("content_hash"));
    }

    let mut address = String::with_capacity(ADDRESS_LENGTH);
    address.push_str(namespace_prefix);
    address.push_str(&sender_public_key[..SENDER_SEGMENT_LENGTH]);
    address.push_str(&content_hash[content_hash.len() - HASH_SEGMENT_LENGTH..]);

    Ok(StateAddress(address.to_ascii_lowercase()))
}
