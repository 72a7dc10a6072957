//! # Admission Errors
//!
//! Every rejection of a transaction is exactly one of four kinds. The kind is
//! what the submitter sees and what audit logs key on; the message is short
//! and never carries internal state.

use std::fmt;
use thiserror::Error;

/// Errors that reject a transaction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdmissionError {
    /// Payload could not be decoded: missing or mistyped field, bad encoding,
    /// non-canonical bytes, or a header that does not belong to this family.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// The CA countersignature over the certificate request did not verify.
    #[error("Invalid certificate: {0}")]
    InvalidCertificate(String),

    /// The anchored datum has the wrong type or shape.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Prior state could not be decoded, or the host refused the write.
    #[error("Internal state error: {0}")]
    InternalStateError(String),
}

impl AdmissionError {
    /// Stable kind of this rejection.
    #[must_use]
    pub fn kind(&self) -> AdmissionErrorKind {
        match self {
            Self::MalformedPayload(_) => AdmissionErrorKind::MalformedPayload,
            Self::InvalidCertificate(_) => AdmissionErrorKind::InvalidCertificate,
            Self::InvalidData(_) => AdmissionErrorKind::InvalidData,
            Self::InternalStateError(_) => AdmissionErrorKind::InternalStateError,
        }
    }

    /// True for host-side faults; false for problems with the submitted input.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::InternalStateError(_))
    }
}

/// Discriminant of `AdmissionError`, used as a log field and metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdmissionErrorKind {
    MalformedPayload,
    InvalidCertificate,
    InvalidData,
    InternalStateError,
}

impl AdmissionErrorKind {
    /// Snake-case label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedPayload => "malformed_payload",
            Self::InvalidCertificate => "invalid_certificate",
            Self::InvalidData => "invalid_data",
            Self::InternalStateError => "internal_state_error",
        }
    }
}

impl fmt::Display for AdmissionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from the canonical codec.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Value could not be serialized.
    #[error("Serialization failed: {0}")]
    Serialize(String),

    /// Bytes are not a well-formed record of the expected schema.
    #[error("Malformed record: {0}")]
    Malformed(String),

    /// Bytes decode, but are not the canonical encoding of the decoded value.
    #[error("Record is not canonically encoded")]
    NonCanonical,
}

/// Errors from state address derivation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("Namespace prefix must be {expected} hex chars, got {actual:?}")]
    InvalidNamespacePrefix { expected: usize, actual: String },

    #[error("Sender public key too short: need {needed} hex chars, got {actual}")]
    SenderKeyTooShort { needed: usize, actual: usize },

    #[error("Content hash too short: need {needed} hex chars, got {actual}")]
    ContentHashTooShort { needed: usize, actual: usize },

    #[error("Address component is not hex: {0}")]
    NotHex(&'static str),
}
