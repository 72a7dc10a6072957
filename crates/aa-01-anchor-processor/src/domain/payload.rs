//! # Transaction Payload Model
//!
//! `TransactionPayload` is the authoritative on-ledger unit. Its content hash
//! is SHA-512 over the canonical encoding of the whole payload, nonce
//! included, so two submissions of the same datum never share a hash.
//!
//! Decoding happens in two steps. `PayloadEnvelope::decode` checks structure,
//! key shapes and canonical form while keeping `data` as raw JSON text;
//! `PayloadEnvelope::into_payload` then enforces the datum's type. The
//! handler authorizes in between, so a bad certificate is reported before a
//! bad datum.

use super::certificate::{CertificateRequest, CertificateResponse};
use super::codec;
use super::errors::{AdmissionError, CodecError};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use shared_crypto::{is_hex, random_token_hex, sha512_hex, Signer};

/// Hex length of a compressed secp256k1 public key.
pub const PUBLIC_KEY_HEX_LENGTH: usize = 66;

/// Anything carrying a certificate request and its CA countersignature.
pub trait Countersigned {
    fn certificate_request(&self) -> &CertificateRequest;
    fn certificate_authority_response(&self) -> &CertificateResponse;

    /// Key vouched for by the certificate request.
    fn sender_public_key(&self) -> &str {
        self.certificate_request().sender_public_key()
    }
}

/// Device-submitted anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransactionPayload {
    pub batcher_public_key: String,
    pub certificate_request: CertificateRequest,
    pub certificate_authority_response: CertificateResponse,
    pub nonce: String,
    pub data: String,
}

impl TransactionPayload {
    /// Assemble a payload with a fresh nonce. `ca_signature` is not checked.
    pub fn create(
        signer: &Signer<'_>,
        certificate_request: CertificateRequest,
        ca_signature: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self::with_nonce(
            signer,
            certificate_request,
            ca_signature,
            data,
            random_token_hex(),
        )
    }

    /// Assemble a payload with a caller-chosen nonce.
    ///
    /// Replays and forced hash collisions are built with this; clients
    /// should use [`TransactionPayload::create`].
    pub fn with_nonce(
        signer: &Signer<'_>,
        certificate_request: CertificateRequest,
        ca_signature: impl Into<String>,
        data: impl Into<String>,
        nonce: impl Into<String>,
    ) -> Self {
        Self {
            batcher_public_key: signer.public_key().as_hex(),
            certificate_request,
            certificate_authority_response: CertificateResponse::embedded(ca_signature),
            nonce: nonce.into(),
            data: data.into(),
        }
    }

    /// Canonical encoding; this is the transaction body.
    pub fn serialize(&self) -> Result<Vec<u8>, CodecError> {
        codec::encode(self)
    }

    /// Lowercase hex SHA-512 of the canonical encoding.
    pub fn hash(&self) -> Result<String, CodecError> {
        Ok(sha512_hex(&self.serialize()?))
    }

    /// Decode and fully validate a transaction body.
    pub fn decode(bytes: &[u8]) -> Result<Self, AdmissionError> {
        PayloadEnvelope::decode(bytes)?.into_payload()
    }
}

impl Countersigned for TransactionPayload {
    fn certificate_request(&self) -> &CertificateRequest {
        &self.certificate_request
    }

    fn certificate_authority_response(&self) -> &CertificateResponse {
        &self.certificate_authority_response
    }
}

/// Structurally valid payload whose datum has not been type-checked yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PayloadEnvelope {
    pub batcher_public_key: String,
    pub certificate_request: CertificateRequest,
    pub certificate_authority_response: CertificateResponse,
    pub nonce: String,
    /// Datum exactly as it appeared on the wire.
    pub data: Box<RawValue>,
}

impl PayloadEnvelope {
    /// Decode a transaction body.
    ///
    /// # Errors
    ///
    /// `MalformedPayload` on a missing, extra or mistyped field, a
    /// non-canonical encoding, a key that is not a 66-char hex point
    /// encoding, or an empty or non-hex nonce.
    ///
    /// A datum that is not a string is passed through verbatim so that its
    /// type is reported by [`PayloadEnvelope::into_payload`].
    pub fn decode(bytes: &[u8]) -> Result<Self, AdmissionError> {
        let envelope: Self = codec::decode_loose(bytes).map_err(malformed)?;
        codec::ensure_canonical(&envelope, bytes).map_err(malformed)?;
        if let Ok(data) = serde_json::from_str::<String>(envelope.data.get()) {
            codec::ensure_canonical(&data, envelope.data.get().as_bytes()).map_err(malformed)?;
        }

        check_public_key("sender_public_key", envelope.sender_public_key())?;
        check_public_key("batcher_public_key", &envelope.batcher_public_key)?;
        if !is_hex(&envelope.nonce) {
            return Err(AdmissionError::MalformedPayload(
                "nonce must be a non-empty hex token".into(),
            ));
        }

        Ok(envelope)
    }

    /// Enforce that the datum is a string.
    pub fn into_payload(self) -> Result<TransactionPayload, AdmissionError> {
        let data: String = serde_json::from_str(self.data.get()).map_err(|_| {
            AdmissionError::InvalidData(format!(
                "data must be a string, got {}",
                json_type_name(self.data.get())
            ))
        })?;

        Ok(TransactionPayload {
            batcher_public_key: self.batcher_public_key,
            certificate_request: self.certificate_request,
            certificate_authority_response: self.certificate_authority_response,
            nonce: self.nonce,
            data,
        })
    }
}

impl Countersigned for PayloadEnvelope {
    fn certificate_request(&self) -> &CertificateRequest {
        &self.certificate_request
    }

    fn certificate_authority_response(&self) -> &CertificateResponse {
        &self.certificate_authority_response
    }
}

fn malformed(err: CodecError) -> AdmissionError {
    AdmissionError::MalformedPayload(err.to_string())
}

fn check_public_key(field: &str, key: &str) -> Result<(), AdmissionError> {
    if key.len() == PUBLIC_KEY_HEX_LENGTH && is_hex(key) {
        Ok(())
    } else {
        Err(AdmissionError::MalformedPayload(format!(
            "{field} must be {PUBLIC_KEY_HEX_LENGTH} hex chars"
        )))
    }
}

fn json_type_name(raw: &str) -> &'static str {
    match raw.as_bytes().first() {
        Some(b'n') => "null",
        Some(b't' | b'f') => "bool",
        Some(b'"') => "string",
        Some(b'[') => "array",
        Some(b'{') => "object",
        _ => "number",
    }
}
