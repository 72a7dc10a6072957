//! # Certificate Model
//!
//! A device builds a `CertificateRequest` over its own public key, the CA
//! countersigns the request's canonical encoding, and the resulting
//! `CertificateResponse` travels inside every transaction payload.
//!
//! Construction never validates; trust checks live in `verification`.

use super::codec;
use super::errors::CodecError;
use serde::{Deserialize, Serialize};
use shared_crypto::{random_token_hex, Secp256k1PublicKey, Signer};

/// Identity statement signed by the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CertificateRequestHeader {
    /// Device identity. Serialized under the deployed wire name.
    #[serde(rename = "distinguied_name")]
    pub distinguished_name: String,
    /// Hex compressed secp256k1 key (66 chars).
    pub sender_public_key: String,
    /// Random hex token.
    pub nonce: String,
}

impl CertificateRequestHeader {
    /// Build a header with a fresh random nonce.
    pub fn create(distinguished_name: &str, sender_public_key: &Secp256k1PublicKey) -> Self {
        Self {
            distinguished_name: distinguished_name.to_string(),
            sender_public_key: sender_public_key.as_hex(),
            nonce: random_token_hex(),
        }
    }

    /// Canonical encoding, the subject of the device signature.
    pub fn serialize(&self) -> Result<Vec<u8>, CodecError> {
        codec::encode(self)
    }
}

/// Header plus the device signature over its canonical encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CertificateRequest {
    pub header: CertificateRequestHeader,
    /// Hex compact signature by `header.sender_public_key`.
    pub signature: String,
}

impl CertificateRequest {
    /// Build a header for `signer`'s key and sign it.
    pub fn create(distinguished_name: &str, signer: &Signer<'_>) -> Result<Self, CodecError> {
        let header = CertificateRequestHeader::create(distinguished_name, &signer.public_key());
        let signature = signer.sign(&header.serialize()?);

        Ok(Self { header, signature })
    }

    /// Key the certificate vouches for.
    pub fn sender_public_key(&self) -> &str {
        &self.header.sender_public_key
    }

    /// Canonical encoding, the subject of the CA countersignature.
    pub fn serialize(&self) -> Result<Vec<u8>, CodecError> {
        codec::encode(self)
    }
}

/// CA countersignature over a `CertificateRequest`.
///
/// `ca_public_key` is informational. Admission never reads it; the trusted
/// CA key comes from local configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CertificateResponse {
    #[serde(rename = "ca_pub_key")]
    pub ca_public_key: String,
    pub signature: String,
}

impl CertificateResponse {
    /// Response as embedded in a payload: signature only, CA key left empty.
    pub fn embedded(signature: impl Into<String>) -> Self {
        Self {
            ca_public_key: String::new(),
            signature: signature.into(),
        }
    }
}

/// Client-side certificate authority.
pub struct CertificateAuthority<'a> {
    signer: Signer<'a>,
}

impl<'a> CertificateAuthority<'a> {
    pub fn new(signer: Signer<'a>) -> Self {
        Self { signer }
    }

    /// Public key devices and processors must trust.
    pub fn public_key(&self) -> Secp256k1PublicKey {
        self.signer.public_key()
    }

    /// Sign the canonical encoding of `request`, returning the hex signature.
    pub fn countersign(&self, request: &CertificateRequest) -> Result<String, CodecError> {
        Ok(self.signer.sign(&request.serialize()?))
    }

    /// Full response carrying this CA's public key.
    pub fn respond(&self, request: &CertificateRequest) -> Result<CertificateResponse, CodecError> {
        Ok(CertificateResponse {
            ca_public_key: self.public_key().as_hex(),
            signature: self.countersign(request)?,
        })
    }
}
