//! # Verification Engine
//!
//! The chained trust check: the trusted CA key must have countersigned the
//! canonical encoding of the certificate request carried by the payload.
//!
//! The CA key is always the locally configured one. The payload's own
//! `certificate_authority_response.ca_public_key` is never consulted, so a
//! payload cannot nominate its own CA.

use super::errors::AdmissionError;
use super::payload::Countersigned;
use shared_crypto::{CryptoError, Secp256k1Context, Secp256k1PublicKey, Secp256k1Signature};
use std::sync::Arc;

/// Check the CA countersignature of `payload` under `ca_public_key`.
///
/// Every failure, including undecodable hex, is `InvalidCertificate`.
pub fn authorize<P: Countersigned + ?Sized>(
    context: &Secp256k1Context,
    payload: &P,
    ca_public_key: &Secp256k1PublicKey,
) -> Result<(), AdmissionError> {
    let subject = payload
        .certificate_request()
        .serialize()
        .map_err(|e| AdmissionError::InvalidCertificate(e.to_string()))?;
    let signature = Secp256k1Signature::from_hex(&payload.certificate_authority_response().signature)
        .map_err(certificate_error)?;

    context
        .verify(&signature, &subject, ca_public_key)
        .map_err(certificate_error)
}

/// Check the device signature over the certificate request header.
///
/// Not part of the baseline protocol; enabled through configuration.
pub fn verify_device_signature<P: Countersigned + ?Sized>(
    context: &Secp256k1Context,
    payload: &P,
) -> Result<(), AdmissionError> {
    let request = payload.certificate_request();
    let subject = request
        .header
        .serialize()
        .map_err(|e| AdmissionError::InvalidCertificate(e.to_string()))?;

    context
        .verify_hex(&request.signature, &subject, request.sender_public_key())
        .map_err(|e| AdmissionError::InvalidCertificate(format!("device signature: {e}")))
}

fn certificate_error(err: CryptoError) -> AdmissionError {
    AdmissionError::InvalidCertificate(format!("CA signature: {err}"))
}

/// Verification engine bound to the shared context and the trusted CA key.
#[derive(Debug, Clone)]
pub struct CertificateVerifier {
    context: Arc<Secp256k1Context>,
    trusted_ca: Secp256k1PublicKey,
    require_device_signature: bool,
}

impl CertificateVerifier {
    pub fn new(context: Arc<Secp256k1Context>, trusted_ca: Secp256k1PublicKey) -> Self {
        Self {
            context,
            trusted_ca,
            require_device_signature: false,
        }
    }

    /// Also require a valid device signature on the certificate request.
    #[must_use]
    pub fn with_device_signature(mut self, required: bool) -> Self {
        self.require_device_signature = required;
        self
    }

    pub fn context(&self) -> &Secp256k1Context {
        &self.context
    }

    /// The configured CA key.
    pub fn trusted_ca(&self) -> &Secp256k1PublicKey {
        &self.trusted_ca
    }

    /// Run every configured check against `payload`.
    pub fn authorize<P: Countersigned + ?Sized>(&self, payload: &P) -> Result<(), AdmissionError> {
        authorize(&self.context, payload, &self.trusted_ca)?;
        if self.require_device_signature {
            verify_device_signature(&self.context, payload)?;
        }
        Ok(())
    }
}
