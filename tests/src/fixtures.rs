//! Shared fixtures: one trusted CA and one device, plus builders for
//! countersigned payloads and host transactions.

use aa_01_anchor_processor::{
    AnchorTransactionHandler, CertificateAuthority, CertificateRequest, CertificateVerifier,
    CodecError, HandlerConfig, RawTransaction, TransactionPayload, DEFAULT_FAMILY_VERSION,
};
use shared_crypto::{Secp256k1Context, Secp256k1PrivateKey, Secp256k1PublicKey, Signer};
use std::sync::Arc;

/// Device identity used throughout the suite.
pub const DEVICE_NAME: &str = "device-1";

/// Datum from the reference scenario.
pub const LOCATION: &str = "location=51.5,-0.1";

pub struct Fixture {
    pub context: Arc<Secp256k1Context>,
    pub ca_key: Secp256k1PrivateKey,
    pub device_key: Secp256k1PrivateKey,
    pub config: HandlerConfig,
}

impl Fixture {
    pub fn new() -> Self {
        let context = Arc::new(Secp256k1Context::new());
        Self {
            ca_key: context.new_random_private_key(),
            device_key: context.new_random_private_key(),
            context,
            config: HandlerConfig::default(),
        }
    }

    pub fn ca_public_key(&self) -> Secp256k1PublicKey {
        self.context.get_public_key(&self.ca_key)
    }

    pub fn device_public_key(&self) -> Secp256k1PublicKey {
        self.context.get_public_key(&self.device_key)
    }

    /// Handler trusting this fixture's CA.
    pub fn handler(&self) -> AnchorTransactionHandler {
        let verifier = CertificateVerifier::new(Arc::clone(&self.context), self.ca_public_key());
        AnchorTransactionHandler::new(self.config.clone(), verifier)
    }

    /// Certificate request for the device, countersigned by `ca_key`.
    pub fn countersigned_request(
        &self,
        ca_key: &Secp256k1PrivateKey,
    ) -> Result<(CertificateRequest, String), CodecError> {
        let device = Signer::new(&self.context, self.device_key.clone());
        let ca = CertificateAuthority::new(Signer::new(&self.context, ca_key.clone()));

        let request = CertificateRequest::create(DEVICE_NAME, &device)?;
        let ca_signature = ca.countersign(&request)?;
        Ok((request, ca_signature))
    }

    /// Payload authorized by the trusted CA.
    pub fn payload(&self, data: &str) -> Result<TransactionPayload, CodecError> {
        self.payload_signed_by(&self.ca_key, data)
    }

    /// Payload whose certificate is countersigned by `ca_key`.
    pub fn payload_signed_by(
        &self,
        ca_key: &Secp256k1PrivateKey,
        data: &str,
    ) -> Result<TransactionPayload, CodecError> {
        let (request, ca_signature) = self.countersigned_request(ca_key)?;
        let device = Signer::new(&self.context, self.device_key.clone());
        Ok(TransactionPayload::create(&device, request, ca_signature, data))
    }

    /// Trusted payload with a fixed nonce.
    pub fn payload_with_nonce(
        &self,
        data: &str,
        nonce: &str,
    ) -> Result<TransactionPayload, CodecError> {
        let (request, ca_signature) = self.countersigned_request(&self.ca_key)?;
        let device = Signer::new(&self.context, self.device_key.clone());
        Ok(TransactionPayload::with_nonce(
            &device,
            request,
            ca_signature,
            data,
            nonce,
        ))
    }

    /// Host transaction carrying `payload`'s canonical bytes.
    pub fn transaction(&self, payload: &TransactionPayload) -> Result<RawTransaction, CodecError> {
        Ok(self.raw_transaction(payload.serialize()?))
    }

    /// Host transaction carrying arbitrary bytes.
    pub fn raw_transaction(&self, payload: Vec<u8>) -> RawTransaction {
        RawTransaction::new(
            self.config.family_name.as_str(),
            self.config
                .family_versions
                .first()
                .map_or(DEFAULT_FAMILY_VERSION, String::as_str),
            self.device_public_key().as_hex(),
            payload,
        )
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
