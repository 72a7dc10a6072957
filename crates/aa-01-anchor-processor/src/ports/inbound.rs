//! # Inbound Ports (Driving Ports / API)
//!
//! What the host runtime hands to a transaction handler.

use super::outbound::StateContext;
use crate::domain::errors::AdmissionError;
use shared_crypto::sha512_hex;

/// Out-of-band transaction metadata supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionHeader {
    pub family_name: String,
    pub family_version: String,
    /// Key that signed the transaction envelope (the batcher).
    pub signer_public_key: String,
    /// Hex SHA-512 of `payload`, when the host supplies it.
    pub payload_sha512: Option<String>,
}

/// A transaction as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransaction {
    pub header: TransactionHeader,
    /// Canonical payload encoding.
    pub payload: Vec<u8>,
}

impl RawTransaction {
    /// Wrap `payload`, stamping its SHA-512 in the header.
    pub fn new(
        family_name: impl Into<String>,
        family_version: impl Into<String>,
        signer_public_key: impl Into<String>,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            header: TransactionHeader {
                family_name: family_name.into(),
                family_version: family_version.into(),
                signer_public_key: signer_public_key.into(),
                payload_sha512: Some(sha512_hex(&payload)),
            },
            payload,
        }
    }
}

/// A transaction family processor.
///
/// `apply` runs once per delivered transaction and either returns `Ok` with
/// its writes staged in `context`, or one terminal `AdmissionError`. It never
/// retries and never leaves partial writes.
pub trait TransactionHandler: Send + Sync {
    fn family_name(&self) -> &str;

    fn family_versions(&self) -> &[String];

    /// Address prefixes this handler may write under.
    fn namespaces(&self) -> Vec<String>;

    fn apply(
        &self,
        transaction: &RawTransaction,
        context: &mut dyn StateContext,
    ) -> Result<(), AdmissionError>;
}
