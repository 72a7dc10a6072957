//! # Anchor Transaction Handler
//!
//! Application service implementing `TransactionHandler` for the anchor
//! family:
//!
//! 1. header family/version and payload digest checks
//! 2. decode the payload envelope
//! 3. authorize the CA countersignature against the configured CA key
//! 4. type-check the datum
//! 5. derive the address and read the prior bucket
//! 6. merge, emit `<family>/create`, write back
//!
//! Every rejection is logged with its `kind` so certificate failures can be
//! told apart from malformed input in audit logs.

use crate::domain::address::{derive_address, StateAddress};
use crate::domain::config::HandlerConfig;
use crate::domain::errors::AdmissionError;
use crate::domain::payload::{Countersigned, PayloadEnvelope, TransactionPayload};
use crate::domain::state::{AnchorState, MergeOutcome};
use crate::domain::verification::CertificateVerifier;
use crate::ports::inbound::{RawTransaction, TransactionHandler};
use crate::ports::outbound::StateContext;
use shared_crypto::sha512_hex;
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

/// Handler for the location anchor family.
pub struct AnchorTransactionHandler {
    config: HandlerConfig,
    namespace: String,
    event_type: String,
    verifier: CertificateVerifier,
}

impl AnchorTransactionHandler {
    /// Build a handler. `config.require_device_signature` is applied to
    /// `verifier`.
    pub fn new(config: HandlerConfig, verifier: CertificateVerifier) -> Self {
        let verifier = verifier.with_device_signature(config.require_device_signature);
        Self {
            namespace: config.namespace_prefix(),
            event_type: config.create_event_type(),
            config,
            verifier,
        }
    }

    /// Namespace prefix of the family.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The verifier in use.
    pub fn verifier(&self) -> &CertificateVerifier {
        &self.verifier
    }

    /// Address a payload is stored under.
    pub fn address_of(&self, payload: &TransactionPayload) -> Result<StateAddress, AdmissionError> {
        let hash = payload
            .hash()
            .map_err(|e| AdmissionError::MalformedPayload(e.to_string()))?;
        derive_address(&self.namespace, payload.sender_public_key(), &hash)
            .map_err(|e| AdmissionError::MalformedPayload(e.to_string()))
    }

    fn check_header(&self, transaction: &RawTransaction) -> Result<(), AdmissionError> {
        let header = &transaction.header;
        if header.family_name != self.config.family_name {
            return Err(AdmissionError::MalformedPayload(format!(
                "unsupported family {}",
                header.family_name
            )));
        }
        if !self.config.family_versions.contains(&header.family_version) {
            return Err(AdmissionError::MalformedPayload(format!(
                "unsupported family version {}",
                header.family_version
            )));
        }
        if let Some(expected) = &header.payload_sha512 {
            let expected = expected.to_ascii_lowercase();
            let actual = sha512_hex(&transaction.payload);
            if !self.verifier.context().digests_match(&expected, &actual) {
                return Err(AdmissionError::MalformedPayload(
                    "payload_sha512 does not match payload".into(),
                ));
            }
        }
        Ok(())
    }

    fn admit(
        &self,
        transaction: &RawTransaction,
        context: &mut dyn StateContext,
    ) -> Result<MergeOutcome, AdmissionError> {
        self.check_header(transaction)?;

        let envelope = PayloadEnvelope::decode(&transaction.payload)?;
        self.verifier.authorize(&envelope)?;
        let payload = envelope.into_payload()?;

        // Canonical bytes, so this equals payload.hash()
        let hash = sha512_hex(&transaction.payload);
        let address = derive_address(&self.namespace, payload.sender_public_key(), &hash)
            .map_err(|e| AdmissionError::MalformedPayload(e.to_string()))?;

        let prior = context
            .get_state(std::slice::from_ref(&address))
            .map_err(|e| AdmissionError::InternalStateError(e.to_string()))?;
        let mut state = AnchorState::decode(prior.get(&address).map(Vec::as_slice))?;

        let outcome = state.merge(&hash, &payload.data)?;
        if outcome == MergeOutcome::Unchanged {
            debug!(address = %address, hash = %hash, "Entry already present, nothing to write");
            return Ok(outcome);
        }
        debug!(
            address = %address,
            hash = %hash,
            entries = state.len(),
            "Adding location for key"
        );

        let attributes = vec![
            ("sender".to_string(), payload.sender_public_key().to_string()),
            ("hash".to_string(), hash.clone()),
            ("signer".to_string(), payload.batcher_public_key.clone()),
        ];
        if let Err(e) = context.add_event(&self.event_type, attributes, Vec::new()) {
            warn!(event_type = %self.event_type, error = %e, "Failed to add event");
        }

        let mut entries = BTreeMap::new();
        entries.insert(address.clone(), state.encode()?);
        let written = context
            .set_state(entries)
            .map_err(|e| AdmissionError::InternalStateError(e.to_string()))?;
        if written.is_empty() {
            return Err(AdmissionError::InternalStateError("State error".into()));
        }

        info!(
            address = %address,
            sender = %payload.sender_public_key(),
            "Location anchor admitted"
        );
        Ok(outcome)
    }
}

impl TransactionHandler for AnchorTransactionHandler {
    fn family_name(&self) -> &str {
        &self.config.family_name
    }

    fn family_versions(&self) -> &[String] {
        &self.config.family_versions
    }

    fn namespaces(&self) -> Vec<String> {
        vec![self.namespace.clone()]
    }

    fn apply(
        &self,
        transaction: &RawTransaction,
        context: &mut dyn StateContext,
    ) -> Result<(), AdmissionError> {
        match self.admit(transaction, context) {
            Ok(_) => Ok(()),
            Err(e) if e.is_internal() => {
                error!(kind = %e.kind(), error = %e, "Transaction failed");
                Err(e)
            }
            Err(e) => {
                warn!(kind = %e.kind(), error = %e, "Transaction rejected");
                Err(e)
            }
        }
    }
}
