//! # Anchor Processor Subsystem (AA-01)
//!
//! Certificate-authenticated admission of location anchors into keyed ledger
//! state.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): canonical codec, certificate and payload
//!   models, verification engine, address derivation, state record
//! - **Ports Layer** (`ports/`): host transaction handler and state context
//! - **Adapters** (`adapters/`): in-memory host state
//! - **Service Layer** (`service.rs`): the anchor transaction handler
//!
//! ## Security Notes
//!
//! - The trusted CA key comes from local configuration only
//! - Payload bytes must be canonical, so the content hash equals the SHA-512
//!   of the bytes the host delivered
//! - Rejections never write state

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::memory_state::{ExecutionReceipt, InMemoryContext, InMemoryState};
pub use domain::address::{derive_address, namespace_prefix, StateAddress, ADDRESS_LENGTH};
pub use domain::certificate::{
    CertificateAuthority, CertificateRequest, CertificateRequestHeader, CertificateResponse,
};
pub use domain::config::{HandlerConfig, DEFAULT_FAMILY_NAME, DEFAULT_FAMILY_VERSION};
pub use domain::errors::{AddressError, AdmissionError, AdmissionErrorKind, CodecError};
pub use domain::payload::{Countersigned, PayloadEnvelope, TransactionPayload};
pub use domain::state::{AnchorState, MergeOutcome};
pub use domain::verification::{authorize, verify_device_signature, CertificateVerifier};
pub use ports::inbound::{RawTransaction, TransactionHandler, TransactionHeader};
pub use ports::outbound::{ContextError, StateContext};
pub use service::AnchorTransactionHandler;
