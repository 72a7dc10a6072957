//! # Outbound Ports (Driven Ports / SPI)
//!
//! The host's key-value state and event interface.

use crate::domain::address::StateAddress;
use std::collections::BTreeMap;
use thiserror::Error;

/// Error from the host context.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContextError {
    /// State could not be read.
    #[error("State read failed: {0}")]
    ReadFailed(String),

    /// The host refused the write.
    #[error("State write failed: {0}")]
    WriteFailed(String),

    /// The host refused the event.
    #[error("Event rejected: {0}")]
    EventRejected(String),
}

/// Per-transaction view of ledger state.
pub trait StateContext: Send {
    /// Read `addresses`. Absent addresses are missing from the result.
    fn get_state(
        &self,
        addresses: &[StateAddress],
    ) -> Result<BTreeMap<StateAddress, Vec<u8>>, ContextError>;

    /// Stage writes. Returns the addresses actually written; an empty result
    /// means the write was refused.
    fn set_state(
        &mut self,
        entries: BTreeMap<StateAddress, Vec<u8>>,
    ) -> Result<Vec<StateAddress>, ContextError>;

    /// Attach a notification event to the transaction receipt.
    fn add_event(
        &mut self,
        event_type: &str,
        attributes: Vec<(String, String)>,
        data: Vec<u8>,
    ) -> Result<(), ContextError>;
}
