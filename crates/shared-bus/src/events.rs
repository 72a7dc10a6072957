//! # Ledger Events
//!
//! Defines all event types that flow through the shared bus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnchorEvent {
    /// An event added by a transaction handler through the host context,
    /// e.g. `locationKey/create`.
    Ledger {
        /// Namespaced event type, `<family>/<action>`.
        event_type: String,
        /// Ordered key/value attributes.
        attributes: Vec<(String, String)>,
        /// Opaque event body (usually empty).
        data: Vec<u8>,
    },

    /// A state write carrying `hash` was accepted by the host.
    Committed {
        /// State address that was written.
        address: String,
        /// Content hash that became part of ledger state.
        hash: String,
        /// When the host accepted the write.
        committed_at: DateTime<Utc>,
    },

    /// A transaction was rejected; `kind` is the stable rejection kind.
    Rejected {
        /// Rejection kind (`malformed_payload`, `invalid_certificate`, ...).
        kind: String,
        /// Short human readable reason.
        reason: String,
    },
}

impl AnchorEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::Ledger { .. } => EventTopic::Ledger,
            Self::Committed { .. } => EventTopic::Commit,
            Self::Rejected { .. } => EventTopic::Rejection,
        }
    }

    /// Look up a ledger event attribute by key.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        match self {
            Self::Ledger { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Handler emitted ledger events.
    Ledger,
    /// State commit confirmations.
    Commit,
    /// Rejected transactions (audit trail).
    Rejection,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Ledger event types to include. Empty means all types.
    /// Only applies to `AnchorEvent::Ledger`.
    pub event_types: Vec<String>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            event_types: Vec::new(),
        }
    }

    /// Restrict ledger events to the given types.
    #[must_use]
    pub fn with_event_types(mut self, event_types: Vec<String>) -> Self {
        self.event_types = event_types;
        self
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &AnchorEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let type_match = match event {
            AnchorEvent::Ledger { event_type, .. } => {
                self.event_types.is_empty() || self.event_types.contains(event_type)
            }
            _ => true,
        };

        topic_match && type_match
    }
}
