//! # Shared Bus - Event Bus for Ledger Notifications
//!
//! Carries the notifications produced while transactions are admitted:
//!
//! ```text
//! ┌──────────────┐   add_event()    ┌──────────────┐   subscribe()   ┌──────────────┐
//! │   Handler    │ ───────────────→ │  Event Bus   │ ──────────────→ │   Indexer    │
//! │ (apply txn)  │                  │ (broadcast)  │                 │ (doc store)  │
//! └──────────────┘                  └──────────────┘                 └──────────────┘
//! ```
//!
//! Publishing never blocks and never fails the publisher: an event with no
//! receivers is dropped and logged.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{AnchorEvent, EventFilter, EventTopic};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
