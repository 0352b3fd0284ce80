//! Core traits shared by the executor, the controller and the reporters
//!
//! [`EventSink`] is the seam between the engine and whatever consumes its
//! events. The executor calls it while the account lock is held, so a sink
//! observes events in exactly the order they took effect.

use crate::types::TransactionEvent;
use std::sync::{Mutex, PoisonError};

/// Consumer of transaction events
///
/// Implementations must be cheap: `emit` runs inside the account's critical
/// section.
pub trait EventSink: Send + Sync {
    /// Receive one event
    fn emit(&self, event: &TransactionEvent);
}

/// Sink that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &TransactionEvent) {}
}

/// Sink that keeps every event in arrival order
#[derive(Debug, Default)]
pub struct EventJournal {
    events: Mutex<Vec<TransactionEvent>>,
}

impl EventJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the events received so far
    pub fn events(&self) -> Vec<TransactionEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn into_events(self) -> Vec<TransactionEvent> {
        self.events
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventSink for EventJournal {
    fn emit(&self, event: &TransactionEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
