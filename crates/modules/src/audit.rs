// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Audit trail of every event on the bus

use agora_core::{
    handler_fn, BusError, Event, EventBus, Module, Priority, SubscriptionId,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    pub event_id: String,
    pub event_type: String,
    pub source_module: String,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
}

impl From<&Event> for AuditEntry {
    fn from(event: &Event) -> Self {
        Self {
            event_id: event.event_id().to_string(),
            event_type: event.event_type().to_string(),
            source_module: event.source_module().to_string(),
            priority: event.priority(),
            created_at: event.created_at(),
        }
    }
}

#[derive(Default)]
pub struct Audit {
    trail: Arc<Mutex<Vec<AuditEntry>>>,
}

impl Audit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trail(&self) -> Vec<AuditEntry> {
        self.trail.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.trail.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Module for Audit {
    fn name(&self) -> &'static str {
        "audit"
    }

    fn register(&self, bus: &EventBus) -> Result<Vec<SubscriptionId>, BusError> {
        let trail = Arc::clone(&self.trail);
        let handler = handler_fn("audit.record", move |event| {
            let trail = Arc::clone(&trail);
            async move {
                trail
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .push(AuditEntry::from(event.as_ref()));
                Ok(())
            }
        });
        Ok(vec![bus.subscribe("*", handler)?])
    }
}

#[cfg(test)]
#[path = "audit_tests.rs"]
mod tests;
