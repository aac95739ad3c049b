// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Business module seam
//!
//! Modules register their handlers during startup through [`Module::register`]
//! and produce events through a [`ModuleEmitter`].

use crate::error::{BusError, EventError};
use crate::event::{NewEvent, Payload, Priority};
use crate::events::{EventBus, PublishOutcome, SubscriptionId};

/// A business module that reacts to events
pub trait Module: Send + Sync {
    /// Module identity, used as the source of emitted events
    fn name(&self) -> &'static str;

    /// Subscribe the module's handlers
    fn register(&self, bus: &EventBus) -> Result<Vec<SubscriptionId>, BusError>;
}

/// Publishing handle bound to one module
#[derive(Clone, Debug)]
pub struct ModuleEmitter {
    module: String,
    bus: EventBus,
}

impl ModuleEmitter {
    pub fn new(module: impl Into<String>, bus: EventBus) -> Self {
        Self {
            module: module.into(),
            bus,
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Publish an event with this module as its source
    pub async fn emit_event(
        &self,
        event_type: &str,
        payload: Payload,
        priority: Priority,
        metadata: Payload,
    ) -> Result<PublishOutcome, EventError> {
        let event = NewEvent::new(event_type)?
            .with_payload(payload)
            .with_priority(priority)
            .with_metadata(metadata)
            .with_source(self.module.as_str());
        Ok(self.bus.publish(event).await)
    }

    /// Publish a normal-priority event without metadata
    pub async fn emit(
        &self,
        event_type: &str,
        payload: Payload,
    ) -> Result<PublishOutcome, EventError> {
        self.emit_event(event_type, payload, Priority::Normal, Payload::new())
            .await
    }
}
