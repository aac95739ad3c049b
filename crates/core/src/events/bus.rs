// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event bus facade
//!
//! [`EventBus`] is constructed explicitly at startup and handed to every
//! module. Cloning is cheap and clones share the same registry, dispatcher
//! and counters.

use super::dispatch::{Dispatcher, PublishOutcome};
use super::handler::Handler;
use super::registry::{Routes, SubscriptionRegistry};
use super::stats::{BusStats, Stats};
use super::subscription::SubscriptionId;
use crate::clock::{Clock, SystemClock};
use crate::config::BusConfig;
use crate::error::BusError;
use crate::event::{NewEvent, Payload, Priority};
use crate::id::{IdGen, UuidIdGen};
use crate::module::{Module, ModuleEmitter};
use std::fmt;
use std::sync::Arc;

struct Inner {
    registry: Arc<SubscriptionRegistry>,
    dispatcher: Dispatcher,
    stats: Arc<Stats>,
}

/// In-process publish/subscribe bus
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Inner>,
}

impl EventBus {
    pub fn new(config: BusConfig) -> Self {
        Self::builder().config(config).build()
    }

    pub fn builder() -> EventBusBuilder {
        EventBusBuilder::default()
    }

    /// Register a handler for every event matching `pattern`
    pub fn subscribe(
        &self,
        pattern: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<SubscriptionId, BusError> {
        self.subscribe_with_floor(pattern, Priority::Low, handler)
    }

    /// Register a handler that only receives events at or above `priority_floor`
    pub fn subscribe_with_floor(
        &self,
        pattern: &str,
        priority_floor: Priority,
        handler: Arc<dyn Handler>,
    ) -> Result<SubscriptionId, BusError> {
        let handler_name = handler.name().to_string();
        let id = self
            .inner
            .registry
            .subscribe(pattern, handler, priority_floor)?;
        tracing::debug!(
            pattern,
            handler = %handler_name,
            subscription_id = %id,
            floor = %priority_floor,
            "subscribed"
        );
        Ok(id)
    }

    /// Remove a subscription; a no-op if it is already gone
    pub fn unsubscribe(&self, id: &SubscriptionId) -> bool {
        let removed = self.inner.registry.unsubscribe(id);
        if removed {
            tracing::debug!(subscription_id = %id, "unsubscribed");
        }
        removed
    }

    /// Publish an event and wait for every matching handler
    pub async fn publish(&self, event: NewEvent) -> PublishOutcome {
        self.inner.dispatcher.publish(event).await
    }

    /// Build and publish an event from its parts
    pub async fn publish_parts(
        &self,
        event_type: &str,
        payload: Payload,
        priority: Priority,
        metadata: Payload,
        source_module: &str,
    ) -> Result<PublishOutcome, BusError> {
        let event = NewEvent::new(event_type)?
            .with_payload(payload)
            .with_priority(priority)
            .with_metadata(metadata)
            .with_source(source_module);
        Ok(self.publish(event).await)
    }

    /// Producer handle that stamps `module` as the source of its events
    pub fn emitter(&self, module: impl Into<String>) -> ModuleEmitter {
        ModuleEmitter::new(module, self.clone())
    }

    /// Let a module register its handlers
    pub fn install(&self, module: &dyn Module) -> Result<Vec<SubscriptionId>, BusError> {
        let ids = module.register(self)?;
        tracing::info!(
            module = module.name(),
            subscriptions = ids.len(),
            "module installed"
        );
        Ok(ids)
    }

    pub fn stats(&self) -> BusStats {
        self.inner.stats.snapshot()
    }

    pub fn subscription_count(&self) -> usize {
        self.inner.registry.len()
    }

    /// Snapshot of the current routes
    pub fn routes(&self) -> Arc<Routes> {
        self.inner.registry.snapshot()
    }

    pub fn config(&self) -> &BusConfig {
        self.inner.dispatcher.config()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(BusConfig::default())
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscription_count())
            .field("config", self.config())
            .finish()
    }
}

/// Builder for [`EventBus`] with injectable id generator and clock
#[derive(Default)]
pub struct EventBusBuilder {
    config: BusConfig,
    ids: Option<Arc<dyn IdGen>>,
    clock: Option<Arc<dyn Clock>>,
}

impl EventBusBuilder {
    pub fn config(mut self, config: BusConfig) -> Self {
        self.config = config;
        self
    }

    pub fn id_gen(mut self, ids: impl IdGen + 'static) -> Self {
        self.ids = Some(Arc::new(ids));
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn build(self) -> EventBus {
        let mut config = self.config;
        config.max_cascade = config.max_cascade.max(1);

        let registry = Arc::new(SubscriptionRegistry::new());
        let stats = Arc::new(Stats::default());
        let dispatcher = Dispatcher::new(
            config,
            Arc::clone(&registry),
            self.ids.unwrap_or_else(|| Arc::new(UuidIdGen::default())),
            self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            Arc::clone(&stats),
        );

        EventBus {
            inner: Arc::new(Inner {
                registry,
                dispatcher,
                stats,
            }),
        }
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
