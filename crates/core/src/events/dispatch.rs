// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatcher: resolves subscriptions and runs handler batches
//!
//! ## Dispatch cycle
//! ```text
//! publish(root)
//!     │
//!     ├─ Resolving     snapshot routes, collect matching subscriptions
//!     ├─ Dispatching   run the batch (concurrent, or sequential for critical
//!     │                events in strict mode), isolate every handler
//!     ├─ Draining      pop nested events queued by the batch, repeat
//!     └─ Complete      return the report; never an error
//! ```
//!
//! A handler that publishes on the same bus while a cycle is running does not
//! recurse: the event is appended to the cycle's FIFO queue and dispatched
//! after the current batch completes, giving breadth-first ordering.
//!
//! Active cycles are carried in a tokio task-local stack, one entry per bus
//! whose cycle encloses the running handler. A publish joins the cycle owned
//! by its own bus wherever that sits in the stack, so a chain that bounces
//! between buses (A -> B -> A) still queues on A and counts against A's
//! cascade limit. Publishes from tasks spawned by a handler start an
//! independent cycle of their own.

use super::registry::SubscriptionRegistry;
use super::stats::Stats;
use super::subscription::{Subscription, SubscriptionId};
use crate::clock::Clock;
use crate::config::{BusConfig, DispatchMode};
use crate::event::{Event, NewEvent, Priority};
use crate::id::IdGen;
use futures::future::join_all;
use futures::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::Instrument;

static NEXT_DISPATCHER_ID: AtomicU64 = AtomicU64::new(1);

tokio::task_local! {
    static CYCLES: Vec<Arc<Cycle>>;
}

/// The enclosing cycle owned by dispatcher `owner`, if any
fn active_cycle(owner: u64) -> Option<Arc<Cycle>> {
    CYCLES
        .try_with(|stack| stack.iter().find(|c| c.owner == owner).cloned())
        .ok()
        .flatten()
}

/// The enclosing stack with `cycle` pushed on top
fn push_cycle(cycle: &Arc<Cycle>) -> Vec<Arc<Cycle>> {
    let mut stack = CYCLES.try_with(Vec::clone).unwrap_or_default();
    stack.push(Arc::clone(cycle));
    stack
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Result of a single handler invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Succeeded,
    Failed(String),
    Panicked(String),
    TimedOut(#[serde(with = "humantime_serde")] Duration),
}

impl OutcomeStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Structured record of one handler invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerOutcome {
    pub subscription_id: SubscriptionId,
    pub handler: String,
    pub pattern: String,
    pub status: OutcomeStatus,
    pub elapsed_ms: u64,
}

/// Everything that happened while dispatching one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventReport {
    pub event_id: String,
    pub event_type: String,
    pub source_module: String,
    pub priority: Priority,
    /// 0 for the published event, n + 1 for events published by its handlers
    pub depth: usize,
    pub caused_by: Option<String>,
    pub outcomes: Vec<HandlerOutcome>,
}

impl EventReport {
    pub fn handler_names(&self) -> Vec<&str> {
        self.outcomes.iter().map(|o| o.handler.as_str()).collect()
    }
}

/// Report for a whole dispatch cycle, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub events: Vec<EventReport>,
    /// Nested events discarded by the cascade limit
    pub dropped: usize,
}

impl DispatchReport {
    /// The event that started the cycle
    pub fn root(&self) -> Option<&EventReport> {
        self.events.first()
    }

    /// First processed event of the given type
    pub fn event(&self, event_type: &str) -> Option<&EventReport> {
        self.events.iter().find(|e| e.event_type == event_type)
    }

    pub fn invocations(&self) -> usize {
        self.events.iter().map(|e| e.outcomes.len()).sum()
    }

    /// Handler invocations that did not succeed
    pub fn failures(&self) -> Vec<(&EventReport, &HandlerOutcome)> {
        self.events
            .iter()
            .flat_map(|e| {
                e.outcomes
                    .iter()
                    .filter(|o| !o.status.is_success())
                    .map(move |o| (e, o))
            })
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.dropped == 0 && self.failures().is_empty()
    }
}

impl fmt::Display for DispatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            let indent = "  ".repeat(event.depth);
            writeln!(
                f,
                "{}{} {} (source: {}, priority: {}, handlers: {})",
                indent,
                event.event_id,
                event.event_type,
                if event.source_module.is_empty() {
                    "-"
                } else {
                    event.source_module.as_str()
                },
                event.priority,
                event.outcomes.len()
            )?;
            for outcome in &event.outcomes {
                let status = match &outcome.status {
                    OutcomeStatus::Succeeded => "ok".to_string(),
                    OutcomeStatus::Failed(reason) => format!("failed: {}", reason),
                    OutcomeStatus::Panicked(msg) => format!("panicked: {}", msg),
                    OutcomeStatus::TimedOut(limit) => format!("timed out after {:?}", limit),
                };
                writeln!(
                    f,
                    "{}  - {} [{}] {}",
                    indent, outcome.handler, outcome.pattern, status
                )?;
            }
        }
        if self.dropped > 0 {
            writeln!(f, "dropped {} nested event(s)", self.dropped)?;
        }
        Ok(())
    }
}

/// What `publish` did with an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PublishOutcome {
    /// Top-level publish: the cycle ran to completion
    Dispatched(DispatchReport),
    /// Published from inside a handler: queued behind the current batch
    Queued { event_id: String },
    /// Published from inside a handler after the cascade limit was reached
    Dropped { event_id: String },
}

impl PublishOutcome {
    pub fn report(&self) -> Option<&DispatchReport> {
        match self {
            Self::Dispatched(report) => Some(report),
            _ => None,
        }
    }

    pub fn into_report(self) -> Option<DispatchReport> {
        match self {
            Self::Dispatched(report) => Some(report),
            _ => None,
        }
    }

    pub fn event_id(&self) -> Option<&str> {
        match self {
            Self::Dispatched(report) => report.root().map(|e| e.event_id.as_str()),
            Self::Queued { event_id } | Self::Dropped { event_id } => Some(event_id.as_str()),
        }
    }
}

impl fmt::Display for PublishOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dispatched(report) => write!(f, "{}", report),
            Self::Queued { event_id } => write!(f, "{} queued", event_id),
            Self::Dropped { event_id } => write!(f, "{} dropped", event_id),
        }
    }
}

struct Pending {
    event: Arc<Event>,
    depth: usize,
    caused_by: Option<String>,
}

#[derive(Default)]
struct CycleState {
    queue: VecDeque<Pending>,
    admitted: usize,
    dropped: usize,
    /// Event id and depth of the batch currently running
    current: Option<(String, usize)>,
}

/// Queue of events belonging to one top-level publish
struct Cycle {
    owner: u64,
    limit: usize,
    state: Mutex<CycleState>,
}

impl Cycle {
    fn new(owner: u64, limit: usize, root: Arc<Event>) -> Self {
        let mut state = CycleState::default();
        state.queue.push_back(Pending {
            event: root,
            depth: 0,
            caused_by: None,
        });
        state.admitted = 1;
        Self {
            owner,
            limit,
            state: Mutex::new(state),
        }
    }

    /// Append a nested event. Returns false once the cascade limit is hit.
    fn enqueue(&self, event: Arc<Event>) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.admitted >= self.limit {
            state.dropped += 1;
            return false;
        }
        state.admitted += 1;
        let (caused_by, depth) = match &state.current {
            Some((id, depth)) => (Some(id.clone()), depth + 1),
            None => (None, 0),
        };
        state.queue.push_back(Pending {
            event,
            depth,
            caused_by,
        });
        true
    }

    fn next(&self) -> Option<Pending> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let pending = state.queue.pop_front()?;
        state.current = Some((pending.event.event_id().to_string(), pending.depth));
        Some(pending)
    }

    fn dropped(&self) -> usize {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).dropped
    }
}

/// Runs handler batches for published events
pub struct Dispatcher {
    id: u64,
    config: BusConfig,
    registry: Arc<SubscriptionRegistry>,
    ids: Arc<dyn IdGen>,
    clock: Arc<dyn Clock>,
    stats: Arc<Stats>,
}

impl Dispatcher {
    pub(crate) fn new(
        config: BusConfig,
        registry: Arc<SubscriptionRegistry>,
        ids: Arc<dyn IdGen>,
        clock: Arc<dyn Clock>,
        stats: Arc<Stats>,
    ) -> Self {
        Self {
            id: NEXT_DISPATCHER_ID.fetch_add(1, Ordering::Relaxed),
            config,
            registry,
            ids,
            clock,
            stats,
        }
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Stamp and dispatch an event
    ///
    /// Outside a dispatch cycle this runs a full cycle and returns once every
    /// handler, including those of nested events, has finished. Inside a
    /// handler it only queues the event.
    pub async fn publish(&self, event: NewEvent) -> PublishOutcome {
        let event = Arc::new(event.stamp(self.ids.next(), self.clock.now()));
        self.stats.record_published();

        if let Some(cycle) = active_cycle(self.id) {
            let event_id = event.event_id().to_string();
            if cycle.enqueue(Arc::clone(&event)) {
                tracing::debug!(
                    event_id = %event_id,
                    event_type = event.event_type(),
                    "nested event queued"
                );
                return PublishOutcome::Queued { event_id };
            }
            self.stats.record_dropped();
            tracing::warn!(
                event_id = %event_id,
                event_type = event.event_type(),
                source_module = event.source_module(),
                limit = self.config.max_cascade,
                "cascade limit reached, nested event dropped"
            );
            return PublishOutcome::Dropped { event_id };
        }

        let span = tracing::info_span!(
            "bus.publish",
            event_id = event.event_id(),
            event_type = event.event_type(),
            source = event.source_module(),
        );
        let cycle = Arc::new(Cycle::new(self.id, self.config.max_cascade, event));
        let report = CYCLES
            .scope(push_cycle(&cycle), self.drain(cycle))
            .instrument(span)
            .await;

        if !report.is_clean() {
            tracing::info!(
                events = report.events.len(),
                failures = report.failures().len(),
                dropped = report.dropped,
                "dispatch completed with failures"
            );
        }
        PublishOutcome::Dispatched(report)
    }

    async fn drain(&self, cycle: Arc<Cycle>) -> DispatchReport {
        let mut events = Vec::new();
        while let Some(pending) = cycle.next() {
            events.push(self.dispatch_event(pending).await);
        }
        DispatchReport {
            events,
            dropped: cycle.dropped(),
        }
    }

    async fn dispatch_event(&self, pending: Pending) -> EventReport {
        let Pending {
            event,
            depth,
            caused_by,
        } = pending;

        let span = tracing::info_span!(
            "bus.dispatch",
            event_id = event.event_id(),
            event_type = event.event_type(),
            priority = %event.priority(),
            depth,
        );

        async move {
            let batch = self
                .registry
                .snapshot()
                .resolve(event.event_type(), event.priority());

            let sequential = self.config.dispatch_mode == DispatchMode::StrictCritical
                && event.priority() == Priority::Critical;
            tracing::debug!(handlers = batch.len(), sequential, "dispatching batch");

            let outcomes = if sequential {
                let mut outcomes = Vec::with_capacity(batch.len());
                for sub in &batch {
                    outcomes.push(self.invoke(sub, &event).await);
                }
                outcomes
            } else {
                join_all(batch.iter().map(|sub| self.invoke(sub, &event))).await
            };
            self.stats.record_dispatched();

            EventReport {
                event_id: event.event_id().to_string(),
                event_type: event.event_type().to_string(),
                source_module: event.source_module().to_string(),
                priority: event.priority(),
                depth,
                caused_by,
                outcomes,
            }
        }
        .instrument(span)
        .await
    }

    /// Run one handler with failure, panic and deadline isolation
    async fn invoke(&self, sub: &Subscription, event: &Arc<Event>) -> HandlerOutcome {
        let started = Instant::now();
        let guarded = AssertUnwindSafe(sub.handler.handle(Arc::clone(event))).catch_unwind();

        let result = match self.config.handler_timeout {
            Some(limit) => tokio::time::timeout(limit, guarded)
                .await
                .map_err(|_| limit),
            None => Ok(guarded.await),
        };

        let status = match result {
            Ok(Ok(Ok(()))) => OutcomeStatus::Succeeded,
            Ok(Ok(Err(e))) => OutcomeStatus::Failed(e.to_string()),
            Ok(Err(panic)) => OutcomeStatus::Panicked(panic_message(panic.as_ref())),
            Err(limit) => OutcomeStatus::TimedOut(limit),
        };
        let elapsed_ms = millis(started.elapsed());

        match &status {
            OutcomeStatus::Succeeded => tracing::debug!(
                handler = sub.handler_name(),
                pattern = %sub.pattern,
                elapsed_ms,
                "handler completed"
            ),
            OutcomeStatus::Failed(reason) => tracing::error!(
                event_type = event.event_type(),
                source_module = event.source_module(),
                pattern = %sub.pattern,
                handler = sub.handler_name(),
                subscription_id = %sub.id,
                error = %reason,
                "handler failed"
            ),
            OutcomeStatus::Panicked(message) => tracing::error!(
                event_type = event.event_type(),
                source_module = event.source_module(),
                pattern = %sub.pattern,
                handler = sub.handler_name(),
                subscription_id = %sub.id,
                panic = %message,
                "handler panicked"
            ),
            OutcomeStatus::TimedOut(limit) => tracing::warn!(
                event_type = event.event_type(),
                source_module = event.source_module(),
                pattern = %sub.pattern,
                handler = sub.handler_name(),
                subscription_id = %sub.id,
                timeout_ms = millis(*limit),
                "handler timed out"
            ),
        }
        self.stats.record_outcome(&status);

        HandlerOutcome {
            subscription_id: sub.id.clone(),
            handler: sub.handler_name().to_string(),
            pattern: sub.pattern.to_string(),
            status,
            elapsed_ms,
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
