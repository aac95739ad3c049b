// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! agora-core: in-process event bus for the Agora platform
//!
//! This crate provides:
//! - Validated domain events with priorities and free-form payloads
//! - Topic patterns (exact, `prefix.*`, `*`) and a subscription registry
//! - A dispatcher that runs matching handlers as a batch, isolates their
//!   failures and drains nested events breadth-first
//! - The `Module` seam through which business modules subscribe and emit

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod events;
pub mod id;
pub mod module;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{BusConfig, DispatchMode};
pub use error::{BusError, ConfigError, EventError, PatternError};
pub use event::{Event, EventType, NewEvent, Payload, Priority};
pub use events::{
    handler_fn, BusStats, DispatchReport, EventBus, EventBusBuilder, EventPattern, EventReport,
    Handler, HandlerError, HandlerOutcome, OutcomeStatus, PublishOutcome, SubscriptionId,
};
pub use id::{IdGen, SequentialIdGen, UuidIdGen, EVENT_PREFIX};
pub use module::{Module, ModuleEmitter};
