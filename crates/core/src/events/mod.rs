// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events system for loose coupling between modules
//!
//! This module provides:
//! - `EventBus` - Publish events and subscribe handlers by pattern
//! - `EventPattern` - Exact, prefix-wildcard and global topic matching
//! - `SubscriptionRegistry` - Copy-on-write store of subscriptions
//! - `Dispatcher` - Batched, failure-isolated handler execution

mod bus;
mod dispatch;
mod handler;
mod registry;
mod stats;
mod subscription;

pub use bus::{EventBus, EventBusBuilder};
pub use dispatch::{
    DispatchReport, Dispatcher, EventReport, HandlerOutcome, OutcomeStatus, PublishOutcome,
};
pub use handler::{handler_fn, FnHandler, Handler, HandlerError};
pub use registry::{Routes, SubscriptionRegistry};
pub use stats::BusStats;
pub use subscription::{EventPattern, Subscription, SubscriptionId};
