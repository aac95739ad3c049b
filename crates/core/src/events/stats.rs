// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatch counters

use super::dispatch::OutcomeStatus;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters shared by a bus and its dispatcher
#[derive(Default, Debug)]
pub(crate) struct Stats {
    published: AtomicU64,
    dispatched: AtomicU64,
    invocations: AtomicU64,
    failures: AtomicU64,
    panics: AtomicU64,
    timeouts: AtomicU64,
    dropped: AtomicU64,
}

impl Stats {
    pub(crate) fn record_published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_outcome(&self, status: &OutcomeStatus) {
        self.invocations.fetch_add(1, Ordering::Relaxed);
        let counter = match status {
            OutcomeStatus::Succeeded => return,
            OutcomeStatus::Failed(_) => &self.failures,
            OutcomeStatus::Panicked(_) => &self.panics,
            OutcomeStatus::TimedOut(_) => &self.timeouts,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> BusStats {
        BusStats {
            published: self.published.load(Ordering::Relaxed),
            dispatched: self.dispatched.load(Ordering::Relaxed),
            invocations: self.invocations.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            panics: self.panics.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the bus counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BusStats {
    /// Events accepted by `publish` (top-level and nested)
    pub published: u64,
    /// Events whose handler batch has run
    pub dispatched: u64,
    /// Handler invocations, whatever their outcome
    pub invocations: u64,
    /// Handlers that returned an error
    pub failures: u64,
    /// Handlers that panicked
    pub panics: u64,
    /// Handlers that exceeded the configured deadline
    pub timeouts: u64,
    /// Nested events discarded by the cascade limit
    pub dropped: u64,
}

impl BusStats {
    /// Invocations that did not succeed
    pub fn unsuccessful(&self) -> u64 {
        self.failures + self.panics + self.timeouts
    }
}

impl fmt::Display for BusStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "published={} dispatched={} invocations={} failures={} panics={} timeouts={} dropped={}",
            self.published,
            self.dispatched,
            self.invocations,
            self.failures,
            self.panics,
            self.timeouts,
            self.dropped
        )
    }
}
