// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event and record identifiers
//!
//! Every id is `<prefix>-<suffix>`. The bus stamps events with `evt-` ids;
//! modules mint their own record ids (`post-3`, `match-7`) with a prefix of
//! their choosing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Prefix the bus uses for event ids
pub const EVENT_PREFIX: &str = "evt";

/// Source of unique ids, shared across tasks
pub trait IdGen: Send + Sync {
    fn next(&self) -> String;
}

/// Random ids: `evt-<uuid v4>`
#[derive(Debug, Clone)]
pub struct UuidIdGen {
    prefix: String,
}

impl UuidIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for UuidIdGen {
    fn default() -> Self {
        Self::new(EVENT_PREFIX)
    }
}

impl IdGen for UuidIdGen {
    fn next(&self) -> String {
        format!("{}-{}", self.prefix, uuid::Uuid::new_v4())
    }
}

/// Counting ids: `prefix-1`, `prefix-2`, ...
///
/// Clones share the counter, so a module can hand copies to its handlers and
/// still never mint the same id twice.
#[derive(Debug, Clone)]
pub struct SequentialIdGen {
    prefix: String,
    next: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Number of ids minted so far
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::SeqCst) - 1
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new(EVENT_PREFIX)
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
