// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wall-clock source for event timestamps

use chrono::{DateTime, TimeDelta, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Stamps `created_at` on published events
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-driven clock for tests
///
/// A frozen clock returns the same instant until moved. A stepping clock
/// advances by a fixed step after every read, so events stamped one after
/// another get strictly increasing timestamps.
#[derive(Debug, Clone)]
pub struct FakeClock {
    state: Arc<Mutex<FakeState>>,
}

#[derive(Debug)]
struct FakeState {
    current: DateTime<Utc>,
    step: TimeDelta,
}

impl FakeClock {
    pub fn at(start: DateTime<Utc>) -> Self {
        Self::stepping(start, Duration::ZERO)
    }

    pub fn stepping(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState {
                current: start,
                step: to_delta(step),
            })),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.current = shift(state.current, to_delta(by));
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.current = instant;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::at(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let now = state.current;
        state.current = shift(now, state.step);
        now
    }
}

// Out-of-range durations and instants saturate
fn to_delta(duration: Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX)
}

fn shift(at: DateTime<Utc>, by: TimeDelta) -> DateTime<Utc> {
    at.checked_add_signed(by).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
