// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event pattern matching and subscriptions

use crate::error::PatternError;
use crate::event::{validate_topic, Priority};
use crate::events::handler::Handler;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Pattern for matching event types
/// Supports:
///   - Exact: "auth.user.registered"
///   - Prefix wildcard: "auth.*" matches "auth.user.registered" but not "auth"
///   - Global wildcard: "*" matches every event
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventPattern {
    Exact(String),
    Prefix(String),
    Any,
}

impl EventPattern {
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        if pattern == "*" {
            return Ok(Self::Any);
        }

        let (body, is_prefix) = match pattern.strip_suffix(".*") {
            Some(prefix) => (prefix, true),
            None => (pattern, false),
        };

        // Any star left in the body is an embedded wildcard
        if body.contains('*') {
            return Err(PatternError::EmbeddedWildcard(pattern.to_string()));
        }
        validate_topic(body).map_err(|source| PatternError::InvalidTopic {
            pattern: pattern.to_string(),
            source,
        })?;

        if is_prefix {
            Ok(Self::Prefix(body.to_string()))
        } else {
            Ok(Self::Exact(body.to_string()))
        }
    }

    /// Check if this pattern matches an event type
    pub fn matches(&self, event_type: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(topic) => topic == event_type,
            Self::Prefix(prefix) => event_type
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.strip_prefix('.'))
                .is_some_and(|rest| !rest.is_empty()),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        !matches!(self, Self::Exact(_))
    }

    /// Canonical string form, identical to what was parsed
    pub fn as_str(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EventPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Exact(topic) => f.write_str(topic),
            Self::Prefix(prefix) => write!(f, "{}.*", prefix),
        }
    }
}

impl FromStr for EventPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Subscription handle for unsubscribing
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SubscriptionId(pub String);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A handler registered against a pattern
pub struct Subscription {
    pub id: SubscriptionId,
    pub pattern: EventPattern,
    pub handler: Arc<dyn Handler>,
    /// Monotonic sequence assigned at subscribe time
    pub registration_order: u64,
    /// Events below this priority are not delivered
    pub priority_floor: Priority,
}

impl Subscription {
    /// Check if this subscription should receive an event
    pub fn accepts(&self, event_type: &str, priority: Priority) -> bool {
        priority >= self.priority_floor && self.pattern.matches(event_type)
    }

    pub fn handler_name(&self) -> &str {
        self.handler.name()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("pattern", &self.pattern)
            .field("handler", &self.handler.name())
            .field("registration_order", &self.registration_order)
            .field("priority_floor", &self.priority_floor)
            .finish()
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
