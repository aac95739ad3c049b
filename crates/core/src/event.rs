// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Domain events carried by the bus
//!
//! Producers build a [`NewEvent`]; the bus stamps it with an id and a creation
//! time, turning it into an immutable [`Event`] that handlers share through an
//! `Arc`.

use crate::error::EventError;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Free-form JSON object carried by an event
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Event priority
///
/// Informational by default. In `strict_critical` dispatch mode, `Critical`
/// events run their handlers one at a time. Subscriptions may also declare a
/// priority floor below which they are not invoked.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            other => Err(format!("unknown priority: {}", other)),
        }
    }
}

/// Validated dot-delimited event name, e.g. `auth.user.registered`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventType(String);

impl EventType {
    pub fn parse(s: &str) -> Result<Self, EventError> {
        validate_topic(s)?;
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Dot-separated segments of the name
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

/// Check the topic invariant shared by event types and pattern bodies
pub(crate) fn validate_topic(s: &str) -> Result<(), EventError> {
    if s.is_empty() {
        return Err(EventError::EmptyType);
    }
    if s.split('.').any(str::is_empty) {
        return Err(EventError::EmptySegment(s.to_string()));
    }
    if let Some(ch) = s.chars().find(|c| *c == '*' || c.is_whitespace()) {
        return Err(EventError::InvalidCharacter {
            event_type: s.to_string(),
            ch,
        });
    }
    Ok(())
}

impl TryFrom<String> for EventType {
    type Error = EventError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_topic(&value)?;
        Ok(Self(value))
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        value.0
    }
}

impl FromStr for EventType {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An event as supplied by a producer, before the bus stamps it
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    event_type: EventType,
    payload: Payload,
    source_module: String,
    priority: Priority,
    metadata: Payload,
}

impl NewEvent {
    pub fn new(event_type: &str) -> Result<Self, EventError> {
        Ok(Self::from_type(EventType::parse(event_type)?))
    }

    pub fn from_type(event_type: EventType) -> Self {
        Self {
            event_type,
            payload: Payload::new(),
            source_module: String::new(),
            priority: Priority::default(),
            metadata: Payload::new(),
        }
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_source(mut self, module: impl Into<String>) -> Self {
        self.source_module = module.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_metadata(mut self, metadata: Payload) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set a single metadata entry
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn source_module(&self) -> &str {
        &self.source_module
    }

    /// Assign identity and creation time. Only the bus calls this.
    pub(crate) fn stamp(self, event_id: String, created_at: DateTime<Utc>) -> Event {
        Event {
            event_id,
            event_type: self.event_type,
            payload: self.payload,
            source_module: self.source_module,
            priority: self.priority,
            metadata: self.metadata,
            created_at,
        }
    }
}

/// An immutable, stamped event delivered to handlers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    event_id: String,
    event_type: EventType,
    payload: Payload,
    source_module: String,
    priority: Priority,
    metadata: Payload,
    created_at: DateTime<Utc>,
}

impl Event {
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn event_type(&self) -> &str {
        self.event_type.as_str()
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn source_module(&self) -> &str {
        &self.source_module
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn metadata(&self) -> &Payload {
        &self.metadata
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Look up a single payload field
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.payload.get(key)
    }

    /// Deserialize the payload into a handler-specific typed view
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(serde_json::Value::Object(self.payload.clone()))
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
