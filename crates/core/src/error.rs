// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the event bus
//!
//! Only malformed input surfaces to callers. Handler failures are consumed by
//! the dispatcher and reported through [`crate::events::HandlerOutcome`].

use thiserror::Error;

/// Invalid event type supplied by a producer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("event type is empty")]
    EmptyType,
    #[error("event type {0:?} has an empty segment")]
    EmptySegment(String),
    #[error("event type {event_type:?} contains invalid character {ch:?}")]
    InvalidCharacter { event_type: String, ch: char },
}

/// Invalid subscription pattern
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,
    #[error("pattern {0:?} uses a wildcard outside a trailing \".*\" or bare \"*\"")]
    EmbeddedWildcard(String),
    #[error("pattern {pattern:?} is not a valid topic: {source}")]
    InvalidTopic {
        pattern: String,
        #[source]
        source: EventError,
    },
}

/// Errors surfaced by the bus facade
#[derive(Debug, Error)]
pub enum BusError {
    #[error(transparent)]
    Event(#[from] EventError),
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// Invalid bus configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
