// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod pattern;
pub mod publish;
pub mod routes;
pub mod run;

use crate::error::AgoraError;
use agora_core::{EventType, Payload};

/// Parse a user-supplied event type
pub(crate) fn parse_event_type(input: &str) -> Result<EventType, AgoraError> {
    EventType::parse(input).map_err(|e| AgoraError::invalid_event_type(input, e))
}

/// Parse a user-supplied JSON object
pub(crate) fn parse_payload(input: &str) -> Result<Payload, AgoraError> {
    serde_json::from_str(input).map_err(AgoraError::invalid_payload)
}
