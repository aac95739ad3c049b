// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors returned by module commands

use agora_core::EventError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModuleError {
    #[error(transparent)]
    Event(#[from] EventError),
    #[error("payload encoding failed: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("{0} already exists")]
    Duplicate(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("invalid input: {0}")]
    Invalid(String),
}
