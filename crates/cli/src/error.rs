// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! Errors caused by user input (bad event types, patterns, payloads or
//! config files) are reported with:
//! - What went wrong (message)
//! - Why it might have happened (context)
//! - How to fix it (suggestions)

use agora_core::{ConfigError, EventError, PatternError};
use std::fmt;
use std::path::Path;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct AgoraError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AgoraError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for AgoraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for AgoraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Builders for the failures users run into.
impl AgoraError {
    pub fn invalid_event_type(input: &str, err: EventError) -> Self {
        AgoraError::new(format!("Invalid event type '{}'", input))
            .with_context(err.to_string())
            .with_suggestion("Use dot-separated segments, e.g. auth.user.login")
            .with_suggestion("Segments may not be empty or contain '*' or whitespace")
            .with_source(err)
    }

    pub fn invalid_pattern(input: &str, err: PatternError) -> Self {
        AgoraError::new(format!("Invalid pattern '{}'", input))
            .with_context(err.to_string())
            .with_suggestion("Patterns are an exact type, a prefix ending in .*, or *")
            .with_suggestion("Check a pattern with: agora match 'auth.*' auth.user.login")
            .with_source(err)
    }

    pub fn invalid_payload(err: serde_json::Error) -> Self {
        AgoraError::new("Payload is not a JSON object")
            .with_context(err.to_string())
            .with_suggestion("Pass an object, e.g. --payload '{\"user_id\": \"u-1\"}'")
            .with_source(err)
    }

    pub fn config(path: &Path, err: ConfigError) -> Self {
        AgoraError::new(format!("Failed to load config {}", path.display()))
            .with_context(err.to_string())
            .with_suggestion("Check the [bus] and [log] tables for unknown keys")
            .with_suggestion("Durations use humantime syntax, e.g. handler_timeout = \"250ms\"")
            .with_source(err)
    }

    pub fn input_line(path: &Path, line: usize, err: impl fmt::Display) -> Self {
        AgoraError::new(format!("{}:{}: invalid event line", path.display(), line))
            .with_context(err.to_string())
            .with_suggestion(
                "Each line is a JSON object: {\"event_type\": \"...\", \"payload\": {...}}",
            )
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
