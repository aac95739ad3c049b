// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `agora match <pattern> <event_type>...` - Test a subscription pattern

use super::parse_event_type;
use crate::error::AgoraError;
use crate::output::{self, OutputFormat};
use agora_core::EventPattern;
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct MatchArgs {
    /// Pattern: exact type, `prefix.*` or `*`
    pub pattern: String,

    /// Event types to test
    #[arg(required = true)]
    pub event_types: Vec<String>,
}

#[derive(Serialize)]
struct MatchRow {
    event_type: String,
    matched: bool,
}

impl fmt::Display for MatchRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.matched { "match" } else { "no match" };
        write!(f, "{}: {}", self.event_type, verdict)
    }
}

pub fn check(args: MatchArgs, format: OutputFormat) -> Result<()> {
    let pattern = EventPattern::parse(&args.pattern)
        .map_err(|e| AgoraError::invalid_pattern(&args.pattern, e))?;

    let rows = args
        .event_types
        .iter()
        .map(|input| {
            let event_type = parse_event_type(input)?;
            Ok(MatchRow {
                matched: pattern.matches(event_type.as_str()),
                event_type: event_type.to_string(),
            })
        })
        .collect::<Result<Vec<_>, AgoraError>>()?;

    output::print_list(&rows, format);
    Ok(())
}
