// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `agora run <file>` - Replay a file of JSON event lines
//!
//! Each non-empty line that does not start with `#` is one event:
//! `{"event_type": "...", "payload": {...}, "priority": "high", "source": "auth"}`.
//! Only `event_type` is required.

use crate::error::AgoraError;
use crate::output::{self, OutputFormat};
use agora_core::{BusStats, DispatchReport, EventBus, EventType, NewEvent, Payload, Priority};
use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct RunArgs {
    /// File with one JSON event per line
    pub file: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EventLine {
    event_type: EventType,
    #[serde(default)]
    payload: Payload,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    metadata: Payload,
}

impl From<EventLine> for NewEvent {
    fn from(line: EventLine) -> Self {
        NewEvent::from_type(line.event_type)
            .with_payload(line.payload)
            .with_priority(line.priority)
            .with_metadata(line.metadata)
            .with_source(line.source.unwrap_or_else(|| "cli".to_string()))
    }
}

#[derive(Serialize)]
struct RunSummary {
    reports: Vec<DispatchReport>,
    stats: BusStats,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.reports {
            writeln!(f, "{}", report)?;
        }
        writeln!(f, "stats: {}", self.stats)
    }
}

/// Parse every line up front so a bad file publishes nothing
fn parse_lines(path: &Path, text: &str) -> Result<Vec<NewEvent>, AgoraError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(i, line)| {
            serde_json::from_str::<EventLine>(line)
                .map(NewEvent::from)
                .map_err(|e| AgoraError::input_line(path, i + 1, e))
        })
        .collect()
}

pub async fn run(bus: &EventBus, args: RunArgs, format: OutputFormat) -> Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let events = parse_lines(&args.file, &text)?;
    tracing::info!(file = %args.file.display(), events = events.len(), "replaying events");

    let mut reports = Vec::with_capacity(events.len());
    for event in events {
        if let Some(report) = bus.publish(event).await.into_report() {
            reports.push(report);
        }
    }

    let summary = RunSummary {
        reports,
        stats: bus.stats(),
    };
    output::print(&summary, format);
    Ok(())
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
