// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `agora publish <event_type>` - Publish one event and show what ran

use super::{parse_event_type, parse_payload};
use crate::output::{self, OutputFormat};
use agora_core::{EventBus, NewEvent, Priority};
use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct PublishArgs {
    /// Event type (e.g., "auth.user.login")
    pub event_type: String,

    /// Event payload as a JSON object
    #[arg(short, long, default_value = "{}")]
    pub payload: String,

    /// Event priority: low, normal, high or critical
    #[arg(long, default_value = "normal")]
    pub priority: Priority,

    /// Module to record as the event's source
    #[arg(long, default_value = "cli")]
    pub source: String,

    /// Metadata entries (key=value)
    #[arg(short = 'm', long = "meta", value_parser = parse_key_val)]
    pub meta: Vec<(String, String)>,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid key=value: no `=` found in `{s}`"))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

pub async fn publish(bus: &EventBus, args: PublishArgs, format: OutputFormat) -> Result<()> {
    let event_type = parse_event_type(&args.event_type)?;
    let payload = parse_payload(&args.payload)?;

    let event = args.meta.into_iter().fold(
        NewEvent::from_type(event_type)
            .with_payload(payload)
            .with_priority(args.priority)
            .with_source(args.source),
        |event, (key, value)| event.with_meta(key, value),
    );

    let outcome = bus.publish(event).await;
    output::print(&outcome, format);
    Ok(())
}
