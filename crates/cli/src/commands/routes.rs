// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `agora routes` - List the subscriptions registered by the modules

use crate::output::{self, OutputFormat};
use agora_core::{EventBus, Priority, SubscriptionId};
use anyhow::Result;
use serde::Serialize;
use std::fmt;

#[derive(Serialize)]
struct RouteRow {
    pattern: String,
    handler: String,
    subscription_id: SubscriptionId,
    priority_floor: Priority,
}

impl fmt::Display for RouteRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<28} {:<32} {}",
            self.pattern, self.handler, self.subscription_id
        )?;
        if self.priority_floor > Priority::Low {
            write!(f, " (>= {})", self.priority_floor)?;
        }
        Ok(())
    }
}

pub fn routes(bus: &EventBus, format: OutputFormat) -> Result<()> {
    let routes = bus.routes();
    let rows: Vec<RouteRow> = routes
        .patterns()
        .flat_map(|(pattern, subs)| {
            subs.iter().map(move |sub| RouteRow {
                pattern: pattern.to_string(),
                handler: sub.handler_name().to_string(),
                subscription_id: sub.id.clone(),
                priority_floor: sub.priority_floor,
            })
        })
        .collect();

    let header = format!("{:<28} {:<32} ID", "PATTERN", "HANDLER");
    output::print_table(&header, "No subscriptions", &rows, format);
    Ok(())
}
