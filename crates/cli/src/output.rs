// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text or JSON rendering for command results

use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print one result; text already ending in a newline is not padded
pub fn print<T: Serialize + Display>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            let text = value.to_string();
            print!("{}", text);
            if !text.ends_with('\n') {
                println!();
            }
        }
        OutputFormat::Json => print_json(value),
    }
}

/// Print rows, one per line in text mode
pub fn print_list<T: Serialize + Display>(rows: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Text => rows.iter().for_each(|row| println!("{}", row)),
        OutputFormat::Json => print_json(rows),
    }
}

/// Like [`print_list`], with a header line, and `empty` in place of an
/// empty table. JSON output is always the bare array.
pub fn print_table<T: Serialize + Display>(
    header: &str,
    empty: &str,
    rows: &[T],
    format: OutputFormat,
) {
    if format == OutputFormat::Text {
        if rows.is_empty() {
            println!("{}", empty);
            return;
        }
        println!("{}", header);
    }
    print_list(rows, format);
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!(error = %e, "failed to encode output"),
    }
}
