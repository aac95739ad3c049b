// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Agora business modules wired through the event bus
//!
//! Each module keeps its state in memory and talks to the others only by
//! publishing and subscribing to events.

pub mod audit;
pub mod auth;
pub mod community;
mod error;
pub mod notifications;
pub mod pinpanclub;
mod platform;

pub use audit::{Audit, AuditEntry};
pub use auth::{Auth, UserRecord};
pub use community::{Comment, Community, Post};
pub use error::ModuleError;
pub use notifications::{Notification, NotificationKind, Notifications};
pub use pinpanclub::{Pinpanclub, Standing};
pub use platform::Platform;

use agora_core::Payload;
use serde::Serialize;
use serde_json::Value;

/// Serialize a typed event body into a payload map
pub(crate) fn to_payload<T: Serialize>(body: &T) -> Result<Payload, ModuleError> {
    match serde_json::to_value(body)? {
        Value::Object(map) => Ok(map),
        other => Err(ModuleError::Invalid(format!(
            "event body must be an object, got {}",
            other
        ))),
    }
}
