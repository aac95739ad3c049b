// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Authentication module
//!
//! Emits `auth.user.registered`, `auth.user.login` and
//! `auth.session.refreshed`. The user table is built from its own events, so
//! registrations published by other producers are picked up the same way.
//! Uniqueness does not wait for the table: `register_user` claims the id
//! before announcing it, so it holds even when the module is not installed.

use crate::{to_payload, ModuleError};
use agora_core::{
    handler_fn, BusError, Event, EventBus, HandlerError, Module, ModuleEmitter, Payload, Priority,
    PublishOutcome, SubscriptionId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub const USER_REGISTERED: &str = "auth.user.registered";
pub const USER_LOGIN: &str = "auth.user.login";
pub const SESSION_REFRESHED: &str = "auth.session.refreshed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRegistered {
    pub user_id: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLogin {
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRefreshed {
    pub user_id: String,
    pub session_id: String,
}

/// Stored user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    pub user_id: String,
    pub email: String,
    pub registered_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub logins: u32,
}

type Users = Arc<Mutex<HashMap<String, UserRecord>>>;

pub struct Auth {
    emitter: ModuleEmitter,
    users: Users,
    /// Ids taken through `register_user`
    claimed: Arc<Mutex<HashSet<String>>>,
}

impl Auth {
    pub fn new(bus: &EventBus) -> Self {
        Self {
            emitter: bus.emitter("auth"),
            users: Users::default(),
            claimed: Arc::default(),
        }
    }

    /// Register a new account and announce it
    pub async fn register_user(
        &self,
        user_id: &str,
        email: &str,
    ) -> Result<PublishOutcome, ModuleError> {
        if user_id.is_empty() {
            return Err(ModuleError::Invalid("user id must not be empty".to_string()));
        }
        if !email.contains('@') {
            return Err(ModuleError::Invalid(format!("malformed email: {}", email)));
        }
        self.claim(user_id)?;

        let body = UserRegistered {
            user_id: user_id.to_string(),
            email: email.to_string(),
        };
        Ok(self
            .emitter
            .emit(USER_REGISTERED, to_payload(&body)?)
            .await?)
    }

    /// Record a successful login
    pub async fn login(
        &self,
        user_id: &str,
        ip: Option<&str>,
    ) -> Result<PublishOutcome, ModuleError> {
        if self.user(user_id).is_none() {
            return Err(ModuleError::NotFound(format!("user {}", user_id)));
        }
        let mut metadata = Payload::new();
        if let Some(ip) = ip {
            metadata.insert("ip".to_string(), ip.into());
        }
        let body = UserLogin {
            user_id: user_id.to_string(),
        };
        Ok(self
            .emitter
            .emit_event(USER_LOGIN, to_payload(&body)?, Priority::Normal, metadata)
            .await?)
    }

    pub async fn refresh_session(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<PublishOutcome, ModuleError> {
        let body = SessionRefreshed {
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
        };
        Ok(self
            .emitter
            .emit_event(
                SESSION_REFRESHED,
                to_payload(&body)?,
                Priority::Low,
                Payload::new(),
            )
            .await?)
    }

    fn claim(&self, user_id: &str) -> Result<(), ModuleError> {
        let mut claimed = self.claimed.lock().unwrap_or_else(|e| e.into_inner());
        if self.user(user_id).is_some() || !claimed.insert(user_id.to_string()) {
            return Err(ModuleError::Duplicate(format!("user {}", user_id)));
        }
        Ok(())
    }

    pub fn user(&self, user_id: &str) -> Option<UserRecord> {
        let users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        users.get(user_id).cloned()
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

fn store_user(users: &Users, event: &Event) -> Result<(), HandlerError> {
    let body: UserRegistered = event.payload_as()?;
    let mut users = users.lock().unwrap_or_else(|e| e.into_inner());
    users
        .entry(body.user_id.clone())
        .or_insert_with(|| UserRecord {
            user_id: body.user_id,
            email: body.email,
            registered_at: event.created_at(),
            last_login: None,
            logins: 0,
        });
    Ok(())
}

fn record_login(users: &Users, event: &Event) -> Result<(), HandlerError> {
    let body: UserLogin = event.payload_as()?;
    let mut users = users.lock().unwrap_or_else(|e| e.into_inner());
    let Some(user) = users.get_mut(&body.user_id) else {
        return Err(HandlerError::msg(format!("unknown user {}", body.user_id)));
    };
    user.last_login = Some(event.created_at());
    user.logins += 1;
    tracing::debug!(user_id = %body.user_id, logins = user.logins, "login recorded");
    Ok(())
}

impl Module for Auth {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn register(&self, bus: &EventBus) -> Result<Vec<SubscriptionId>, BusError> {
        let users = Arc::clone(&self.users);
        let store = handler_fn("auth.store_user", move |event| {
            let users = Arc::clone(&users);
            async move { store_user(&users, &event) }
        });

        let users = Arc::clone(&self.users);
        let login = handler_fn("auth.record_login", move |event| {
            let users = Arc::clone(&users);
            async move { record_login(&users, &event) }
        });

        Ok(vec![
            bus.subscribe(USER_REGISTERED, store)?,
            bus.subscribe(USER_LOGIN, login)?,
        ])
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
