// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notifications module
//!
//! Reacts to other modules' events and fills per-user inboxes. Each handler
//! reads the payload through its own typed view, so a malformed event fails
//! only that handler.

use agora_core::{BusError, Event, EventBus, Handler, HandlerError, Module, SubscriptionId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Welcome,
    FeaturedPost,
    RankChanged,
}

impl NotificationKind {
    /// Topic this kind of notification reacts to
    pub fn topic(&self) -> &'static str {
        match self {
            Self::Welcome => "auth.user.registered",
            Self::FeaturedPost => "community.post.created",
            Self::RankChanged => "pinpanclub.ranking.updated",
        }
    }

    fn handler_name(&self) -> &'static str {
        match self {
            Self::Welcome => "notifications.welcome",
            Self::FeaturedPost => "notifications.featured_post",
            Self::RankChanged => "notifications.rank_changed",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Welcome => "welcome",
            Self::FeaturedPost => "featured_post",
            Self::RankChanged => "rank_changed",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub user_id: String,
    pub kind: NotificationKind,
    pub message: String,
    /// Event that triggered the notification
    pub event_id: String,
}

#[derive(Deserialize)]
struct WelcomeView {
    user_id: String,
}

#[derive(Deserialize)]
struct PostView {
    post_id: String,
    author_id: String,
    title: String,
    #[serde(default)]
    featured: bool,
}

#[derive(Deserialize)]
struct RankingView {
    player_id: String,
    old_rank: Option<u32>,
    new_rank: u32,
}

type Inbox = Arc<Mutex<Vec<Notification>>>;

struct NotifyHandler {
    kind: NotificationKind,
    inbox: Inbox,
}

impl NotifyHandler {
    fn compose(&self, event: &Event) -> Result<Option<(String, String)>, HandlerError> {
        match self.kind {
            NotificationKind::Welcome => {
                let view: WelcomeView = event.payload_as()?;
                Ok(Some((view.user_id, "Welcome to Agora!".to_string())))
            }
            NotificationKind::FeaturedPost => {
                let view: PostView = event.payload_as()?;
                if !view.featured {
                    return Ok(None);
                }
                Ok(Some((
                    view.author_id,
                    format!("Your post \"{}\" ({}) is featured", view.title, view.post_id),
                )))
            }
            NotificationKind::RankChanged => {
                let view: RankingView = event.payload_as()?;
                let message = match view.old_rank {
                    Some(old) if old == view.new_rank => return Ok(None),
                    Some(old) => format!("You moved from #{} to #{}", old, view.new_rank),
                    None => format!("You entered the ranking at #{}", view.new_rank),
                };
                Ok(Some((view.player_id, message)))
            }
        }
    }
}

#[async_trait]
impl Handler for NotifyHandler {
    fn name(&self) -> &str {
        self.kind.handler_name()
    }

    async fn handle(&self, event: Arc<Event>) -> Result<(), HandlerError> {
        let Some((user_id, message)) = self.compose(&event)? else {
            return Ok(());
        };
        tracing::debug!(user_id = %user_id, kind = %self.kind, "notification queued");
        self.inbox
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Notification {
                user_id,
                kind: self.kind,
                message,
                event_id: event.event_id().to_string(),
            });
        Ok(())
    }
}

#[derive(Default)]
pub struct Notifications {
    inbox: Inbox,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.inbox.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn for_user(&self, user_id: &str) -> Vec<Notification> {
        let inbox = self.inbox.lock().unwrap_or_else(|e| e.into_inner());
        inbox
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }
}

impl Module for Notifications {
    fn name(&self) -> &'static str {
        "notifications"
    }

    fn register(&self, bus: &EventBus) -> Result<Vec<SubscriptionId>, BusError> {
        [
            NotificationKind::Welcome,
            NotificationKind::FeaturedPost,
            NotificationKind::RankChanged,
        ]
        .into_iter()
        .map(|kind| {
            let handler = Arc::new(NotifyHandler {
                kind,
                inbox: Arc::clone(&self.inbox),
            });
            bus.subscribe(kind.topic(), handler)
        })
        .collect()
    }
}

#[cfg(test)]
#[path = "notifications_tests.rs"]
mod tests;
