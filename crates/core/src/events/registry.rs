// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscription registry
//!
//! Maps each pattern to the ordered list of subscriptions registered against
//! it. Mutations replace the route table as a whole (copy-on-write), so a
//! dispatch that already took a [`Routes`] snapshot is unaffected by later
//! subscribe/unsubscribe calls.

use super::handler::Handler;
use super::subscription::{EventPattern, Subscription, SubscriptionId};
use crate::error::PatternError;
use crate::event::Priority;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Immutable view of all registered subscriptions
#[derive(Clone, Default, Debug)]
pub struct Routes {
    by_pattern: BTreeMap<String, Vec<Arc<Subscription>>>,
    index: HashMap<SubscriptionId, String>,
}

impl Routes {
    /// Collect every subscription that should receive an event, in
    /// registration order. Each subscription appears at most once.
    pub fn resolve(&self, event_type: &str, priority: Priority) -> Vec<Arc<Subscription>> {
        let mut matched: Vec<Arc<Subscription>> = self
            .by_pattern
            .values()
            .flatten()
            .filter(|sub| sub.accepts(event_type, priority))
            .cloned()
            .collect();
        matched.sort_by_key(|sub| sub.registration_order);
        matched
    }

    /// Total number of subscriptions
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Patterns with their subscriptions, sorted by pattern text
    pub fn patterns(&self) -> impl Iterator<Item = (&str, &[Arc<Subscription>])> {
        self.by_pattern
            .iter()
            .map(|(pattern, subs)| (pattern.as_str(), subs.as_slice()))
    }

    pub fn contains(&self, id: &SubscriptionId) -> bool {
        self.index.contains_key(id)
    }

    fn insert(&mut self, sub: Subscription) {
        let key = sub.pattern.to_string();
        self.index.insert(sub.id.clone(), key.clone());
        self.by_pattern.entry(key).or_default().push(Arc::new(sub));
    }

    fn remove(&mut self, id: &SubscriptionId) -> bool {
        let Some(key) = self.index.remove(id) else {
            return false;
        };
        if let Some(subs) = self.by_pattern.get_mut(&key) {
            subs.retain(|sub| &sub.id != id);
            if subs.is_empty() {
                self.by_pattern.remove(&key);
            }
        }
        true
    }
}

/// Process-lifetime store of subscriptions
#[derive(Default)]
pub struct SubscriptionRegistry {
    routes: RwLock<Arc<Routes>>,
    next_order: AtomicU64,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the pattern and register a handler against it
    pub fn subscribe(
        &self,
        pattern: &str,
        handler: Arc<dyn Handler>,
        priority_floor: Priority,
    ) -> Result<SubscriptionId, PatternError> {
        let pattern = EventPattern::parse(pattern)?;
        let order = self.next_order.fetch_add(1, Ordering::SeqCst) + 1;
        let id = SubscriptionId(format!("sub-{}", order));

        let sub = Subscription {
            id: id.clone(),
            pattern,
            handler,
            registration_order: order,
            priority_floor,
        };

        let mut routes = self.routes.write().unwrap_or_else(|e| e.into_inner());
        Arc::make_mut(&mut *routes).insert(sub);

        Ok(id)
    }

    /// Remove a subscription. Returns false if it was already removed.
    pub fn unsubscribe(&self, id: &SubscriptionId) -> bool {
        let mut routes = self.routes.write().unwrap_or_else(|e| e.into_inner());
        if !routes.contains(id) {
            return false;
        }
        Arc::make_mut(&mut *routes).remove(id)
    }

    /// Current route table; later mutations do not affect the returned value
    pub fn snapshot(&self) -> Arc<Routes> {
        let routes = self.routes.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*routes)
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
