// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! All business modules wired onto one bus

use crate::{Audit, Auth, Community, Notifications, Pinpanclub};
use agora_core::{BusError, EventBus, Module};

pub struct Platform {
    pub auth: Auth,
    pub community: Community,
    pub notifications: Notifications,
    pub pinpanclub: Pinpanclub,
    pub audit: Audit,
}

impl Platform {
    /// Build every module and register its handlers
    ///
    /// Registration order is fixed, so within one batch handlers of earlier
    /// modules are invoked first and the audit trail sees events last.
    pub fn install(bus: &EventBus) -> Result<Self, BusError> {
        let platform = Self {
            auth: Auth::new(bus),
            community: Community::new(bus),
            notifications: Notifications::new(),
            pinpanclub: Pinpanclub::new(bus),
            audit: Audit::new(),
        };
        for module in platform.modules() {
            bus.install(module)?;
        }
        Ok(platform)
    }

    pub fn modules(&self) -> [&dyn Module; 5] {
        [
            &self.auth,
            &self.community,
            &self.notifications,
            &self.pinpanclub,
            &self.audit,
        ]
    }
}

#[cfg(test)]
#[path = "platform_tests.rs"]
mod tests;
