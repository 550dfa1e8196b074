//! In-memory revocation list for logged-out access tokens.
//!
//! Entries past their deadline are logically absent. They are evicted by the
//! lookup that observes them, or by the periodic sweep.

use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::task::JoinHandle;

use crate::auth::jwt::sha256_hex;

#[derive(Default)]
pub struct RevocationRegistry {
    // sha256(token) -> eviction deadline
    entries: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl RevocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, token: &str, expires_at: DateTime<Utc>) {
        self.entries.write().insert(sha256_hex(token), expires_at);
    }

    pub fn is_blacklisted(&self, token: &str) -> bool {
        self.is_blacklisted_at(token, Utc::now())
    }

    pub fn is_blacklisted_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        let key = sha256_hex(token);

        {
            let entries = self.entries.read();
            match entries.get(&key) {
                None => return false,
                Some(deadline) if now <= *deadline => return true,
                Some(_) => {}
            }
        }

        // The read guard is gone; re-check under the write lock since another
        // caller may have evicted or re-added the entry in between.
        let mut entries = self.entries.write();
        let expired = match entries.get(&key) {
            None => return false,
            Some(deadline) => now > *deadline,
        };
        if !expired {
            return true;
        }
        entries.remove(&key);
        tracing::debug!("evicted expired revocation entry");
        false
    }

    /// Drops every entry whose deadline has passed; returns how many went.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, deadline| now <= *deadline);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Periodically purges expired entries so tokens that are never looked up
/// again do not accumulate.
pub fn spawn_sweeper(registry: Arc<RevocationRegistry>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let purged = registry.purge_expired(Utc::now());
            if purged > 0 {
                tracing::debug!(purged, remaining = registry.len(), "revocation sweep");
            }
        }
    })
}
