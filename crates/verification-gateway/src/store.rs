//! In-memory hand-off store for saved verification options.
//!
//! Maps a session identifier to the options the configuration step
//! saved for it. Records expire after a TTL and the consumer read
//! deletes (`take`), so an entry is used at most once.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use disclosure_common::VerificationOptions;
use tokio::sync::Mutex;
use tracing::debug;

use crate::clock::Clock;

/// How long a saved record stays retrievable, in minutes.
pub const DEFAULT_TTL_MINUTES: i64 = 30;

/// A saved options record. Owned exclusively by the store.
#[derive(Debug, Clone)]
struct OptionsRecord {
    options: VerificationOptions,
    created_at: DateTime<Utc>,
}

/// TTL-bounded map from session id to saved verification options.
///
/// All operations serialize on a single mutex; none hold it across an
/// await point, so every call completes in bounded time and the
/// sweep's expiry check is atomic with its removal (a `set` racing a
/// sweep can never lose a fresh record).
pub struct OptionsStore {
    entries: Mutex<HashMap<String, OptionsRecord>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl OptionsStore {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Insert or replace the record for `user_id`, stamping it with
    /// the current time. Last write wins; a rewrite of an expired but
    /// not yet swept entry revives it with a fresh TTL.
    pub async fn set(&self, user_id: &str, options: VerificationOptions) {
        let record = OptionsRecord {
            options,
            created_at: self.clock.now(),
        };
        let mut entries = self.entries.lock().await;
        entries.insert(user_id.to_string(), record);
        debug!("Saved options for user: {}", user_id);
    }

    /// Non-destructive read. Expired entries are evicted on the spot
    /// and reported absent; a successful read leaves the record in
    /// place.
    pub async fn get(&self, user_id: &str) -> Option<VerificationOptions> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;

        let created_at = entries.get(user_id).map(|record| record.created_at)?;
        if now - created_at > self.ttl {
            entries.remove(user_id);
            debug!("Options expired for user: {}", user_id);
            return None;
        }

        entries.get(user_id).map(|record| record.options.clone())
    }

    /// Consumer read: return the options and delete the record in one
    /// critical section. A second `take` for the same id sees absent.
    pub async fn take(&self, user_id: &str) -> Option<VerificationOptions> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;

        let record = entries.remove(user_id)?;
        if now - record.created_at > self.ttl {
            debug!("Options expired for user: {}", user_id);
            return None;
        }
        debug!("Consumed options for user: {}", user_id);
        Some(record.options)
    }

    /// Remove the record if present. Idempotent.
    pub async fn delete(&self, user_id: &str) -> bool {
        let mut entries = self.entries.lock().await;
        entries.remove(user_id).is_some()
    }

    /// Evict every record older than the TTL. Returns the number of
    /// records removed. The check and the removal happen under the
    /// same lock as `set`, so only records the sweep itself observed
    /// as expired are deleted.
    pub async fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;

        let before = entries.len();
        entries.retain(|_, record| now - record.created_at <= self.ttl);
        before - entries.len()
    }

    /// Number of live (not yet swept) records.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}
