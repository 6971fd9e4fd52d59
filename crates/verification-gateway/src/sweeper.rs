//! Background eviction of expired option records.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::store::OptionsStore;

/// Default sweep period, in seconds.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

/// Spawn the periodic sweep task. Started once at service startup and
/// bound to the process lifetime; a sweep pass never surfaces anything
/// to request handling, it only bounds memory for abandoned sessions.
pub fn spawn_sweeper(store: Arc<OptionsStore>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick fires immediately; skip it so a fresh store
        // isn't swept at startup.
        interval.tick().await;

        loop {
            interval.tick().await;
            let evicted = store.sweep_expired().await;
            if evicted > 0 {
                debug!("Sweeper evicted {} expired option record(s)", evicted);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::Utc;
    use disclosure_common::VerificationOptions;

    #[tokio::test]
    async fn test_sweeper_evicts_aged_records() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = Arc::new(OptionsStore::new(
            chrono::Duration::minutes(30),
            clock.clone(),
        ));

        store.set("u1", VerificationOptions::default()).await;
        clock.advance(chrono::Duration::minutes(31));

        let handle = spawn_sweeper(store.clone(), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();

        assert_eq!(store.len().await, 0);
    }
}
