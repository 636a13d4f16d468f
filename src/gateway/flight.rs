//! Per-key coalescing of concurrent cache misses.
//!
//! A miss takes the key's flight lock before fetching. Followers for the
//! same key queue behind the leader, then re-check the cache: the leader's
//! store turns their miss into a hit without a second upstream call. If
//! the leader failed, the next follower in line becomes the leader and
//! fetches itself (failures are per-request; there is no shared retry).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type SlotMap = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

pub(crate) struct FlightRegistry {
    slots: SlotMap,
}

impl FlightRegistry {
    pub(crate) fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Take the flight lock for `key`, waiting behind any current leader.
    pub(crate) async fn acquire(&self, key: &str) -> FlightPermit {
        let slot = {
            let mut slots = self.slots.lock().expect("flight registry lock poisoned");
            Arc::clone(slots.entry(key.to_string()).or_default())
        };
        let guard = slot.lock_owned().await;
        FlightPermit {
            slots: Arc::clone(&self.slots),
            key: key.to_string(),
            guard: Some(guard),
        }
    }
}

/// Held for the duration of one coalesced fetch.
///
/// Dropping releases the key and prunes its slot once no other flight
/// holds or awaits it, so the registry does not accumulate dead keys.
pub(crate) struct FlightPermit {
    slots: SlotMap,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for FlightPermit {
    fn drop(&mut self) {
        // Release the lock before deciding whether to prune.
        self.guard.take();
        if let Ok(mut slots) = self.slots.lock() {
            if let Some(slot) = slots.get(&self.key) {
                // The map's reference is the only one left: nobody is
                // holding or waiting on this slot.
                if Arc::strong_count(slot) == 1 {
                    slots.remove(&self.key);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn follower_waits_for_leader() {
        let registry = Arc::new(FlightRegistry::new());
        let leader = registry.acquire("k").await;

        let follower = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                registry.acquire("k").await;
            })
        };

        // Follower cannot finish while the leader holds the permit.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!follower.is_finished());

        drop(leader);
        tokio::time::timeout(Duration::from_secs(1), follower)
            .await
            .expect("follower should acquire after leader drops")
            .expect("follower task panicked");
    }

    #[tokio::test]
    async fn slots_are_pruned_after_use() {
        let registry = FlightRegistry::new();
        drop(registry.acquire("k").await);
        assert!(
            registry
                .slots
                .lock()
                .expect("flight registry lock poisoned")
                .is_empty()
        );
    }

    #[tokio::test]
    async fn distinct_keys_do_not_contend() {
        let registry = FlightRegistry::new();
        let _a = registry.acquire("a").await;
        // Must not block.
        let _b = tokio::time::timeout(Duration::from_millis(100), registry.acquire("b"))
            .await
            .expect("distinct key should acquire immediately");
    }
}
