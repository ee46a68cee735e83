//! # Keyed Locks
//!
//! Exclusive async locks addressed by string keys (`location:ZWOLLE-001`,
//! `code:MWH.001`), held for the whole validate+write sequence of a
//! lifecycle operation.
//!
//! ## Deadlock Freedom
//! ```text
//! replace(MWH.001 → AMSTERDAM-001)   create(MWH.002 @ AMSTERDAM-001)
//!   keys: code:MWH.001                 keys: code:MWH.002
//!         location:AMSTERDAM-001             location:AMSTERDAM-001
//!
//! Keys are sorted and de-duplicated before locking, so every caller
//! acquires overlapping keys in the same global order.
//! ```

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// Lock key for a location's active aggregate.
pub fn location_key(identifier: &str) -> String {
    format!("location:{}", identifier)
}

/// Lock key for a business unit code lineage.
pub fn code_key(code: &str) -> String {
    format!("code:{}", code)
}

/// Registry of per-key async mutexes.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    slots: DashMap<String, Arc<Mutex<()>>>,
}

/// Guards for a set of keys; dropping it releases every key.
#[derive(Debug)]
pub struct LockSet {
    keys: Vec<String>,
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl LockSet {
    /// The keys held, in acquisition order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until every key is held exclusively by the caller.
    pub async fn acquire<I, K>(&self, keys: I) -> LockSet
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let mut keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        keys.sort();
        keys.dedup();

        // Nobody holds or waits on a slot whose only reference is the map
        self.slots.retain(|_, slot| Arc::strong_count(slot) > 1);

        // Cloned while the shard is locked, so a concurrent prune keeps it
        let mutexes: Vec<Arc<Mutex<()>>> = keys
            .iter()
            .map(|key| Arc::clone(self.slots.entry(key.clone()).or_default().value()))
            .collect();

        let mut guards = Vec::with_capacity(mutexes.len());
        for mutex in mutexes {
            guards.push(mutex.lock_owned().await);
        }

        debug!(keys = ?keys, "Acquired lifecycle locks");
        LockSet {
            keys,
            _guards: guards,
        }
    }

    /// Number of keys currently tracked (held, awaited, or not yet pruned).
    pub fn tracked(&self) -> usize {
        self.slots.len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_keys_sorted_and_deduplicated() {
        let locks = KeyedLocks::new();
        let set = locks
            .acquire([location_key("ZWOLLE-001"), code_key("MWH.001"), code_key("MWH.001")])
            .await;

        assert_eq!(set.keys(), ["code:MWH.001", "location:ZWOLLE-001"]);
    }

    #[tokio::test]
    async fn test_released_slots_are_pruned() {
        let locks = KeyedLocks::new();
        drop(locks.acquire([code_key("MWH.001")]).await);
        drop(locks.acquire([code_key("MWH.002")]).await);

        // The first slot is gone once nobody references it
        assert_eq!(locks.tracked(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_key_is_exclusive() {
        let locks = Arc::new(KeyedLocks::new());
        let inside = Arc::new(AtomicU32::new(0));
        let max_inside = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = Arc::clone(&locks);
            let inside = Arc::clone(&inside);
            let max_inside = Arc::clone(&max_inside);
            handles.push(tokio::spawn(async move {
                let _set = locks.acquire([location_key("AMSTERDAM-001")]).await;
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                max_inside.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_pruning_never_splits_a_contended_key() {
        let locks = Arc::new(KeyedLocks::new());
        let inside = Arc::new(AtomicU32::new(0));
        let max_inside = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for i in 0..16 {
            let locks = Arc::clone(&locks);
            let inside = Arc::clone(&inside);
            let max_inside = Arc::clone(&max_inside);
            handles.push(tokio::spawn(async move {
                // Unrelated keys keep pruning the registry meanwhile
                drop(locks.acquire([code_key(&format!("MWH.{:03}", i))]).await);

                let _set = locks.acquire([location_key("ZWOLLE-002")]).await;
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                max_inside.fetch_max(now, Ordering::SeqCst);
                tokio::task::yield_now().await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
        drop(locks.acquire([code_key("MWH.999")]).await);
        assert_eq!(locks.tracked(), 1);
    }
}
