//! Keyed async locks
//!
//! One mutex per market id serializes trading, lifecycle transitions, and
//! settlement for that market; one mutex per uid serializes wallet
//! mutations. Lock order is always market before wallet, and wallet locks
//! are never held across a market-lock acquisition, so no cycle can form.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Map of string keys to independently held async mutexes
#[derive(Default)]
pub struct LockMap {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl LockMap {
    /// Empty map
    pub fn new() -> LockMap {
        LockMap::default()
    }

    /// Acquire the lock for `key`, creating it on first use.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut inner = self.inner.lock().await;
            Arc::clone(inner.entry(key.to_string()).or_default())
        };
        lock.lock_owned().await
    }
}

/// The two lock domains used by the core
#[derive(Default)]
pub struct EntityLocks {
    /// Per-market serialization
    pub markets: LockMap,
    /// Per-wallet serialization
    pub wallets: LockMap,
}

impl EntityLocks {
    /// Fresh lock domains
    pub fn new() -> EntityLocks {
        EntityLocks::default()
    }
}
