//! In-memory token store with TTL eviction.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::CacheResult;
use crate::store::TokenStore;

/// A stored blob with its absolute expiry.
#[derive(Debug, Clone)]
struct CacheEntry {
    blob: Vec<u8>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}

/// Process-local [`TokenStore`] backed by a map with per-entry expiry.
///
/// Suitable wherever there is no per-request context to cache in, e.g. API
/// scenarios. Expiry uses monotonic time, so wall-clock steps cannot
/// prematurely evict or resurrect entries. The store is process-local by
/// design; it offers no cross-node consistency.
///
/// Construct one instance at process start and share it (`Arc`) with every
/// binding that should see the same entries.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries physically present, including expired ones not
    /// yet cleaned up.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if no entries are physically present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let now = Instant::now();
        Ok(self
            .entries
            .read()
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.blob.clone()))
    }

    fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
        let entry = CacheEntry {
            blob: value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().insert(key.to_string(), entry);
        Ok(())
    }

    fn remove(&self, key: &str) -> CacheResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn cleanup_expired(&self) -> CacheResult<u64> {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        Ok((before - entries.len()) as u64)
    }
}
