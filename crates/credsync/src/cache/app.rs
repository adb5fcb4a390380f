//! Application token cache binding.

use std::sync::Arc;
use std::time::Duration;

use crate::CacheResult;
use crate::config::CacheConfig;
use crate::notification::{AccessContext, TokenCacheBinding, TokenCacheHandle};
use crate::store::TokenStore;

/// Token cache binding for a confidential client's own credentials.
///
/// Application tokens belong to the client, not to a signed-in user, so the
/// partition key is fixed at construction from the client id and no identity
/// back-write exists. Entries use the application cache duration, which is
/// longer than the per-user one.
///
/// Construct one instance per process, next to the store it uses, and share
/// it (`Arc`) with every acquisition flow; there is no hidden process-wide
/// state.
pub struct AppTokenCache {
    store: Arc<dyn TokenStore>,
    cache_key: String,
    ttl: Duration,
}

impl AppTokenCache {
    /// Creates the binding for the given client id.
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>, client_id: &str, config: &CacheConfig) -> Self {
        Self {
            store,
            cache_key: format!("{client_id}_AppTokenCache"),
            ttl: config.app_cache_ttl,
        }
    }

    /// The fixed partition key for this client.
    #[must_use]
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    /// Removes the client's entry from the store and empties the handle.
    ///
    /// # Errors
    ///
    /// Propagates backing-store failures.
    pub fn clear(&self, handle: &mut dyn TokenCacheHandle) -> CacheResult<()> {
        self.store.remove(&self.cache_key)?;
        tracing::debug!(client_cache = %self.cache_key, "cleared application token cache entry");
        handle.reset();
        self.on_before_access(&mut AccessContext::new(handle))
    }
}

impl TokenCacheBinding for AppTokenCache {
    fn on_before_access(&self, ctx: &mut AccessContext<'_>) -> CacheResult<()> {
        let Some(blob) = self.store.get(&self.cache_key)? else {
            return Ok(());
        };
        if let Err(err) = ctx.handle().deserialize(&blob) {
            tracing::warn!(error = %err, "discarding unreadable application token cache entry");
            ctx.handle().reset();
        }
        Ok(())
    }

    fn on_after_access(&self, ctx: &mut AccessContext<'_>) -> CacheResult<()> {
        if !ctx.has_state_changed() {
            return Ok(());
        }
        let blob = ctx.handle().serialize();
        self.store.set(&self.cache_key, blob, self.ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryTokenStore;

    struct StubHandle {
        blob: Vec<u8>,
        changed: bool,
    }

    impl TokenCacheHandle for StubHandle {
        fn serialize(&self) -> Vec<u8> {
            self.blob.clone()
        }
        fn deserialize(&mut self, blob: &[u8]) -> CacheResult<()> {
            self.blob = blob.to_vec();
            Ok(())
        }
        fn reset(&mut self) {
            self.blob.clear();
        }
        fn has_state_changed(&self) -> bool {
            self.changed
        }
        fn reset_state_changed(&mut self) {
            self.changed = false;
        }
    }

    fn app_cache(store: &Arc<InMemoryTokenStore>) -> AppTokenCache {
        let store: Arc<dyn TokenStore> = Arc::clone(store) as Arc<dyn TokenStore>;
        AppTokenCache::new(store, "client-1", &CacheConfig::default())
    }

    #[test]
    fn test_key_is_scoped_to_client() {
        let store = Arc::new(InMemoryTokenStore::new());
        assert_eq!(app_cache(&store).cache_key(), "client-1_AppTokenCache");
    }

    #[test]
    fn test_persist_and_reload() {
        let store = Arc::new(InMemoryTokenStore::new());
        let cache = app_cache(&store);

        let mut handle = StubHandle {
            blob: b"app tokens".to_vec(),
            changed: true,
        };
        cache
            .on_after_access(&mut AccessContext::new(&mut handle))
            .unwrap();

        let mut fresh = StubHandle {
            blob: Vec::new(),
            changed: false,
        };
        cache
            .on_before_access(&mut AccessContext::new(&mut fresh))
            .unwrap();
        assert_eq!(fresh.blob, b"app tokens");
    }

    #[test]
    fn test_unchanged_state_writes_nothing() {
        let store = Arc::new(InMemoryTokenStore::new());
        let cache = app_cache(&store);

        let mut handle = StubHandle {
            blob: b"app tokens".to_vec(),
            changed: false,
        };
        cache
            .on_after_access(&mut AccessContext::new(&mut handle))
            .unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear() {
        let store = Arc::new(InMemoryTokenStore::new());
        let cache = app_cache(&store);

        let mut handle = StubHandle {
            blob: b"app tokens".to_vec(),
            changed: true,
        };
        cache
            .on_after_access(&mut AccessContext::new(&mut handle))
            .unwrap();

        cache.clear(&mut handle).unwrap();
        assert!(handle.blob.is_empty());
        assert_eq!(store.get("client-1_AppTokenCache").unwrap(), None);
    }
}
