//! Per-user token cache binding.

use std::sync::Arc;
use std::time::Duration;

use crate::CacheResult;
use crate::claims::{self, SharedIdentity};
use crate::config::CacheConfig;
use crate::notification::{AccessContext, TokenCacheBinding, TokenCacheHandle};
use crate::store::TokenStore;

/// Token cache binding for one signed-in principal.
///
/// The cache partition is selected by the key derived from the principal's
/// claims (see [`ClaimsIdentity::account_cache_key`]). When no key can be
/// derived, load and persist are no-ops: the acquisition simply proceeds
/// without a cache hit or write.
///
/// A binding lives for the duration of one acquisition call; the backing
/// [`TokenStore`] is shared across bindings and outlives them.
///
/// # Concurrency
///
/// The store is internally synchronized, so the hooks take no additional
/// locks. Two concurrent acquisitions for the same principal may both read
/// the same stale entry, both acquire fresh tokens, and both write; the
/// later write wins. Use [`SessionTokenCache`](crate::cache::SessionTokenCache)
/// where the whole read-modify-write window must be serialized.
///
/// [`ClaimsIdentity::account_cache_key`]: crate::claims::ClaimsIdentity::account_cache_key
pub struct PerUserTokenCache {
    store: Arc<dyn TokenStore>,
    identity: Option<SharedIdentity>,
    ttl: Duration,
}

impl PerUserTokenCache {
    /// Creates a binding for the given principal.
    ///
    /// The identity is shared: after the first successful acquisition the
    /// binding writes the library-assigned account identifier back into it,
    /// so later requests derive the same cache key from that claim.
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>, config: &CacheConfig, identity: SharedIdentity) -> Self {
        Self {
            store,
            identity: Some(identity),
            ttl: config.user_cache_ttl,
        }
    }

    /// Creates a binding with no signed-in principal.
    ///
    /// No key can be derived, so every hook is a no-op until an identity
    /// exists. Useful during sign-out flows.
    #[must_use]
    pub fn without_identity(store: Arc<dyn TokenStore>, config: &CacheConfig) -> Self {
        Self {
            store,
            identity: None,
            ttl: config.user_cache_ttl,
        }
    }

    /// The cache key for the bound principal, if one can be derived.
    #[must_use]
    pub fn cache_key(&self) -> Option<String> {
        self.identity
            .as_ref()
            .and_then(|identity| identity.read().account_cache_key())
    }

    /// Removes the principal's entry from the store and empties the handle.
    ///
    /// Re-runs the before-access hook once afterwards so the handle is left
    /// in the same state a fresh acquisition would start from.
    ///
    /// # Errors
    ///
    /// Propagates backing-store failures.
    pub fn clear(&self, handle: &mut dyn TokenCacheHandle) -> CacheResult<()> {
        if let Some(key) = self.cache_key() {
            self.store.remove(&key)?;
            tracing::debug!("cleared per-user token cache entry");
        }
        handle.reset();
        self.on_before_access(&mut AccessContext::new(handle))
    }
}

impl TokenCacheBinding for PerUserTokenCache {
    fn on_before_access(&self, ctx: &mut AccessContext<'_>) -> CacheResult<()> {
        let Some(key) = self.cache_key() else {
            return Ok(());
        };
        let Some(blob) = self.store.get(&key)? else {
            // No prior cache: leave the handle as-is and acquire fresh.
            return Ok(());
        };
        if let Err(err) = ctx.handle().deserialize(&blob) {
            // A corrupted entry must never block authentication.
            tracing::warn!(error = %err, "discarding unreadable token cache entry");
            ctx.handle().reset();
        }
        Ok(())
    }

    // Default on_before_write: the store's get/set are internally
    // synchronized, so no exclusion is needed at this layer. A binding over
    // a store without that property must lock here instead.

    fn on_after_access(&self, ctx: &mut AccessContext<'_>) -> CacheResult<()> {
        if !ctx.has_state_changed() {
            return Ok(());
        }
        let Some(key) = self.cache_key() else {
            return Ok(());
        };
        let blob = ctx.handle().serialize();
        self.store.set(&key, blob, self.ttl)?;

        // Keep the claim set, the library, and the store in sync: the
        // account identifier the library used becomes the cache key for
        // every later request in this session.
        if let Some(account_id) = ctx.account_id() {
            claims::bind_account_id(self.identity.as_ref(), account_id);
        }
        Ok(())
    }
}
