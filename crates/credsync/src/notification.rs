//! The token-acquisition library's notification contract.
//!
//! The acquisition library owns the in-memory token state and lets a cache
//! implementation stay synchronized with it through three notification
//! points, invoked synchronously around every acquisition:
//!
//! 1. **before access** — reload the library's state from the persistence
//!    store in case it changed since the last access
//! 2. **before write** — a chance to take out exclusion before the library
//!    mutates its state
//! 3. **after access** — persist the state if the library reports it
//!    changed
//!
//! No event bus is involved: the library simply calls the three
//! [`TokenCacheBinding`] methods with an [`AccessContext`] describing the
//! access.

use crate::CacheResult;

/// Opaque handle to the acquisition library's in-memory token state.
///
/// This layer never inspects the content of the blob; it only moves it
/// between the handle and a backing store. The changed flag is owned by
/// the library: it is set when an acquisition mutates the state and
/// cleared once that state has been persisted.
pub trait TokenCacheHandle {
    /// Serializes the in-memory token state to an opaque blob.
    fn serialize(&self) -> Vec<u8>;

    /// Replaces the in-memory token state with the given blob.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Serialization`](crate::CacheError::Serialization)
    /// if the blob cannot be parsed (version mismatch, corruption). Bindings
    /// treat that as a cache miss, never as fatal.
    fn deserialize(&mut self, blob: &[u8]) -> CacheResult<()>;

    /// Discards the in-memory token state, leaving the handle empty.
    fn reset(&mut self);

    /// Whether the in-memory state differs from what was last persisted.
    fn has_state_changed(&self) -> bool;

    /// Resets the changed flag after the state has been persisted.
    fn reset_state_changed(&mut self);
}

/// Parameters of one cache access, passed by the acquisition library to
/// each notification hook.
pub struct AccessContext<'a> {
    handle: &'a mut dyn TokenCacheHandle,
    account_id: Option<String>,
}

impl<'a> AccessContext<'a> {
    /// Creates a context for a before-access or before-write notification.
    #[must_use]
    pub fn new(handle: &'a mut dyn TokenCacheHandle) -> Self {
        Self {
            handle,
            account_id: None,
        }
    }

    /// Creates a context for an after-access notification, carrying the
    /// account identifier the acquisition actually used, if any.
    #[must_use]
    pub fn with_account(handle: &'a mut dyn TokenCacheHandle, account_id: impl Into<String>) -> Self {
        Self {
            handle,
            account_id: Some(account_id.into()),
        }
    }

    /// The library's token-state handle.
    pub fn handle(&mut self) -> &mut dyn TokenCacheHandle {
        self.handle
    }

    /// Whether the library reports its state changed since the last access.
    #[must_use]
    pub fn has_state_changed(&self) -> bool {
        self.handle.has_state_changed()
    }

    /// The account identifier used by the acquisition, if one is known.
    /// Only populated on after-access notifications.
    #[must_use]
    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }
}

/// A cache implementation bound to the three notification points.
///
/// All hooks are synchronous and must run to completion; the acquisition
/// library does not support cancellation mid-hook. Hooks may be invoked
/// concurrently from many acquisition flows.
pub trait TokenCacheBinding {
    /// Invoked right before the library accesses its token state. Reloads
    /// the state from the persistence store in case it changed since the
    /// last access.
    ///
    /// # Errors
    ///
    /// Propagates backing-store failures.
    fn on_before_access(&self, ctx: &mut AccessContext<'_>) -> CacheResult<()>;

    /// Invoked right before the library writes its token state.
    ///
    /// The default is a no-op: implementations backed by an internally
    /// synchronized store need no exclusion here. A binding over a store
    /// without internal synchronization must perform mutual exclusion in
    /// this hook instead.
    ///
    /// # Errors
    ///
    /// Propagates backing-store failures.
    fn on_before_write(&self, ctx: &mut AccessContext<'_>) -> CacheResult<()> {
        let _ = ctx;
        Ok(())
    }

    /// Invoked right after the library accessed its token state. Persists
    /// the state iff the library reports it changed.
    ///
    /// # Errors
    ///
    /// Propagates backing-store failures.
    fn on_after_access(&self, ctx: &mut AccessContext<'_>) -> CacheResult<()>;
}
