//! Storage contracts for serialized token material.
//!
//! This module defines the storage interfaces the cache bindings load from
//! and persist to:
//!
//! - [`TokenStore`] — a thread-safe key→blob map with per-entry expiry
//! - [`SessionStore`] — per-session storage without internal synchronization
//!
//! # Implementations
//!
//! - [`InMemoryTokenStore`] — process-local map with TTL eviction
//! - [`InMemorySessionStore`] — plain map, for tests and single-threaded
//!   session backends

pub mod memory;
pub mod session;

pub use memory::InMemoryTokenStore;
pub use session::{InMemorySessionStore, SessionStore};

use std::time::Duration;

use crate::CacheResult;

/// Storage trait for serialized token blobs with per-entry expiry.
///
/// Every operation is atomic with respect to the others, so callers need no
/// external locking for a single call. A get-then-set pair is **not**
/// atomic: two concurrent flows can both read a stale entry and both write,
/// with the later write winning. That race is accepted and handled one
/// layer up, by the cache bindings.
///
/// # Example Implementation
///
/// ```ignore
/// use credsync::store::TokenStore;
/// use credsync::CacheResult;
/// use std::time::Duration;
///
/// struct RedisTokenStore {
///     client: redis::Client,
/// }
///
/// impl TokenStore for RedisTokenStore {
///     fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
///         // GET with server-side TTL already applied
///     }
///     // ... other methods
/// }
/// ```
pub trait TokenStore: Send + Sync {
    /// Looks up the blob stored under `key`.
    ///
    /// Expired entries are treated as absent; their physical removal may be
    /// lazy (see [`TokenStore::cleanup_expired`]). Reads never refresh an
    /// entry's expiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Stores `value` under `key`, expiring `ttl` from now.
    ///
    /// Overwrites any existing entry and its expiry (last-writer-wins).
    /// The expiry is absolute, fixed at write time.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()>;

    /// Removes the entry stored under `key`.
    ///
    /// Idempotent: removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn remove(&self, key: &str) -> CacheResult<()>;

    /// Physically removes expired entries.
    ///
    /// Should be called periodically to keep storage from growing; entries
    /// already read as absent once their expiry passes, whether or not this
    /// has run.
    ///
    /// # Returns
    ///
    /// Returns the number of entries removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the cleanup operation fails.
    fn cleanup_expired(&self) -> CacheResult<u64>;
}
