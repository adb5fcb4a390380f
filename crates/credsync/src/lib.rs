//! # credsync
//!
//! Credential-cache synchronization for OpenID Connect confidential clients.
//!
//! A token-acquisition library owns in-memory token state (access and
//! refresh tokens, account metadata) and notifies a cache implementation
//! around every access so that state survives across requests. This crate
//! provides that implementation:
//!
//! - derivation of a stable cache key from a principal's claims
//! - a thread-safe key→blob store with per-entry TTL eviction
//! - cache bindings implementing the before-access / before-write /
//!   after-access protocol over that store, per user, per application, and
//!   per web session
//! - write-back of the library-assigned account identifier into the
//!   caller's claim set
//!
//! Token acquisition itself — the OAuth 2.0 / OIDC code exchange — is the
//! acquisition library's job; this crate only keeps its serialized state
//! and a keyed store in sync.
//!
//! ## Modules
//!
//! - [`claims`] - Claim sets, cache-key derivation, account-id write-back
//! - [`config`] - Cache durations per cache class
//! - [`error`] - Error types
//! - [`notification`] - The acquisition library's notification contract
//! - [`store`] - Backing-store traits and in-memory implementations
//! - [`cache`] - The per-user, application, and session-wide bindings
//!
//! ## Example
//!
//! ```
//! use credsync::prelude::*;
//! use std::sync::Arc;
//!
//! let store: Arc<dyn TokenStore> = Arc::new(InMemoryTokenStore::new());
//! let config = CacheConfig::default();
//!
//! let identity = ClaimsIdentity::from_claims([
//!     Claim::new(claim_keys::OBJECT_ID, "u1"),
//!     Claim::new(claim_keys::TENANT_ID, "t1"),
//! ])
//! .into_shared();
//!
//! // Registered with the acquisition library, which invokes the three
//! // hooks around every acquisition.
//! let binding = PerUserTokenCache::new(store, &config, identity);
//! ```

pub mod cache;
pub mod claims;
pub mod config;
pub mod error;
pub mod notification;
pub mod store;

pub use cache::{AppTokenCache, PerUserTokenCache, SessionTokenCache};
pub use claims::{Claim, ClaimsIdentity, SharedIdentity, bind_account_id, claim_keys};
pub use config::CacheConfig;
pub use error::CacheError;
pub use notification::{AccessContext, TokenCacheBinding, TokenCacheHandle};
pub use store::{InMemorySessionStore, InMemoryTokenStore, SessionStore, TokenStore};

/// Type alias for cache synchronization results.
pub type CacheResult<T> = Result<T, CacheError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use credsync::prelude::*;
/// ```
pub mod prelude {
    pub use crate::CacheResult;
    pub use crate::cache::{AppTokenCache, PerUserTokenCache, SessionTokenCache};
    pub use crate::claims::{Claim, ClaimsIdentity, SharedIdentity, bind_account_id, claim_keys};
    pub use crate::config::CacheConfig;
    pub use crate::error::CacheError;
    pub use crate::notification::{AccessContext, TokenCacheBinding, TokenCacheHandle};
    pub use crate::store::{InMemorySessionStore, InMemoryTokenStore, SessionStore, TokenStore};
}
