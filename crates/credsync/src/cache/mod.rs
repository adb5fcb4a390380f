//! Cache bindings: the load/persist protocol over a backing store.
//!
//! Three bindings implement [`TokenCacheBinding`](crate::TokenCacheBinding),
//! differing in how a cache partition is selected and how access to it is
//! synchronized:
//!
//! - [`PerUserTokenCache`] — one partition per signed-in principal, keyed
//!   by derived identity, over an internally synchronized
//!   [`TokenStore`](crate::store::TokenStore) (last-writer-wins across
//!   concurrent flows for the same principal)
//! - [`AppTokenCache`] — one partition per confidential client, fixed key
//! - [`SessionTokenCache`] — one partition per web session, over a
//!   [`SessionStore`](crate::store::SessionStore) that is not safely
//!   concurrent-callable, guarded by a single reader/writer lock

pub mod app;
pub mod per_user;
pub mod session;

pub use app::AppTokenCache;
pub use per_user::PerUserTokenCache;
pub use session::SessionTokenCache;
