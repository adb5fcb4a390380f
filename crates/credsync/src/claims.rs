//! Identity claim sets and cache-key derivation.
//!
//! A cache partition is selected by a string key derived from the signed-in
//! principal's claims. The derivation prefers the account identifier the
//! acquisition library assigned after the first successful sign-in (written
//! back into the claim set by [`bind_account_id`]); until that claim exists,
//! the key falls back to the `{object id}.{tenant id}` composite.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Claim key constants.
pub mod claim_keys {
    /// Unique object identifier of the principal within its tenant.
    pub const OBJECT_ID: &str = "oid";

    /// Tenant identifier of the principal.
    pub const TENANT_ID: &str = "tid";

    /// Account identifier assigned by the acquisition library after the
    /// first successful sign-in. Once present it is the canonical cache
    /// key for the principal.
    pub const ACCOUNT_CACHE_ID: &str = "account-cache-id";
}

/// A single identity claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Claim key, e.g. `oid`.
    pub key: String,
    /// Claim value.
    pub value: String,
}

impl Claim {
    /// Creates a new claim.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An ordered claim set for one signed-in principal.
///
/// Claims are kept in insertion order and lookups return the earliest
/// match, so a claim written once stays authoritative even if a later
/// duplicate is added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsIdentity {
    claims: Vec<Claim>,
}

/// A claim set shared between the caller and a cache binding.
///
/// The binding writes the library-assigned account identifier back through
/// this handle so subsequent requests derive the same cache key.
pub type SharedIdentity = Arc<RwLock<ClaimsIdentity>>;

impl ClaimsIdentity {
    /// Creates an empty claim set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a claim set from existing claims, preserving order.
    #[must_use]
    pub fn from_claims(claims: impl IntoIterator<Item = Claim>) -> Self {
        Self {
            claims: claims.into_iter().collect(),
        }
    }

    /// Wraps the claim set for sharing between the caller and a binding.
    #[must_use]
    pub fn into_shared(self) -> SharedIdentity {
        Arc::new(RwLock::new(self))
    }

    /// Returns the value of the earliest claim with the given key, if any.
    #[must_use]
    pub fn find_first(&self, key: &str) -> Option<&str> {
        self.claims
            .iter()
            .find(|claim| claim.key == key)
            .map(|claim| claim.value.as_str())
    }

    /// Appends a claim. Existing claims with the same key are kept; lookups
    /// still return the earliest one.
    pub fn add_claim(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.claims.push(Claim::new(key, value));
    }

    /// Returns the principal's object identifier, if present and non-blank.
    #[must_use]
    pub fn object_id(&self) -> Option<&str> {
        self.find_first(claim_keys::OBJECT_ID).filter(|v| !v.trim().is_empty())
    }

    /// Returns the principal's tenant identifier, if present and non-blank.
    #[must_use]
    pub fn tenant_id(&self) -> Option<&str> {
        self.find_first(claim_keys::TENANT_ID).filter(|v| !v.trim().is_empty())
    }

    /// Derives the cache key identifying whose tokens these are.
    ///
    /// Priority:
    ///
    /// 1. The [`claim_keys::ACCOUNT_CACHE_ID`] claim, if assigned. It
    ///    reflects the acquisition library's own canonical identifier and
    ///    stays authoritative even if the composite rule below changes.
    /// 2. `{object id}.{tenant id}`, if both claims are present.
    /// 3. `None` — no usable identity fact; caching is disabled for the
    ///    call and load/persist become no-ops.
    #[must_use]
    pub fn account_cache_key(&self) -> Option<String> {
        if let Some(account_id) = self
            .find_first(claim_keys::ACCOUNT_CACHE_ID)
            .filter(|v| !v.trim().is_empty())
        {
            return Some(account_id.to_string());
        }

        match (self.object_id(), self.tenant_id()) {
            (Some(oid), Some(tid)) => Some(format!("{oid}.{tid}")),
            _ => None,
        }
    }
}

/// Writes the library-assigned account identifier back into a shared claim
/// set.
///
/// Appends the [`claim_keys::ACCOUNT_CACHE_ID`] claim so future requests
/// derive the cache key from it directly. No-op when the identity is absent
/// or the claim is already assigned: once set, the key must stay stable for
/// the life of the session.
pub fn bind_account_id(identity: Option<&SharedIdentity>, account_id: &str) {
    let Some(identity) = identity else {
        return;
    };

    let mut identity = identity.write();
    if identity.find_first(claim_keys::ACCOUNT_CACHE_ID).is_some() {
        return;
    }
    identity.add_claim(claim_keys::ACCOUNT_CACHE_ID, account_id);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_with(claims: &[(&str, &str)]) -> ClaimsIdentity {
        ClaimsIdentity::from_claims(claims.iter().map(|(k, v)| Claim::new(*k, *v)))
    }

    #[test]
    fn test_composite_key_derivation() {
        let identity = identity_with(&[("oid", "u1"), ("tid", "t1")]);
        assert_eq!(identity.account_cache_key().as_deref(), Some("u1.t1"));

        // Deterministic across calls.
        assert_eq!(identity.account_cache_key(), identity.account_cache_key());
    }

    #[test]
    fn test_account_cache_id_wins_over_composite() {
        let identity = identity_with(&[
            ("oid", "u1"),
            ("tid", "t1"),
            (claim_keys::ACCOUNT_CACHE_ID, "canonical-id"),
        ]);
        assert_eq!(
            identity.account_cache_key().as_deref(),
            Some("canonical-id")
        );

        // The assigned id also works without the composite claims.
        let identity = identity_with(&[(claim_keys::ACCOUNT_CACHE_ID, "canonical-id")]);
        assert_eq!(
            identity.account_cache_key().as_deref(),
            Some("canonical-id")
        );
    }

    #[test]
    fn test_no_usable_key() {
        assert_eq!(ClaimsIdentity::new().account_cache_key(), None);

        // Either half of the composite alone is not enough.
        assert_eq!(identity_with(&[("oid", "u1")]).account_cache_key(), None);
        assert_eq!(identity_with(&[("tid", "t1")]).account_cache_key(), None);

        // Blank values are treated as absent.
        let identity = identity_with(&[("oid", "  "), ("tid", "t1")]);
        assert_eq!(identity.account_cache_key(), None);
    }

    #[test]
    fn test_find_first_returns_earliest() {
        let mut identity = identity_with(&[("oid", "first")]);
        identity.add_claim("oid", "second");
        assert_eq!(identity.find_first("oid"), Some("first"));
    }

    #[test]
    fn test_bind_account_id_appends_once() {
        let identity: SharedIdentity =
            Arc::new(RwLock::new(identity_with(&[("oid", "u1"), ("tid", "t1")])));

        bind_account_id(Some(&identity), "u1.t1");
        assert_eq!(
            identity.read().account_cache_key().as_deref(),
            Some("u1.t1")
        );

        // Stable: a second bind with a different value does not reassign.
        bind_account_id(Some(&identity), "other");
        assert_eq!(
            identity.read().account_cache_key().as_deref(),
            Some("u1.t1")
        );
    }

    #[test]
    fn test_bind_account_id_without_identity_is_noop() {
        bind_account_id(None, "u1.t1");
    }
}
