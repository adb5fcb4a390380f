//! Cache duration configuration.
//!
//! Two cache classes exist, distinguished only by how long their entries
//! stay in the backing store. Durations are fixed at construction; there is
//! no dynamic reconfiguration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CacheError;

/// Cache-duration configuration for both cache classes.
///
/// # Example (TOML)
///
/// ```toml
/// [token_cache]
/// app_cache_ttl = "48h"
/// user_cache_ttl = "3days 12h"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long application credential entries are kept.
    ///
    /// The blob holds both access and refresh tokens (1 hour and 90 days
    /// by default, respectively); in production values up to 90 days are
    /// reasonable.
    #[serde(with = "humantime_serde")]
    pub app_cache_ttl: Duration,

    /// How long per-user entries are kept.
    ///
    /// Tuned to half of the 7-day refresh-token lifetime so a stale entry
    /// is evicted before the refresh token itself expires, forcing a clean
    /// re-authentication instead of a silent failure.
    #[serde(with = "humantime_serde")]
    pub user_cache_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            app_cache_ttl: Duration::from_secs(48 * 3600), // 48 hours
            user_cache_ttl: Duration::from_secs(84 * 3600), // 3.5 days
        }
    }
}

impl CacheConfig {
    /// Validates the configured durations.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Configuration`] if either duration is zero,
    /// which would make every entry expire on write.
    pub fn validate(&self) -> Result<(), CacheError> {
        if self.app_cache_ttl.is_zero() {
            return Err(CacheError::configuration("app_cache_ttl must be non-zero"));
        }
        if self.user_cache_ttl.is_zero() {
            return Err(CacheError::configuration("user_cache_ttl must be non-zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.app_cache_ttl, Duration::from_secs(48 * 3600));
        assert_eq!(config.user_cache_ttl, Duration::from_secs(84 * 3600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_humantime_durations() {
        let config: CacheConfig = serde_json::from_value(serde_json::json!({
            "app_cache_ttl": "48h",
            "user_cache_ttl": "3days 12h",
        }))
        .expect("valid config");
        assert_eq!(config.app_cache_ttl, Duration::from_secs(48 * 3600));
        assert_eq!(config.user_cache_ttl, Duration::from_secs(84 * 3600));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: CacheConfig =
            serde_json::from_value(serde_json::json!({ "app_cache_ttl": "1h" }))
                .expect("valid config");
        assert_eq!(config.app_cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.user_cache_ttl, Duration::from_secs(84 * 3600));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let config = CacheConfig {
            app_cache_ttl: Duration::ZERO,
            ..CacheConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("app_cache_ttl"));
    }
}
