//! Cache synchronization error types.
//!
//! This module defines all error types that can occur while keeping the
//! acquisition library's token state synchronized with a backing store.

/// Errors that can occur during cache synchronization operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The backing store failed to get, set, or remove an entry.
    ///
    /// Never swallowed: a hidden store failure could mask stale or missing
    /// credentials, so hooks propagate this verbatim to the acquisition
    /// library, which surfaces it as an acquisition failure.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage failure.
        message: String,
    },

    /// A stored blob could not be parsed back into the acquisition
    /// library's format (version mismatch, corruption).
    ///
    /// Produced by [`TokenCacheHandle`](crate::TokenCacheHandle)
    /// implementations. Cache bindings degrade it to a cache miss rather
    /// than propagating it: a corrupted entry must never block
    /// authentication.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization failure.
        message: String,
    },

    /// The cache configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },
}

impl CacheError {
    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Serialization` error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if this error originated in the backing store.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }

    /// Returns `true` if this error can be degraded to a cache miss.
    ///
    /// Only serialization failures qualify; storage and configuration
    /// failures must surface to the caller.
    #[must_use]
    pub fn is_recoverable_as_miss(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}
