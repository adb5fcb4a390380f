//! Per-session storage contract.

use std::collections::HashMap;

use crate::CacheResult;

/// Storage trait for the enclosing session of one signed-in user.
///
/// Unlike [`TokenStore`](crate::store::TokenStore), a session store carries
/// no internal synchronization: `write` and `remove` take `&mut self`, and
/// concurrent `read`s are only safe while no writer runs. The session-wide
/// cache binding wraps the store in a single reader/writer lock and routes
/// every access through it, which is exactly the exclusion this contract
/// requires.
pub trait SessionStore {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session backend fails.
    fn read(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Writes `value` under `key`, overwriting any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error if the session backend fails.
    fn write(&mut self, key: &str, value: Vec<u8>) -> CacheResult<()>;

    /// Removes the value stored under `key`. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the session backend fails.
    fn remove(&mut self, key: &str) -> CacheResult<()>;
}

/// Map-backed [`SessionStore`] for tests and in-process session backends.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    values: HashMap<String, Vec<u8>>,
}

impl InMemorySessionStore {
    /// Creates an empty session store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn read(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: Vec<u8>) -> CacheResult<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> CacheResult<()> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_remove() {
        let mut store = InMemorySessionStore::new();
        assert_eq!(store.read("k").unwrap(), None);

        store.write("k", b"value".to_vec()).unwrap();
        assert_eq!(store.read("k").unwrap(), Some(b"value".to_vec()));

        store.write("k", b"newer".to_vec()).unwrap();
        assert_eq!(store.read("k").unwrap(), Some(b"newer".to_vec()));

        store.remove("k").unwrap();
        assert_eq!(store.read("k").unwrap(), None);
        store.remove("k").unwrap();
    }
}
