use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Result of [`CredentialStore::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Valid,
    /// Key is known but its value does not match.
    Mismatch,
    /// Key is known but its session timed out.
    Expired,
    Unknown,
}

/// Thread safe credential store with optional session timeout.
///
/// Session starts when a credential is set, and is not refreshed by lookups.
#[derive(Debug, Default)]
pub struct CredentialStore<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
    timeout: Option<Duration>,
}

#[derive(Debug)]
struct Entry<V> {
    value: V,
    issued: Instant,
}

impl<V> CredentialStore<V> {
    /// Create new empty store without session timeout.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            timeout: None,
        }
    }

    /// Set the session timeout, `None` disables it.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    /// Returns the session timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Insert or replace a credential, starting a new session.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let entry = Entry {
            value,
            issued: Instant::now(),
        };
        self.write().insert(key.into(), entry);
    }

    /// Remove a credential, returns `true` if it was present.
    pub fn clear(&self, key: &str) -> bool {
        self.write().remove(key).is_some()
    }

    /// Remove all credentials.
    pub fn clear_all(&self) {
        self.write().clear();
    }

    /// Remove credentials whose session timed out.
    pub fn purge_expired(&self) {
        if let Some(timeout) = self.timeout {
            self.write().retain(|_, entry| entry.issued.elapsed() < timeout);
        }
    }

    /// Returns the number of credentials, including expired ones.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if store is empty.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Lookup `key` and check its value with `matches`.
    pub fn check(&self, key: &str, matches: impl FnOnce(&V) -> bool) -> Lookup {
        let entries = self.read();
        let Some(entry) = entries.get(key) else {
            return Lookup::Unknown;
        };
        if !matches(&entry.value) {
            return Lookup::Mismatch;
        }
        match self.timeout {
            Some(timeout) if entry.issued.elapsed() >= timeout => Lookup::Expired,
            _ => Lookup::Valid,
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Entry<V>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Entry<V>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Compare secrets without short-circuit on the first differing byte.
pub(crate) fn secret_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
