use std::sync::Arc;
use std::time::Duration;

use super::store::{CredentialStore, Lookup};
use crate::auth::{AuthContext, AuthKind, AuthStrategy, Credential, Rejection};
use crate::headers::{HeaderName, standard};
use crate::request::Request;

type Checker = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Api key strategy.
///
/// Key is read from the `x-api-key` header by default. When both a header and a query parameter
/// are configured, the header is checked first.
pub struct ApiKey {
    header: Option<HeaderName>,
    query: Option<String>,
    store: CredentialStore<()>,
    checker: Option<Checker>,
}

impl ApiKey {
    /// Create new [`ApiKey`] strategy reading `x-api-key` header.
    pub fn new() -> Self {
        Self {
            header: Some(standard::X_API_KEY),
            query: None,
            store: CredentialStore::new(),
            checker: None,
        }
    }

    /// Read key from `name` header.
    pub fn in_header(mut self, name: HeaderName) -> Self {
        self.header = Some(name);
        self
    }

    /// Read key from `name` query parameter.
    ///
    /// Unless [`in_header`][ApiKey::in_header] is called afterwards, header is no longer read.
    pub fn in_query(mut self, name: impl Into<String>) -> Self {
        self.header = None;
        self.query = Some(name.into());
        self
    }

    /// Set session timeout of stored keys.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.store.set_timeout(Some(timeout));
        self
    }

    /// Check keys with `checker` instead of the store.
    pub fn with_checker<F>(mut self, checker: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.checker = Some(Arc::new(checker));
        self
    }

    /// Issue a key.
    pub fn set(&self, key: impl Into<String>) {
        self.store.set(key, ());
    }

    /// Revoke a key, returns `true` if it was present.
    pub fn clear(&self, key: &str) -> bool {
        self.store.clear(key)
    }

    /// Revoke all keys.
    pub fn clear_all(&self) {
        self.store.clear_all();
    }

    /// Returns the key store.
    pub fn store(&self) -> &CredentialStore<()> {
        &self.store
    }
}

impl AuthStrategy for ApiKey {
    fn kind(&self) -> AuthKind {
        AuthKind::ApiKey
    }

    fn extract(&self, req: &Request) -> Result<Option<Credential>, Rejection> {
        if let Some(name) = &self.header {
            if let Some(value) = req.headers().get(name) {
                let value = value.to_str().map_err(|_| Rejection::MalformedCredential)?;
                return Ok(Some(Credential::ApiKey(value.to_owned())));
            }
        }
        if let Some(name) = &self.query {
            if let Some(value) = req.query_param(name) {
                return Ok(Some(Credential::ApiKey(value.to_owned())));
            }
        }
        Ok(None)
    }

    fn validate(&self, credential: Option<Credential>) -> Result<AuthContext, Rejection> {
        let key = match credential {
            Some(Credential::ApiKey(key)) if key.is_empty() => {
                return Err(Rejection::MissingCredential);
            }
            Some(Credential::ApiKey(key)) => key,
            Some(_) => return Err(Rejection::InvalidCredential),
            None => return Err(Rejection::MissingCredential),
        };

        if let Some(checker) = &self.checker {
            return match checker(&key) {
                true => Ok(AuthContext::ApiKey { key }),
                false => Err(Rejection::InvalidCredential),
            };
        }

        match self.store.check(&key, |_| true) {
            Lookup::Valid => Ok(AuthContext::ApiKey { key }),
            Lookup::Expired => Err(Rejection::Expired),
            Lookup::Mismatch | Lookup::Unknown => Err(Rejection::InvalidCredential),
        }
    }
}

impl Default for ApiKey {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("header", &self.header)
            .field("query", &self.query)
            .field("keys", &self.store.len())
            .field("checker", &self.checker.is_some())
            .finish()
    }
}
