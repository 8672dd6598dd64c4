use std::sync::Arc;
use std::time::Duration;

use base64ct::{Base64, Encoding};

use super::store::{CredentialStore, Lookup, secret_eq};
use crate::auth::{AuthContext, AuthKind, AuthStrategy, Credential, Rejection};
use crate::headers::{HeaderValue, standard};
use crate::request::Request;

type Checker = Arc<dyn Fn(&str, &str) -> bool + Send + Sync>;

/// `Authorization: Basic` strategy.
///
/// Credentials are checked against a user to password store, or a custom checker if one is
/// given.
pub struct Basic {
    realm: HeaderValue,
    store: CredentialStore<String>,
    checker: Option<Checker>,
}

impl Basic {
    /// Create new [`Basic`] strategy with an empty store and realm `tsuna`.
    pub fn new() -> Self {
        Self {
            realm: HeaderValue::from_static("Basic realm=\"tsuna\""),
            store: CredentialStore::new(),
            checker: None,
        }
    }

    /// Set the realm sent in `WWW-Authenticate`.
    ///
    /// # Panics
    ///
    /// Panics if realm contains a `"` or is not a valid header value.
    pub fn with_realm(mut self, realm: &str) -> Self {
        assert!(!realm.contains('"'), "realm must not contain quote");
        match HeaderValue::try_from(format!("Basic realm=\"{realm}\"")) {
            Ok(ok) => self.realm = ok,
            Err(err) => panic!("invalid realm: {err}"),
        }
        self
    }

    /// Set session timeout of stored credentials.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.store.set_timeout(Some(timeout));
        self
    }

    /// Check credentials with `checker` instead of the store.
    pub fn with_checker<F>(mut self, checker: F) -> Self
    where
        F: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        self.checker = Some(Arc::new(checker));
        self
    }

    /// Insert or replace a user.
    pub fn set(&self, user: impl Into<String>, password: impl Into<String>) {
        self.store.set(user, password.into());
    }

    /// Remove a user, returns `true` if it was present.
    pub fn clear(&self, user: &str) -> bool {
        self.store.clear(user)
    }

    /// Remove all users.
    pub fn clear_all(&self) {
        self.store.clear_all();
    }

    /// Returns the credential store.
    pub fn store(&self) -> &CredentialStore<String> {
        &self.store
    }
}

/// Decode `Basic <base64(user:password)>`.
fn decode(value: &str) -> Result<Credential, Rejection> {
    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or(Rejection::MalformedCredential)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(Rejection::MalformedCredential);
    }
    let decoded = Base64::decode_vec(token.trim()).map_err(|_| Rejection::MalformedCredential)?;
    let decoded = String::from_utf8(decoded).map_err(|_| Rejection::MalformedCredential)?;
    let (user, password) = decoded
        .split_once(':')
        .ok_or(Rejection::MalformedCredential)?;
    Ok(Credential::Basic {
        user: user.to_owned(),
        password: password.to_owned(),
    })
}

impl AuthStrategy for Basic {
    fn kind(&self) -> AuthKind {
        AuthKind::Basic
    }

    fn extract(&self, req: &Request) -> Result<Option<Credential>, Rejection> {
        let Some(value) = req.headers().get(standard::AUTHORIZATION) else {
            return Ok(None);
        };
        let value = value.to_str().map_err(|_| Rejection::MalformedCredential)?;
        decode(value).map(Some)
    }

    fn validate(&self, credential: Option<Credential>) -> Result<AuthContext, Rejection> {
        let (user, password) = match credential {
            Some(Credential::Basic { user, password }) => (user, password),
            Some(_) => return Err(Rejection::InvalidCredential),
            None => return Err(Rejection::MissingCredential),
        };

        if let Some(checker) = &self.checker {
            return match checker(&user, &password) {
                true => Ok(AuthContext::Basic { user, password }),
                false => Err(Rejection::InvalidCredential),
            };
        }

        match self
            .store
            .check(&user, |stored| secret_eq(stored.as_bytes(), password.as_bytes()))
        {
            Lookup::Valid => Ok(AuthContext::Basic { user, password }),
            Lookup::Expired => Err(Rejection::Expired),
            Lookup::Mismatch | Lookup::Unknown => Err(Rejection::InvalidCredential),
        }
    }

    fn challenge(&self) -> Option<HeaderValue> {
        Some(self.realm.clone())
    }
}

impl Default for Basic {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Basic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Basic")
            .field("realm", &self.realm)
            .field("users", &self.store.len())
            .field("checker", &self.checker.is_some())
            .finish()
    }
}
