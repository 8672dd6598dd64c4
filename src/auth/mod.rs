//! Authentication strategies.
//!
//! Every route is bound to one [`AuthStrategy`]. Before the handler is invoked, the
//! [`Authorizer`] extracts a [`Credential`] from the request and validates it into an
//! [`AuthContext`], which is handed to the handler. A [`Rejection`] short-circuits dispatch with
//! `401` or `403`, the handler is never invoked.
//!
//! - [`NoAuth`], always authorized as anonymous
//! - [`Basic`], `Authorization: Basic <base64(user:password)>`
//! - [`ApiKey`], key in a configured header or query parameter
use std::sync::Arc;

use crate::headers::{HeaderValue, standard};
use crate::http::StatusCode;
use crate::log::debug;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

mod store;
mod no_auth;
mod basic;
mod api_key;

pub use store::{CredentialStore, Lookup};
pub use no_auth::NoAuth;
pub use basic::Basic;
pub use api_key::ApiKey;

/// Authenticated identity handed to the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    /// Anonymous.
    NoAuth,
    /// Authenticated with basic scheme.
    Basic { user: String, password: String },
    /// Authenticated with an api key.
    ApiKey { key: String },
}

impl AuthContext {
    /// Returns the authenticated principal, `None` for anonymous.
    pub fn principal(&self) -> Option<&str> {
        match self {
            Self::NoAuth => None,
            Self::Basic { user, .. } => Some(user),
            Self::ApiKey { key } => Some(key),
        }
    }

    /// Returns the kind of this context.
    pub fn kind(&self) -> AuthKind {
        match self {
            Self::NoAuth => AuthKind::NoAuth,
            Self::Basic { .. } => AuthKind::Basic,
            Self::ApiKey { .. } => AuthKind::ApiKey,
        }
    }
}

/// The kind of [`AuthContext`] a strategy produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthKind {
    NoAuth,
    Basic,
    ApiKey,
}

/// Raw credential extracted from a request, not yet validated.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Basic { user: String, password: String },
    ApiKey(String),
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic { user, .. } => f
                .debug_struct("Basic")
                .field("user", user)
                .field("password", &"..")
                .finish(),
            Self::ApiKey(_) => f.debug_tuple("ApiKey").field(&"..").finish(),
        }
    }
}

/// Reason a request is not authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// No credential is present.
    #[error("missing credential")]
    MissingCredential,
    /// Credential is present but cannot be decoded.
    #[error("malformed credential")]
    MalformedCredential,
    /// Credential is unknown or does not match.
    #[error("invalid credential")]
    InvalidCredential,
    /// Credential was valid but its session timed out.
    #[error("credential expired")]
    Expired,
    /// Identity is known but not allowed.
    #[error("forbidden")]
    Forbidden,
}

impl Rejection {
    /// Returns the response status for this rejection.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// An authentication strategy.
pub trait AuthStrategy: Send + Sync + 'static {
    /// Returns the kind of [`AuthContext`] this strategy produces.
    fn kind(&self) -> AuthKind;

    /// Extract raw credential from request, `Ok(None)` when absent.
    fn extract(&self, req: &Request) -> Result<Option<Credential>, Rejection>;

    /// Validate extracted credential.
    fn validate(&self, credential: Option<Credential>) -> Result<AuthContext, Rejection>;

    /// Returns `WWW-Authenticate` challenge sent with `401`.
    fn challenge(&self) -> Option<HeaderValue> {
        None
    }
}

impl<A: AuthStrategy + ?Sized> AuthStrategy for Arc<A> {
    fn kind(&self) -> AuthKind {
        A::kind(self)
    }

    fn extract(&self, req: &Request) -> Result<Option<Credential>, Rejection> {
        A::extract(self, req)
    }

    fn validate(&self, credential: Option<Credential>) -> Result<AuthContext, Rejection> {
        A::validate(self, credential)
    }

    fn challenge(&self) -> Option<HeaderValue> {
        A::challenge(self)
    }
}

/// Runs an [`AuthStrategy`] against requests.
#[derive(Clone)]
pub struct Authorizer {
    strategy: Arc<dyn AuthStrategy>,
}

impl Authorizer {
    /// Create new [`Authorizer`].
    pub fn new<A: AuthStrategy>(strategy: A) -> Self {
        Self {
            strategy: Arc::new(strategy),
        }
    }

    /// Create [`Authorizer`] which always authorize as anonymous.
    pub fn none() -> Self {
        Self::new(NoAuth)
    }

    /// Returns the kind of [`AuthContext`] produced.
    pub fn kind(&self) -> AuthKind {
        self.strategy.kind()
    }

    /// Extract then validate credential.
    pub fn authorize(&self, req: &Request) -> Result<AuthContext, Rejection> {
        let credential = self.strategy.extract(req)?;
        self.strategy.validate(credential)
    }

    /// Create response for a rejection.
    pub fn reject(&self, rejection: Rejection) -> Response {
        debug!("request rejected: {rejection}");
        let mut res = rejection.into_response();
        if rejection.status() == StatusCode::UNAUTHORIZED {
            if let Some(challenge) = self.strategy.challenge() {
                res.headers_mut().insert(standard::WWW_AUTHENTICATE, challenge);
            }
        }
        res
    }
}

impl Default for Authorizer {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Authorizer").field(&self.kind()).finish()
    }
}

#[cfg(test)]
mod test;
