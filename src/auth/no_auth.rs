use crate::auth::{AuthContext, AuthKind, AuthStrategy, Credential, Rejection};
use crate::request::Request;

/// Strategy which always authorize as anonymous.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl AuthStrategy for NoAuth {
    fn kind(&self) -> AuthKind {
        AuthKind::NoAuth
    }

    fn extract(&self, _: &Request) -> Result<Option<Credential>, Rejection> {
        Ok(None)
    }

    fn validate(&self, _: Option<Credential>) -> Result<AuthContext, Rejection> {
        Ok(AuthContext::NoAuth)
    }
}
