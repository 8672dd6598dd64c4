//! Request routing.
//!
//! Routing decides which [`Handler`] should handle a request, based on its method and path.
//!
//! ```
//! use tsuna::{Request, Params, AuthContext, Router};
//!
//! async fn user(_: Request, params: Params, _: AuthContext) -> String {
//!     format!("user {}", params.get("id").unwrap_or_default())
//! }
//!
//! let mut router = Router::new();
//! router.get("/users/{id}", user).unwrap();
//! ```
//!
//! # Patterns
//!
//! A pattern is a `/` separated list of segments:
//!
//! - literal, e.g. `users`, matched exactly
//! - parameter, e.g. `{id}`, captures one path segment
//! - wildcard, `*`, captures the rest of the path, possibly empty, only allowed as the last
//!   segment and captured as parameter `*`
//!
//! At each level, literal matches are preferred over parameters, which are preferred over
//! wildcards. Each path resolves to at most one route per method.
//!
//! Paths are matched after percent-decoding and normalization, trailing slash is insignificant.
mod pattern;
mod node;
mod params;
mod handler;
mod router;
mod controller;
mod static_files;

pub use params::Params;
pub use handler::{Handler, HandlerError, HandlerFuture};
pub use router::{Match, Resolution, Router};
pub use controller::Controller;
pub use static_files::{FsRepository, Repository, RepositoryError, StaticFiles};

/// Route registration error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// Same method and pattern is already registered.
    #[error("route conflict: {0}")]
    RouteConflict(String),
    /// Pattern syntax is invalid.
    #[error("invalid route pattern: {0}")]
    InvalidPattern(String),
    /// Sibling parameter segments have different names.
    #[error("ambiguous parameter name in {0}")]
    AmbiguousParameter(String),
    /// Routes cannot be registered once server started.
    #[error("server already started")]
    ServerAlreadyStarted,
}

#[cfg(test)]
mod test;
