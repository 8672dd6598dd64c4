use std::pin::Pin;

use crate::auth::AuthContext;
use crate::body::BoxError;
use crate::http::StatusCode;
use crate::log::error;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::routing::Params;

/// Future returned by [`Handler::call`].
pub type HandlerFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Request handler.
///
/// Implemented for async functions, or closures returning future, with signature
/// `(Request, Params, AuthContext) -> impl IntoResponse`.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request, params: Params, auth: AuthContext) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request, Params, AuthContext) -> Fut + Send + Sync + 'static,
    Fut: Future + Send + 'static,
    Fut::Output: IntoResponse,
{
    fn call(&self, req: Request, params: Params, auth: AuthContext) -> HandlerFuture {
        let future = self(req, params, auth);
        Box::pin(async move { future.await.into_response() })
    }
}

/// Application error raised by a handler.
///
/// Any [`Error`][std::error::Error] converts into [`HandlerError`], so handlers returning
/// `Result<T, HandlerError>` can use `?`. The error is logged and answered with
/// `500 Internal Server Error`, its message is not exposed to the client.
pub struct HandlerError {
    source: BoxError,
}

impl HandlerError {
    /// Create [`HandlerError`] from a message.
    pub fn msg(message: impl std::fmt::Display) -> Self {
        Self {
            source: message.to_string().into(),
        }
    }

    /// Returns the underlying error.
    pub fn source(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        &*self.source
    }

    /// Consume self into the underlying error.
    pub fn into_inner(self) -> BoxError {
        self.source
    }
}

impl<E> From<E> for HandlerError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(value: E) -> Self {
        Self {
            source: Box::new(value),
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        error!("handler error: {}", self.source);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.source, f)
    }
}

impl std::fmt::Debug for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.source, f)
    }
}
